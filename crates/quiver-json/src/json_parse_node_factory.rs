use serde_json::Value;

use quiver_abstractions::SerializationError;
use quiver_abstractions::serialization::{ParseNode, ParseNodeFactory};

use crate::json_parse_node::JsonParseNode;

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

pub(crate) fn validate_content_type(content_type: &str) -> Result<(), SerializationError> {
    let cleaned = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if cleaned.is_empty() {
        return Err(SerializationError::EmptyContentType);
    }
    if cleaned != JSON_CONTENT_TYPE {
        return Err(SerializationError::ContentTypeMismatch {
            requested: cleaned,
            valid: JSON_CONTENT_TYPE.to_string(),
        });
    }
    Ok(())
}

/// Parse-node factory for `application/json` payloads.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParseNodeFactory;

impl ParseNodeFactory for JsonParseNodeFactory {
    fn valid_content_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }

    fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>, SerializationError> {
        validate_content_type(content_type)?;
        let value: Value = serde_json::from_slice(content)
            .map_err(|err| SerializationError::MalformedPayload(err.to_string()))?;
        Ok(Box::new(JsonParseNode::new(value)))
    }
}
