use quiver_abstractions::SerializationError;
use quiver_abstractions::serialization::{SerializationWriter, SerializationWriterFactory};

use crate::json_parse_node_factory::{JSON_CONTENT_TYPE, validate_content_type};
use crate::json_serialization_writer::JsonSerializationWriter;

/// Serialization-writer factory for `application/json` payloads.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializationWriterFactory;

impl SerializationWriterFactory for JsonSerializationWriterFactory {
    fn valid_content_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }

    fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>, SerializationError> {
        validate_content_type(content_type)?;
        Ok(Box::new(JsonSerializationWriter::new()))
    }
}
