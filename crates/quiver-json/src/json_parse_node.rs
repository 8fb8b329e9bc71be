use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use time::{Date, Duration, OffsetDateTime, Time};
use uuid::Uuid;

use quiver_abstractions::SerializationError;
use quiver_abstractions::serialization::{
    AssignFieldValuesHandler, ParseNode, parse_iso8601_duration,
};

use crate::dates::{parse_date, parse_datetime, parse_time};

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Cursor over an in-memory parsed JSON value.
///
/// Child nodes inherit the handlers registered on their parent, so a proxy
/// wrapping the root factory sees nested objects too.
pub struct JsonParseNode {
    value: Value,
    before: Vec<AssignFieldValuesHandler>,
    after: Vec<AssignFieldValuesHandler>,
}

impl JsonParseNode {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    fn wrap(&self, value: Value) -> Box<dyn ParseNode> {
        Box::new(Self {
            value,
            before: self.before.clone(),
            after: self.after.clone(),
        })
    }

    fn string_content(&self, expected: &'static str) -> Result<Option<&str>, SerializationError> {
        match &self.value {
            Value::Null => Ok(None),
            Value::String(raw) => Ok(Some(raw)),
            other => Err(SerializationError::UnexpectedNodeType {
                expected,
                found: json_type_name(other),
            }),
        }
    }
}

impl ParseNode for JsonParseNode {
    fn get_string_value(&self) -> Result<Option<String>, SerializationError> {
        Ok(self.string_content("string")?.map(str::to_string))
    }

    fn get_bool_value(&self) -> Result<Option<bool>, SerializationError> {
        match &self.value {
            Value::Null => Ok(None),
            Value::Bool(value) => Ok(Some(*value)),
            other => Err(SerializationError::UnexpectedNodeType {
                expected: "boolean",
                found: json_type_name(other),
            }),
        }
    }

    fn get_i64_value(&self) -> Result<Option<i64>, SerializationError> {
        match &self.value {
            Value::Null => Ok(None),
            Value::Number(number) => number.as_i64().map(Some).ok_or(
                SerializationError::UnexpectedNodeType {
                    expected: "integer",
                    found: "number",
                },
            ),
            other => Err(SerializationError::UnexpectedNodeType {
                expected: "integer",
                found: json_type_name(other),
            }),
        }
    }

    fn get_f64_value(&self) -> Result<Option<f64>, SerializationError> {
        match &self.value {
            Value::Null => Ok(None),
            Value::Number(number) => number.as_f64().map(Some).ok_or(
                SerializationError::UnexpectedNodeType {
                    expected: "float",
                    found: "number",
                },
            ),
            other => Err(SerializationError::UnexpectedNodeType {
                expected: "float",
                found: json_type_name(other),
            }),
        }
    }

    fn get_uuid_value(&self) -> Result<Option<Uuid>, SerializationError> {
        match self.string_content("uuid string")? {
            None => Ok(None),
            Some(raw) => Uuid::parse_str(raw).map(Some).map_err(|_| {
                SerializationError::MalformedPayload(format!("invalid uuid `{raw}`"))
            }),
        }
    }

    fn get_datetime_value(&self) -> Result<Option<OffsetDateTime>, SerializationError> {
        self.string_content("datetime string")?
            .map(parse_datetime)
            .transpose()
    }

    fn get_date_value(&self) -> Result<Option<Date>, SerializationError> {
        self.string_content("date string")?.map(parse_date).transpose()
    }

    fn get_time_value(&self) -> Result<Option<Time>, SerializationError> {
        self.string_content("time string")?.map(parse_time).transpose()
    }

    fn get_duration_value(&self) -> Result<Option<Duration>, SerializationError> {
        match self.string_content("duration string")? {
            None => Ok(None),
            Some(raw) => parse_iso8601_duration(raw).map(Some).ok_or_else(|| {
                SerializationError::MalformedPayload(format!("invalid duration `{raw}`"))
            }),
        }
    }

    fn get_bytes_value(&self) -> Result<Option<Vec<u8>>, SerializationError> {
        match self.string_content("base64 string")? {
            None => Ok(None),
            Some(raw) => BASE64.decode(raw).map(Some).map_err(|_| {
                SerializationError::MalformedPayload(format!("invalid base64 content `{raw}`"))
            }),
        }
    }

    fn is_null(&self) -> bool {
        self.value.is_null()
    }

    fn get_child_node(&self, identifier: &str) -> Option<Box<dyn ParseNode>> {
        self.value
            .as_object()
            .and_then(|object| object.get(identifier))
            .map(|child| self.wrap(child.clone()))
    }

    fn get_children(&self) -> Result<Vec<Box<dyn ParseNode>>, SerializationError> {
        match &self.value {
            Value::Array(items) => Ok(items.iter().map(|item| self.wrap(item.clone())).collect()),
            other => Err(SerializationError::UnexpectedNodeType {
                expected: "array",
                found: json_type_name(other),
            }),
        }
    }

    fn field_names(&self) -> Vec<String> {
        self.value
            .as_object()
            .map(|object| object.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get_raw_value(&self) -> Value {
        self.value.clone()
    }

    fn before_assign_handlers(&self) -> &[AssignFieldValuesHandler] {
        &self.before
    }

    fn after_assign_handlers(&self) -> &[AssignFieldValuesHandler] {
        &self.after
    }

    fn register_before_assign_field_values(&mut self, handler: AssignFieldValuesHandler) {
        self.before.insert(0, handler);
    }

    fn register_after_assign_field_values(&mut self, handler: AssignFieldValuesHandler) {
        self.after.insert(0, handler);
    }
}
