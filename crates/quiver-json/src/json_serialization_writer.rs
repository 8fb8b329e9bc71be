use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use serde_json::{Map, Value};
use time::{Date, Duration, OffsetDateTime, Time};
use uuid::Uuid;

use quiver_abstractions::SerializationError;
use quiver_abstractions::serialization::{
    AdditionalData, Parsable, SerializationHandler, SerializationWriter,
    StartObjectSerializationHandler, format_iso8601_duration,
};

use crate::dates::{format_date, format_datetime, format_time};

/// Serialization writer building an in-memory JSON value.
///
/// Keyed writes accumulate into an object; an empty key writes the value as
/// the root of the output, which is how a request body's top-level model or
/// collection lands. The sorted object representation keeps output bytes
/// deterministic.
pub struct JsonSerializationWriter {
    object: Map<String, Value>,
    root: Option<Value>,
    consumed: bool,
    before: Vec<SerializationHandler>,
    after: Vec<SerializationHandler>,
    start: Vec<StartObjectSerializationHandler>,
}

impl JsonSerializationWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, key: &str, value: Value) {
        if key.is_empty() {
            self.root = Some(value);
        } else {
            self.object.insert(key.to_string(), value);
        }
    }

    /// Runs the registered handlers around the model's own `serialize` and
    /// returns the resulting JSON object. Nested writers inherit handlers so
    /// nested backed models get the same treatment as the root.
    fn serialize_object(&mut self, model: &dyn Parsable) -> Result<Value, SerializationError> {
        for handler in self.before.clone() {
            handler(model)?;
        }
        let mut nested = JsonSerializationWriter {
            object: Map::new(),
            root: None,
            consumed: false,
            before: self.before.clone(),
            after: self.after.clone(),
            start: self.start.clone(),
        };
        for handler in self.start.clone() {
            handler(model, &mut nested)?;
        }
        model.serialize(&mut nested)?;
        for handler in self.after.clone() {
            handler(model)?;
        }
        Ok(Value::Object(nested.object))
    }
}

impl Default for JsonSerializationWriter {
    fn default() -> Self {
        Self {
            object: Map::new(),
            root: None,
            consumed: false,
            before: Vec::new(),
            after: Vec::new(),
            start: Vec::new(),
        }
    }
}

impl SerializationWriter for JsonSerializationWriter {
    fn write_string_value(
        &mut self,
        key: &str,
        value: Option<&str>,
    ) -> Result<(), SerializationError> {
        if let Some(value) = value {
            self.insert(key, Value::String(value.to_string()));
        }
        Ok(())
    }

    fn write_bool_value(
        &mut self,
        key: &str,
        value: Option<bool>,
    ) -> Result<(), SerializationError> {
        if let Some(value) = value {
            self.insert(key, Value::Bool(value));
        }
        Ok(())
    }

    fn write_i64_value(&mut self, key: &str, value: Option<i64>) -> Result<(), SerializationError> {
        if let Some(value) = value {
            self.insert(key, Value::from(value));
        }
        Ok(())
    }

    fn write_f64_value(&mut self, key: &str, value: Option<f64>) -> Result<(), SerializationError> {
        if let Some(value) = value {
            let number = serde_json::Number::from_f64(value).ok_or_else(|| {
                SerializationError::MalformedPayload(format!(
                    "non-finite float `{value}` cannot be written as json"
                ))
            })?;
            self.insert(key, Value::Number(number));
        }
        Ok(())
    }

    fn write_uuid_value(
        &mut self,
        key: &str,
        value: Option<Uuid>,
    ) -> Result<(), SerializationError> {
        if let Some(value) = value {
            self.insert(key, Value::String(value.to_string()));
        }
        Ok(())
    }

    fn write_datetime_value(
        &mut self,
        key: &str,
        value: Option<OffsetDateTime>,
    ) -> Result<(), SerializationError> {
        if let Some(value) = value {
            let formatted = format_datetime(value)?;
            self.insert(key, Value::String(formatted));
        }
        Ok(())
    }

    fn write_date_value(
        &mut self,
        key: &str,
        value: Option<Date>,
    ) -> Result<(), SerializationError> {
        if let Some(value) = value {
            let formatted = format_date(value)?;
            self.insert(key, Value::String(formatted));
        }
        Ok(())
    }

    fn write_time_value(
        &mut self,
        key: &str,
        value: Option<Time>,
    ) -> Result<(), SerializationError> {
        if let Some(value) = value {
            let formatted = format_time(value)?;
            self.insert(key, Value::String(formatted));
        }
        Ok(())
    }

    fn write_duration_value(
        &mut self,
        key: &str,
        value: Option<Duration>,
    ) -> Result<(), SerializationError> {
        if let Some(value) = value {
            let formatted = format_iso8601_duration(value).ok_or_else(|| {
                SerializationError::MalformedPayload(
                    "negative durations cannot be written as iso 8601".to_string(),
                )
            })?;
            self.insert(key, Value::String(formatted));
        }
        Ok(())
    }

    fn write_bytes_value(
        &mut self,
        key: &str,
        value: Option<&[u8]>,
    ) -> Result<(), SerializationError> {
        if let Some(value) = value {
            self.insert(key, Value::String(BASE64.encode(value)));
        }
        Ok(())
    }

    fn write_collection_of_string_values(
        &mut self,
        key: &str,
        values: Option<&[String]>,
    ) -> Result<(), SerializationError> {
        if let Some(values) = values {
            let items = values.iter().map(|value| Value::String(value.clone()));
            self.insert(key, Value::Array(items.collect()));
        }
        Ok(())
    }

    fn write_collection_of_bool_values(
        &mut self,
        key: &str,
        values: Option<&[bool]>,
    ) -> Result<(), SerializationError> {
        if let Some(values) = values {
            let items = values.iter().map(|value| Value::Bool(*value));
            self.insert(key, Value::Array(items.collect()));
        }
        Ok(())
    }

    fn write_collection_of_i64_values(
        &mut self,
        key: &str,
        values: Option<&[i64]>,
    ) -> Result<(), SerializationError> {
        if let Some(values) = values {
            let items = values.iter().map(|value| Value::from(*value));
            self.insert(key, Value::Array(items.collect()));
        }
        Ok(())
    }

    fn write_collection_of_f64_values(
        &mut self,
        key: &str,
        values: Option<&[f64]>,
    ) -> Result<(), SerializationError> {
        if let Some(values) = values {
            let mut items = Vec::with_capacity(values.len());
            for value in values {
                let number = serde_json::Number::from_f64(*value).ok_or_else(|| {
                    SerializationError::MalformedPayload(format!(
                        "non-finite float `{value}` cannot be written as json"
                    ))
                })?;
                items.push(Value::Number(number));
            }
            self.insert(key, Value::Array(items));
        }
        Ok(())
    }

    fn write_object_value(
        &mut self,
        key: &str,
        value: Option<&dyn Parsable>,
    ) -> Result<(), SerializationError> {
        if let Some(model) = value {
            let object = self.serialize_object(model)?;
            self.insert(key, object);
        }
        Ok(())
    }

    fn write_collection_of_object_values(
        &mut self,
        key: &str,
        values: Option<&[&dyn Parsable]>,
    ) -> Result<(), SerializationError> {
        if let Some(values) = values {
            let mut items = Vec::with_capacity(values.len());
            for value in values {
                items.push(self.serialize_object(*value)?);
            }
            self.insert(key, Value::Array(items));
        }
        Ok(())
    }

    fn write_null_value(&mut self, key: &str) -> Result<(), SerializationError> {
        self.insert(key, Value::Null);
        Ok(())
    }

    fn write_additional_data(
        &mut self,
        value: &AdditionalData,
    ) -> Result<(), SerializationError> {
        for (key, raw) in value {
            self.insert(key, raw.clone());
        }
        Ok(())
    }

    fn get_serialized_content(&mut self) -> Result<Bytes, SerializationError> {
        if self.consumed {
            return Err(SerializationError::WriterConsumed);
        }
        self.consumed = true;
        let value = match self.root.take() {
            Some(root) => root,
            None => Value::Object(std::mem::take(&mut self.object)),
        };
        let content = serde_json::to_vec(&value)
            .map_err(|err| SerializationError::MalformedPayload(err.to_string()))?;
        Ok(Bytes::from(content))
    }

    fn register_before_object_serialization(&mut self, handler: SerializationHandler) {
        self.before.insert(0, handler);
    }

    fn register_start_object_serialization(&mut self, handler: StartObjectSerializationHandler) {
        self.start.insert(0, handler);
    }

    fn register_after_object_serialization(&mut self, handler: SerializationHandler) {
        self.after.insert(0, handler);
    }
}
