use std::sync::Arc;

use bytes::Bytes;
use time::{Date, Duration, OffsetDateTime, Time};
use uuid::Uuid;

use crate::errors::SerializationError;
use crate::serialization::parsable::{AdditionalData, EnumValue, Parsable};

/// Handler invoked around the serialization of a model object.
pub type SerializationHandler =
    Arc<dyn Fn(&dyn Parsable) -> Result<(), SerializationError> + Send + Sync>;

/// Handler invoked right after the serialization of a model object starts,
/// with access to the writer the object's fields will land in.
pub type StartObjectSerializationHandler = Arc<
    dyn Fn(&dyn Parsable, &mut dyn SerializationWriter) -> Result<(), SerializationError>
        + Send
        + Sync,
>;

/// Format-agnostic sink for serializing typed values.
///
/// Absence policy, applied uniformly: `Some(value)` writes the literal value,
/// including zero-like values such as `0`, `false`, the empty string, and
/// empty collections, while `None` omits the key entirely. An explicit null
/// is only ever produced through [`write_null_value`], which is how the
/// backing-store proxy records fields that were deliberately cleared.
///
/// [`write_null_value`]: SerializationWriter::write_null_value
pub trait SerializationWriter: Send + Sync {
    fn write_string_value(
        &mut self,
        key: &str,
        value: Option<&str>,
    ) -> Result<(), SerializationError>;
    fn write_bool_value(&mut self, key: &str, value: Option<bool>)
    -> Result<(), SerializationError>;
    fn write_i64_value(&mut self, key: &str, value: Option<i64>) -> Result<(), SerializationError>;
    fn write_f64_value(&mut self, key: &str, value: Option<f64>) -> Result<(), SerializationError>;
    fn write_uuid_value(&mut self, key: &str, value: Option<Uuid>)
    -> Result<(), SerializationError>;
    fn write_datetime_value(
        &mut self,
        key: &str,
        value: Option<OffsetDateTime>,
    ) -> Result<(), SerializationError>;
    fn write_date_value(&mut self, key: &str, value: Option<Date>)
    -> Result<(), SerializationError>;
    fn write_time_value(&mut self, key: &str, value: Option<Time>)
    -> Result<(), SerializationError>;
    fn write_duration_value(
        &mut self,
        key: &str,
        value: Option<Duration>,
    ) -> Result<(), SerializationError>;
    /// Writes the bytes as a base64 string.
    fn write_bytes_value(
        &mut self,
        key: &str,
        value: Option<&[u8]>,
    ) -> Result<(), SerializationError>;

    fn write_collection_of_string_values(
        &mut self,
        key: &str,
        values: Option<&[String]>,
    ) -> Result<(), SerializationError>;
    fn write_collection_of_bool_values(
        &mut self,
        key: &str,
        values: Option<&[bool]>,
    ) -> Result<(), SerializationError>;
    fn write_collection_of_i64_values(
        &mut self,
        key: &str,
        values: Option<&[i64]>,
    ) -> Result<(), SerializationError>;
    fn write_collection_of_f64_values(
        &mut self,
        key: &str,
        values: Option<&[f64]>,
    ) -> Result<(), SerializationError>;

    /// Writes a nested model object. An empty key writes the object as the
    /// root of the output. Registered handlers run around the object's own
    /// `serialize`.
    fn write_object_value(
        &mut self,
        key: &str,
        value: Option<&dyn Parsable>,
    ) -> Result<(), SerializationError>;

    fn write_collection_of_object_values(
        &mut self,
        key: &str,
        values: Option<&[&dyn Parsable]>,
    ) -> Result<(), SerializationError>;

    /// Writes an explicit null for the given key.
    fn write_null_value(&mut self, key: &str) -> Result<(), SerializationError>;

    /// Writes every entry of an additional-data bag verbatim.
    fn write_additional_data(&mut self, value: &AdditionalData)
    -> Result<(), SerializationError>;

    /// Finalizes the writer into an immutable byte sequence. One-shot: the
    /// writer is consumed by this call and further use fails with
    /// [`SerializationError::WriterConsumed`].
    fn get_serialized_content(&mut self) -> Result<Bytes, SerializationError>;

    /// Handlers run front to back; registering prepends, so the handler of an
    /// outer proxy wrapper runs before the ones installed beneath it.
    fn register_before_object_serialization(&mut self, handler: SerializationHandler);
    fn register_start_object_serialization(&mut self, handler: StartObjectSerializationHandler);
    fn register_after_object_serialization(&mut self, handler: SerializationHandler);
}

/// Typed helpers over a serialization writer. Implemented on the trait object
/// so the base trait stays object safe while these stay generic.
pub trait SerializationWriterExt {
    fn write_enum_value<T: EnumValue>(
        &mut self,
        key: &str,
        value: Option<&T>,
    ) -> Result<(), SerializationError>;

    fn write_collection_of_enum_values<T: EnumValue>(
        &mut self,
        key: &str,
        values: Option<&[T]>,
    ) -> Result<(), SerializationError>;

    /// Writes a collection of models without the caller having to build the
    /// `&dyn Parsable` slice by hand.
    fn write_objects<T: Parsable>(
        &mut self,
        key: &str,
        values: Option<&[T]>,
    ) -> Result<(), SerializationError>;
}

impl<'a> SerializationWriterExt for dyn SerializationWriter + 'a {
    fn write_enum_value<T: EnumValue>(
        &mut self,
        key: &str,
        value: Option<&T>,
    ) -> Result<(), SerializationError> {
        self.write_string_value(key, value.map(EnumValue::wire_name))
    }

    fn write_collection_of_enum_values<T: EnumValue>(
        &mut self,
        key: &str,
        values: Option<&[T]>,
    ) -> Result<(), SerializationError> {
        let names = values.map(|values| {
            values
                .iter()
                .map(|value| value.wire_name().to_string())
                .collect::<Vec<_>>()
        });
        self.write_collection_of_string_values(key, names.as_deref())
    }

    fn write_objects<T: Parsable>(
        &mut self,
        key: &str,
        values: Option<&[T]>,
    ) -> Result<(), SerializationError> {
        let refs = values.map(|values| {
            values
                .iter()
                .map(|value| value as &dyn Parsable)
                .collect::<Vec<_>>()
        });
        self.write_collection_of_object_values(key, refs.as_deref())
    }
}
