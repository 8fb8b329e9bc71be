use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::errors::SerializationError;
use crate::serialization::parse_node::ParseNode;
use crate::serialization::serialization_writer::SerializationWriter;
use crate::store::BackingStore;

/// Unrecognized payload fields, preserved verbatim for forward compatibility.
///
/// Keys are wire names; values are the raw payload values. A sorted map keeps
/// re-serialization deterministic.
pub type AdditionalData = BTreeMap<String, Value>;

/// Holder of the open-field bag every model carries.
pub trait AdditionalDataHolder {
    fn additional_data(&self) -> &AdditionalData;
    fn additional_data_mut(&mut self) -> &mut AdditionalData;
}

/// Deserializes one field of `T` from a parse node.
pub type FieldDeserializer<T> = fn(&mut T, &dyn ParseNode) -> Result<(), SerializationError>;

/// Field table: wire name to deserialization callback. Keys are exact wire
/// names; no case translation happens anywhere in the pipeline.
pub type FieldDeserializerMap<T> = HashMap<&'static str, FieldDeserializer<T>>;

/// Constructs a model instance from a parse node. The factory may inspect a
/// discriminator child of the node to pick which shape to construct before
/// field assignment runs.
pub type ParsableFactory<T> = fn(&dyn ParseNode) -> Result<T, SerializationError>;

/// Capability contract every generated model implements: write yourself to a
/// writer, and describe how your fields deserialize.
pub trait Parsable: AdditionalDataHolder + Send + Sync {
    /// Writes this model's fields to the given writer.
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<(), SerializationError>;

    /// The field table used to assign values during deserialization.
    fn field_deserializers() -> FieldDeserializerMap<Self>
    where
        Self: Sized;

    /// The optional backing-store association. Models that opt into change
    /// tracking return their store here; everything else keeps the default.
    /// Presence is tested through this association, never through type
    /// inspection.
    fn backing_store(&self) -> Option<&dyn BackingStore> {
        None
    }
}

/// Contract for wire-named enums. An unrecognized wire name is a hard
/// deserialization failure; there is no silent default member.
pub trait EnumValue: Sized {
    fn from_wire_name(name: &str) -> Option<Self>;
    fn wire_name(&self) -> &'static str;
}
