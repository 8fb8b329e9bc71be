use std::sync::Arc;

use serde_json::Value;
use time::{Date, Duration, OffsetDateTime, Time};
use uuid::Uuid;

use crate::errors::SerializationError;
use crate::serialization::parsable::{EnumValue, Parsable, ParsableFactory};

/// Handler invoked around the field-assignment pass of an object
/// deserialization. Handlers are fallible so a failing store mutation
/// surfaces instead of being swallowed.
pub type AssignFieldValuesHandler =
    Arc<dyn Fn(&dyn Parsable) -> Result<(), SerializationError> + Send + Sync>;

/// Format-agnostic cursor over a deserialization input tree.
///
/// Primitive getters return `Ok(None)` when the underlying node is null; a
/// raw value that cannot be coerced to the requested type is a hard failure.
/// `get_child_node` distinguishes "no such child" (`None`) from "child whose
/// value is null" (`Some` of a null node); the backing-store null-tracking
/// contract depends on that distinction.
pub trait ParseNode: Send + Sync {
    fn get_string_value(&self) -> Result<Option<String>, SerializationError>;
    fn get_bool_value(&self) -> Result<Option<bool>, SerializationError>;
    fn get_i64_value(&self) -> Result<Option<i64>, SerializationError>;
    fn get_f64_value(&self) -> Result<Option<f64>, SerializationError>;
    fn get_uuid_value(&self) -> Result<Option<Uuid>, SerializationError>;
    fn get_datetime_value(&self) -> Result<Option<OffsetDateTime>, SerializationError>;
    fn get_date_value(&self) -> Result<Option<Date>, SerializationError>;
    fn get_time_value(&self) -> Result<Option<Time>, SerializationError>;
    fn get_duration_value(&self) -> Result<Option<Duration>, SerializationError>;
    /// Base64-decoded byte content of the node.
    fn get_bytes_value(&self) -> Result<Option<Vec<u8>>, SerializationError>;

    fn is_null(&self) -> bool;

    /// A new parse node for the given child property, or `None` when the
    /// property is absent. Registered handlers propagate to the child.
    fn get_child_node(&self, identifier: &str) -> Option<Box<dyn ParseNode>>;

    /// The item nodes of a collection node. Registered handlers propagate.
    fn get_children(&self) -> Result<Vec<Box<dyn ParseNode>>, SerializationError>;

    /// Property names of the current object node, empty for non-objects.
    fn field_names(&self) -> Vec<String>;

    /// The raw value of the node, used to capture unrecognized fields into a
    /// model's additional-data bag.
    fn get_raw_value(&self) -> Value;

    /// Handlers run front to back; registering prepends, so the handler of an
    /// outer proxy wrapper runs before the ones installed beneath it.
    fn before_assign_handlers(&self) -> &[AssignFieldValuesHandler];
    fn after_assign_handlers(&self) -> &[AssignFieldValuesHandler];
    fn register_before_assign_field_values(&mut self, handler: AssignFieldValuesHandler);
    fn register_after_assign_field_values(&mut self, handler: AssignFieldValuesHandler);
}

/// Conversion from a parse node, implemented for the primitive types a node
/// can yield directly. Powers primitive collections and primitive response
/// bodies.
pub trait FromParseNode: Sized {
    fn from_parse_node(node: &dyn ParseNode) -> Result<Option<Self>, SerializationError>;
}

macro_rules! impl_from_parse_node {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(impl FromParseNode for $ty {
            fn from_parse_node(node: &dyn ParseNode) -> Result<Option<Self>, SerializationError> {
                node.$method()
            }
        })*
    };
}

impl_from_parse_node! {
    String => get_string_value,
    bool => get_bool_value,
    i64 => get_i64_value,
    f64 => get_f64_value,
    Uuid => get_uuid_value,
    OffsetDateTime => get_datetime_value,
    Date => get_date_value,
    Time => get_time_value,
    Duration => get_duration_value,
    Vec<u8> => get_bytes_value,
}

/// Typed helpers over a parse node. Implemented on the trait object so the
/// base trait stays object safe while these stay generic.
pub trait ParseNodeExt {
    /// Deserializes the current node into a model.
    ///
    /// The factory constructs the instance (inspecting a discriminator child
    /// if it wants to), then every property of the node is routed through the
    /// model's field table; properties with no matching entry land in the
    /// model's additional-data bag. Registered handlers run before and after
    /// the assignment pass. Returns `None` for a null node.
    fn get_object_value<T: Parsable>(
        &self,
        factory: ParsableFactory<T>,
    ) -> Result<Option<T>, SerializationError>;

    fn get_collection_of_object_values<T: Parsable>(
        &self,
        factory: ParsableFactory<T>,
    ) -> Result<Option<Vec<T>>, SerializationError>;

    fn get_enum_value<T: EnumValue>(&self) -> Result<Option<T>, SerializationError>;

    fn get_collection_of_enum_values<T: EnumValue>(
        &self,
    ) -> Result<Option<Vec<T>>, SerializationError>;

    fn get_collection_of_primitive_values<T: FromParseNode>(
        &self,
    ) -> Result<Option<Vec<T>>, SerializationError>;
}

impl<'a> ParseNodeExt for dyn ParseNode + 'a {
    fn get_object_value<T: Parsable>(
        &self,
        factory: ParsableFactory<T>,
    ) -> Result<Option<T>, SerializationError> {
        if self.is_null() {
            return Ok(None);
        }
        let mut value = factory(self)?;
        for handler in self.before_assign_handlers() {
            handler(&value)?;
        }
        let deserializers = T::field_deserializers();
        for name in self.field_names() {
            let Some(child) = self.get_child_node(&name) else {
                continue;
            };
            match deserializers.get(name.as_str()) {
                Some(deserialize) => deserialize(&mut value, child.as_ref())?,
                None => {
                    value
                        .additional_data_mut()
                        .insert(name, child.get_raw_value());
                }
            }
        }
        for handler in self.after_assign_handlers() {
            handler(&value)?;
        }
        Ok(Some(value))
    }

    fn get_collection_of_object_values<T: Parsable>(
        &self,
        factory: ParsableFactory<T>,
    ) -> Result<Option<Vec<T>>, SerializationError> {
        if self.is_null() {
            return Ok(None);
        }
        let mut values = Vec::new();
        for child in self.get_children()? {
            if let Some(value) = child.as_ref().get_object_value(factory)? {
                values.push(value);
            }
        }
        Ok(Some(values))
    }

    fn get_enum_value<T: EnumValue>(&self) -> Result<Option<T>, SerializationError> {
        match self.get_string_value()? {
            None => Ok(None),
            Some(raw) => match T::from_wire_name(&raw) {
                Some(value) => Ok(Some(value)),
                None => Err(SerializationError::UnknownEnumValue {
                    value: raw,
                    enum_type: std::any::type_name::<T>(),
                }),
            },
        }
    }

    fn get_collection_of_enum_values<T: EnumValue>(
        &self,
    ) -> Result<Option<Vec<T>>, SerializationError> {
        if self.is_null() {
            return Ok(None);
        }
        let mut values = Vec::new();
        for child in self.get_children()? {
            if let Some(value) = child.as_ref().get_enum_value()? {
                values.push(value);
            }
        }
        Ok(Some(values))
    }

    fn get_collection_of_primitive_values<T: FromParseNode>(
        &self,
    ) -> Result<Option<Vec<T>>, SerializationError> {
        if self.is_null() {
            return Ok(None);
        }
        let mut values = Vec::new();
        for child in self.get_children()? {
            if let Some(value) = T::from_parse_node(child.as_ref())? {
                values.push(value);
            }
        }
        Ok(Some(values))
    }
}
