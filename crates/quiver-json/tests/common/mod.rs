//! Hand-written stand-ins for generated model code, shaped the way the
//! generator emits them: optional fields, wire-named field tables, a factory
//! per type.

// Each test binary exercises a subset of these models.
#![allow(dead_code)]

use std::collections::HashMap;

use serde_json::Value;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use quiver_abstractions::SerializationError;
use quiver_abstractions::serialization::{
    AdditionalData, AdditionalDataHolder, FieldDeserializer, FieldDeserializerMap, Parsable,
    ParseNode, ParseNodeExt, SerializationWriter,
};
use quiver_abstractions::store::{BackedModel, BackingStore, InMemoryBackingStore};

#[derive(Default)]
pub struct OfficeLocation {
    pub city: Option<String>,
    pub additional_data: AdditionalData,
}

impl OfficeLocation {
    pub fn create(_node: &dyn ParseNode) -> Result<Self, SerializationError> {
        Ok(Self::default())
    }
}

impl AdditionalDataHolder for OfficeLocation {
    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

impl Parsable for OfficeLocation {
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<(), SerializationError> {
        writer.write_string_value("city", self.city.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn field_deserializers() -> FieldDeserializerMap<Self> {
        HashMap::from([(
            "city",
            (|model: &mut Self, node: &dyn ParseNode| {
                model.city = node.get_string_value()?;
                Ok(())
            }) as FieldDeserializer<Self>,
        )])
    }
}

#[derive(Default)]
pub struct User {
    pub id: Option<Uuid>,
    pub display_name: Option<String>,
    pub age: Option<i64>,
    pub gpa: Option<f64>,
    pub is_active: Option<bool>,
    pub birthday: Option<Date>,
    pub updated_at: Option<OffsetDateTime>,
    pub business_phones: Option<Vec<String>>,
    pub mobile_phone: Option<String>,
    pub office_location: Option<OfficeLocation>,
    pub additional_data: AdditionalData,
}

impl User {
    pub fn create(_node: &dyn ParseNode) -> Result<Self, SerializationError> {
        Ok(Self::default())
    }
}

impl AdditionalDataHolder for User {
    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

impl Parsable for User {
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<(), SerializationError> {
        writer.write_uuid_value("id", self.id)?;
        writer.write_string_value("displayName", self.display_name.as_deref())?;
        writer.write_i64_value("age", self.age)?;
        writer.write_f64_value("gpa", self.gpa)?;
        writer.write_bool_value("isActive", self.is_active)?;
        writer.write_date_value("birthday", self.birthday)?;
        writer.write_datetime_value("updatedAt", self.updated_at)?;
        writer.write_collection_of_string_values(
            "businessPhones",
            self.business_phones.as_deref(),
        )?;
        writer.write_string_value("mobilePhone", self.mobile_phone.as_deref())?;
        writer.write_object_value(
            "officeLocation",
            self.office_location.as_ref().map(|o| o as &dyn Parsable),
        )?;
        writer.write_additional_data(&self.additional_data)
    }

    fn field_deserializers() -> FieldDeserializerMap<Self> {
        HashMap::from([
            (
                "id",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.id = node.get_uuid_value()?;
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "displayName",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.display_name = node.get_string_value()?;
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "age",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.age = node.get_i64_value()?;
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "gpa",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.gpa = node.get_f64_value()?;
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "isActive",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.is_active = node.get_bool_value()?;
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "birthday",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.birthday = node.get_date_value()?;
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "updatedAt",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.updated_at = node.get_datetime_value()?;
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "businessPhones",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.business_phones = node.get_collection_of_primitive_values::<String>()?;
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "mobilePhone",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.mobile_phone = node.get_string_value()?;
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "officeLocation",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.office_location = node.get_object_value(OfficeLocation::create)?;
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
        ])
    }
}

#[derive(Default)]
pub struct Object1 {
    pub one: Option<String>,
    pub additional_data: AdditionalData,
}

#[derive(Default)]
pub struct Object2 {
    pub two: Option<String>,
    pub additional_data: AdditionalData,
}

/// Polymorphic payload dispatched on the reserved `objectType` field.
pub enum Shape {
    One(Object1),
    Two(Object2),
}

impl Shape {
    pub fn create(node: &dyn ParseNode) -> Result<Self, SerializationError> {
        let discriminator = match node.get_child_node("objectType") {
            Some(child) => child.get_string_value()?,
            None => None,
        };
        match discriminator.as_deref() {
            Some("obj1") => Ok(Self::One(Object1::default())),
            Some("obj2") => Ok(Self::Two(Object2::default())),
            Some(other) => Err(SerializationError::MalformedPayload(format!(
                "unknown objectType `{other}`"
            ))),
            None => Err(SerializationError::NullRequiredField {
                field: "objectType",
            }),
        }
    }
}

impl AdditionalDataHolder for Shape {
    fn additional_data(&self) -> &AdditionalData {
        match self {
            Self::One(object) => &object.additional_data,
            Self::Two(object) => &object.additional_data,
        }
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        match self {
            Self::One(object) => &mut object.additional_data,
            Self::Two(object) => &mut object.additional_data,
        }
    }
}

impl Parsable for Shape {
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<(), SerializationError> {
        match self {
            Self::One(object) => {
                writer.write_string_value("objectType", Some("obj1"))?;
                writer.write_string_value("one", object.one.as_deref())?;
            }
            Self::Two(object) => {
                writer.write_string_value("objectType", Some("obj2"))?;
                writer.write_string_value("two", object.two.as_deref())?;
            }
        }
        writer.write_additional_data(self.additional_data())
    }

    fn field_deserializers() -> FieldDeserializerMap<Self> {
        HashMap::from([
            (
                "objectType",
                // Consumed by the factory before assignment starts.
                (|_model: &mut Self, _node: &dyn ParseNode| Ok(())) as FieldDeserializer<Self>,
            ),
            (
                "one",
                (|model: &mut Self, node: &dyn ParseNode| {
                    if let Self::One(object) = model {
                        object.one = node.get_string_value()?;
                    }
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "two",
                (|model: &mut Self, node: &dyn ParseNode| {
                    if let Self::Two(object) = model {
                        object.two = node.get_string_value()?;
                    }
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
        ])
    }
}

/// Change-tracked user: field state lives in the backing store, so dirty
/// tracking and partial serialization come for free.
pub struct BackedUser {
    store: InMemoryBackingStore,
    additional_data: AdditionalData,
}

impl BackedUser {
    pub fn new() -> Self {
        Self {
            store: InMemoryBackingStore::new(),
            additional_data: AdditionalData::new(),
        }
    }

    pub fn create(_node: &dyn ParseNode) -> Result<Self, SerializationError> {
        Ok(Self::new())
    }

    pub fn display_name(&self) -> Option<String> {
        match self.store.get("displayName") {
            Some(Value::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn set_display_name(&self, value: Option<String>) {
        self.store
            .set("displayName", value.map(Value::String).unwrap_or(Value::Null));
    }

    pub fn age(&self) -> Option<i64> {
        self.store.get("age").and_then(|value| value.as_i64())
    }

    pub fn set_age(&self, value: Option<i64>) {
        self.store
            .set("age", value.map(Value::from).unwrap_or(Value::Null));
    }

    pub fn is_active(&self) -> Option<bool> {
        self.store.get("isActive").and_then(|value| value.as_bool())
    }

    pub fn set_is_active(&self, value: Option<bool>) {
        self.store
            .set("isActive", value.map(Value::Bool).unwrap_or(Value::Null));
    }
}

impl AdditionalDataHolder for BackedUser {
    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

impl Parsable for BackedUser {
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<(), SerializationError> {
        writer.write_string_value("displayName", self.display_name().as_deref())?;
        writer.write_i64_value("age", self.age())?;
        writer.write_bool_value("isActive", self.is_active())
    }

    fn field_deserializers() -> FieldDeserializerMap<Self> {
        HashMap::from([
            (
                "displayName",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.set_display_name(node.get_string_value()?);
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "age",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.set_age(node.get_i64_value()?);
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
            (
                "isActive",
                (|model: &mut Self, node: &dyn ParseNode| {
                    model.set_is_active(node.get_bool_value()?);
                    Ok(())
                }) as FieldDeserializer<Self>,
            ),
        ])
    }

    fn backing_store(&self) -> Option<&dyn BackingStore> {
        Some(&self.store)
    }
}

impl BackedModel for BackedUser {
    fn store(&self) -> &dyn BackingStore {
        &self.store
    }
}
