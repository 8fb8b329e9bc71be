mod common;

use serde_json::json;
use time::macros::{date, datetime};
use uuid::Uuid;

use common::User;
use quiver_abstractions::serialization::{
    ParseNodeExt, ParseNodeFactory, SerializationWriterFactory,
};
use quiver_json::{JsonParseNodeFactory, JsonSerializationWriterFactory};

fn serialize(user: &User) -> bytes::Bytes {
    let mut writer = JsonSerializationWriterFactory
        .get_serialization_writer("application/json")
        .unwrap();
    writer.write_object_value("", Some(user)).unwrap();
    writer.get_serialized_content().unwrap()
}

fn deserialize(content: &[u8]) -> User {
    let node = JsonParseNodeFactory
        .get_root_parse_node("application/json", content)
        .unwrap();
    node.as_ref().get_object_value(User::create).unwrap().unwrap()
}

#[test]
fn round_trip_is_byte_identical() {
    let user = User {
        id: Some(Uuid::parse_str("8f841f30-e6e3-439a-a812-ebd369559c36").unwrap()),
        display_name: Some("Diego Siciliani".to_string()),
        age: Some(21),
        is_active: Some(true),
        ..User::default()
    };

    let first = serialize(&user);
    assert_eq!(
        &first[..],
        br#"{"age":21,"displayName":"Diego Siciliani","id":"8f841f30-e6e3-439a-a812-ebd369559c36","isActive":true}"#
    );

    let parsed = deserialize(&first);
    let second = serialize(&parsed);
    assert_eq!(first, second);
}

#[test]
fn full_field_surface_round_trips() {
    let user = User {
        id: Some(Uuid::parse_str("76cabd60-f9aa-4d23-8958-64f5539b826a").unwrap()),
        display_name: Some("Megan Bowen".to_string()),
        age: Some(32),
        gpa: Some(3.25),
        is_active: Some(true),
        birthday: Some(date!(1992 - 03 - 30)),
        updated_at: Some(datetime!(2022-01-27 12:59:45.596 UTC)),
        business_phones: Some(vec!["+1 412 555 0109".to_string()]),
        mobile_phone: None,
        office_location: Some(common::OfficeLocation {
            city: Some("Dunhill".to_string()),
            ..common::OfficeLocation::default()
        }),
        ..User::default()
    };

    let first = serialize(&user);
    let parsed = deserialize(&first);

    assert_eq!(parsed.display_name.as_deref(), Some("Megan Bowen"));
    assert_eq!(parsed.birthday, Some(date!(1992 - 03 - 30)));
    assert_eq!(parsed.updated_at, Some(datetime!(2022-01-27 12:59:45.596 UTC)));
    assert_eq!(
        parsed.business_phones.as_deref(),
        Some(&["+1 412 555 0109".to_string()][..])
    );
    assert_eq!(parsed.mobile_phone, None);
    assert_eq!(
        parsed
            .office_location
            .as_ref()
            .and_then(|office| office.city.as_deref()),
        Some("Dunhill")
    );

    let second = serialize(&parsed);
    assert_eq!(first, second);
}

#[test]
fn zero_like_values_survive_the_round_trip() {
    let user = User {
        display_name: Some(String::new()),
        age: Some(0),
        is_active: Some(false),
        business_phones: Some(Vec::new()),
        ..User::default()
    };

    let first = serialize(&user);
    assert_eq!(
        &first[..],
        br#"{"age":0,"businessPhones":[],"displayName":"","isActive":false}"#
    );

    let parsed = deserialize(&first);
    assert_eq!(parsed.age, Some(0));
    assert_eq!(parsed.is_active, Some(false));
    assert_eq!(parsed.display_name.as_deref(), Some(""));
    assert_eq!(parsed.business_phones.as_deref(), Some(&[][..]));
    assert_eq!(serialize(&parsed), first);
}

#[test]
fn additional_data_is_preserved() {
    let content = br#"{"displayName":"X","unknownField":42}"#;
    let parsed = deserialize(content);

    assert_eq!(parsed.display_name.as_deref(), Some("X"));
    assert_eq!(parsed.additional_data.get("unknownField"), Some(&json!(42)));

    let reserialized = serialize(&parsed);
    assert_eq!(&reserialized[..], &content[..]);
}

#[test]
fn nested_unknown_structures_are_preserved_verbatim() {
    let content = br#"{"displayName":"X","extras":{"nested":[1,2,{"deep":true}]}}"#;
    let parsed = deserialize(content);
    assert_eq!(
        parsed.additional_data.get("extras"),
        Some(&json!({"nested": [1, 2, {"deep": true}]}))
    );
    assert_eq!(&serialize(&parsed)[..], &content[..]);
}

#[test]
fn null_fields_deserialize_as_absent() {
    let parsed = deserialize(br#"{"displayName":null,"age":21}"#);
    assert_eq!(parsed.display_name, None);
    assert_eq!(parsed.age, Some(21));
    // Absent stays absent on the way back out.
    assert_eq!(&serialize(&parsed)[..], br#"{"age":21}"#);
}
