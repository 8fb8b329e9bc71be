//! Serialization contracts: the `Parsable` capability, format-agnostic parse
//! nodes and serialization writers, and the content-type keyed factory
//! registries that dispatch to concrete codecs.

mod content_type;
mod iso8601_duration;
mod parsable;
mod parse_node;
mod parse_node_factory;
mod serialization_writer;
mod serialization_writer_factory;


pub use iso8601_duration::{format_iso8601_duration, parse_iso8601_duration};
pub use parsable::{
    AdditionalData, AdditionalDataHolder, EnumValue, FieldDeserializer, FieldDeserializerMap,
    Parsable, ParsableFactory,
};
pub use parse_node::{
    AssignFieldValuesHandler, FromParseNode, ParseNode, ParseNodeExt,
};
pub use parse_node_factory::{ParseNodeFactory, ParseNodeFactoryRegistry, ParseNodeProxyFactory};
pub use serialization_writer::{
    SerializationHandler, SerializationWriter, SerializationWriterExt,
    StartObjectSerializationHandler,
};
pub use serialization_writer_factory::{
    SerializationWriterFactory, SerializationWriterFactoryRegistry,
    SerializationWriterProxyFactory,
};
