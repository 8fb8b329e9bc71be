//! JSON codec for Quiver-generated API clients: a tree-walking parse node
//! and serialization writer over an in-memory JSON value, plus the factories
//! that plug them into the content-type registries.

mod dates;
mod json_parse_node;
mod json_parse_node_factory;
mod json_serialization_writer;
mod json_serialization_writer_factory;

pub use json_parse_node::JsonParseNode;
pub use json_parse_node_factory::JsonParseNodeFactory;
pub use json_serialization_writer::JsonSerializationWriter;
pub use json_serialization_writer_factory::JsonSerializationWriterFactory;
