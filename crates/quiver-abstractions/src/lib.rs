//! Contracts shared by Quiver-generated API clients.
//!
//! This crate intentionally does **not** depend on any concrete HTTP client
//! or wire codec. It defines the capability contracts generated code is
//! written against: [`serialization::Parsable`], the parse-node and
//! serialization-writer abstractions with their content-type keyed
//! registries, the change-tracking [`store`], request information, and the
//! authentication seams. The sibling crates supply the concrete
//! implementations.

pub mod api_client_builder;
pub mod authentication;
pub mod errors;
pub mod request_adapter;
pub mod request_information;
pub mod serialization;
pub mod store;

pub use api_client_builder::{
    enable_backing_store_for_parse_node_factory, enable_backing_store_for_parse_node_registry,
    enable_backing_store_for_serialization_writer_factory,
    enable_backing_store_for_serialization_writer_registry,
};
pub use authentication::{
    AccessTokenProvider, AllowedHostsValidator, AnonymousAuthenticationProvider,
    AuthenticationError, AuthenticationProvider,
};
pub use errors::{ApiError, SerializationError};
pub use request_adapter::RequestAdapter;
pub use request_information::{RequestInformation, RequestInformationError, BINARY_CONTENT_TYPE};
pub use serialization::{
    AdditionalData, AdditionalDataHolder, AssignFieldValuesHandler, EnumValue, FieldDeserializer,
    FieldDeserializerMap, FromParseNode, Parsable, ParsableFactory, ParseNode, ParseNodeExt,
    ParseNodeFactory, ParseNodeFactoryRegistry, ParseNodeProxyFactory, SerializationHandler,
    SerializationWriter, SerializationWriterExt, SerializationWriterFactory,
    SerializationWriterFactoryRegistry, SerializationWriterProxyFactory,
    StartObjectSerializationHandler,
};
pub use store::{
    BackedModel, BackingStore, BackingStoreFactory, BackingStoreParseNodeFactory,
    BackingStoreSerializationWriterProxyFactory, InMemoryBackingStore,
    InMemoryBackingStoreFactory, SubscriptionCallback,
};
