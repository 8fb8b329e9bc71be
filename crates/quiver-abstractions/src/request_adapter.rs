use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::request_information::RequestInformation;
use crate::serialization::{
    FromParseNode, Parsable, ParsableFactory, SerializationWriterFactory,
};

/// Translates abstract request information into native HTTP requests and
/// deserialized response models. Implemented by the transport crate;
/// generated request builders only ever talk to this contract.
#[async_trait]
pub trait RequestAdapter: Send + Sync {
    /// The writer factory in use, exposed so request builders can serialize
    /// bodies with the same configuration the adapter deserializes with.
    fn serialization_writer_factory(&self) -> Arc<dyn SerializationWriterFactory>;

    fn base_url(&self) -> &str;

    fn set_base_url(&mut self, base_url: String);

    /// Executes the request and deserializes the response body into a model.
    /// `Ok(None)` means the service returned no content.
    async fn send<T: Parsable + Send>(
        &self,
        request: RequestInformation,
        factory: ParsableFactory<T>,
    ) -> Result<Option<T>, ApiError>;

    /// Executes the request and deserializes the response body into a model
    /// collection.
    async fn send_collection<T: Parsable + Send>(
        &self,
        request: RequestInformation,
        factory: ParsableFactory<T>,
    ) -> Result<Option<Vec<T>>, ApiError>;

    /// Executes the request and deserializes the response body into a single
    /// primitive value.
    async fn send_primitive<T: FromParseNode + Send>(
        &self,
        request: RequestInformation,
    ) -> Result<Option<T>, ApiError>;

    /// Executes the request, expecting no response content.
    async fn send_no_content(&self, request: RequestInformation) -> Result<(), ApiError>;

    /// Wraps the adapter's factories in the backing-store proxies so every
    /// model that passes through it gets change tracking.
    fn enable_backing_store(&mut self);
}
