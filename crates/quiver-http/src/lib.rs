//! HTTP request adapter for Quiver-generated API clients: authentication,
//! retry middleware with exponential backoff and jitter, and content-type
//! driven (de)serialization through the registries. Transport concerns
//! (pooling, TLS, redirects) belong to the underlying client crate.

mod adapter;
mod retry;

pub use adapter::{HttpClientConfig, HttpClientRequestAdapter, build_client};
pub use retry::{RetryHandler, RetryHandlerOptions, RetryableResponse, retry_after_delay};
