use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use tracing::{info, warn};
use wreq::Client;

use quiver_abstractions::api_client_builder::{
    enable_backing_store_for_parse_node_factory,
    enable_backing_store_for_serialization_writer_factory,
};
use quiver_abstractions::authentication::AuthenticationProvider;
use quiver_abstractions::errors::{ApiError, SerializationError};
use quiver_abstractions::request_adapter::RequestAdapter;
use quiver_abstractions::request_information::RequestInformation;
use quiver_abstractions::serialization::{
    FromParseNode, Parsable, ParsableFactory, ParseNode, ParseNodeExt, ParseNodeFactory,
    ParseNodeFactoryRegistry, SerializationWriterFactory, SerializationWriterFactoryRegistry,
};
use quiver_json::{JsonParseNodeFactory, JsonSerializationWriterFactory};

use crate::retry::{RetryHandler, RetryHandlerOptions};

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub retry: RetryHandlerOptions,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(100),
            retry: RetryHandlerOptions::default(),
        }
    }
}

pub fn build_client(config: &HttpClientConfig) -> Result<Client, wreq::Error> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()
}

/// Request adapter over an async HTTP client: authenticates, sends with the
/// retry policy, and deserializes responses through the content-type
/// registries.
pub struct HttpClientRequestAdapter {
    authentication_provider: Arc<dyn AuthenticationProvider>,
    parse_node_factory: Arc<dyn ParseNodeFactory>,
    serialization_writer_factory: Arc<dyn SerializationWriterFactory>,
    client: Client,
    config: HttpClientConfig,
    base_url: String,
}

impl HttpClientRequestAdapter {
    /// Adapter wired with the JSON codec on both sides, the default
    /// configuration a generated client starts from.
    pub fn new(
        authentication_provider: Arc<dyn AuthenticationProvider>,
    ) -> Result<Self, wreq::Error> {
        let mut parse_nodes = ParseNodeFactoryRegistry::new();
        parse_nodes
            .register(Arc::new(JsonParseNodeFactory))
            .expect("the json factory declares a content type");
        let mut writers = SerializationWriterFactoryRegistry::new();
        writers
            .register(Arc::new(JsonSerializationWriterFactory))
            .expect("the json factory declares a content type");
        Self::with_options(
            authentication_provider,
            Arc::new(parse_nodes),
            Arc::new(writers),
            HttpClientConfig::default(),
        )
    }

    pub fn with_options(
        authentication_provider: Arc<dyn AuthenticationProvider>,
        parse_node_factory: Arc<dyn ParseNodeFactory>,
        serialization_writer_factory: Arc<dyn SerializationWriterFactory>,
        config: HttpClientConfig,
    ) -> Result<Self, wreq::Error> {
        let client = build_client(&config)?;
        Ok(Self {
            authentication_provider,
            parse_node_factory,
            serialization_writer_factory,
            client,
            config,
            base_url: String::new(),
        })
    }

    fn resolve_url(&self, request: &RequestInformation) -> Result<String, ApiError> {
        let url = request.url()?;
        if url.starts_with("http://") || url.starts_with("https://") || self.base_url.is_empty() {
            return Ok(url);
        }
        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        ))
    }

    async fn send_request(
        &self,
        mut request: RequestInformation,
    ) -> Result<(StatusCode, HeaderMap, Bytes), ApiError> {
        self.authentication_provider
            .authenticate_request(&mut request)
            .await?;
        let url = self.resolve_url(&request)?;
        let method = request.http_method.clone();
        let headers = request.headers;
        let body = request.content;

        let started_at = Instant::now();
        info!(event = "request", method = %method, url = %url);

        let retry = RetryHandler::new(self.config.retry.clone());
        let response = retry
            .send(&method, |attempt| {
                let client = self.client.clone();
                let method = method.clone();
                let url = url.clone();
                let headers = headers.clone();
                let body = body.clone();
                async move {
                    let mut builder = client.request(method, &url);
                    for (name, value) in headers.iter() {
                        if let Ok(value) = value.to_str() {
                            builder = builder.header(name.as_str(), value);
                        }
                    }
                    if attempt > 0 {
                        builder = builder.header("retry-attempt", attempt.to_string().as_str());
                    }
                    if let Some(body) = body {
                        builder = builder.body(body);
                    }
                    builder.send().await
                }
            })
            .await
            .map_err(|err| {
                warn!(
                    event = "response",
                    status = "error",
                    elapsed_ms = started_at.elapsed().as_millis() as u64,
                    error = %err
                );
                ApiError::Transport(err.to_string())
            })?;

        let status = response.status();
        let response_headers = response.headers().clone();
        info!(
            event = "response",
            status = status.as_u16(),
            elapsed_ms = started_at.elapsed().as_millis() as u64
        );
        let body = response
            .bytes()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok((status, response_headers, body))
    }

    fn root_parse_node(
        &self,
        headers: &HeaderMap,
        body: &Bytes,
    ) -> Result<Option<Box<dyn ParseNode>>, ApiError> {
        if body.is_empty() {
            return Ok(None);
        }
        let content_type = response_content_type(headers)
            .ok_or(ApiError::Serialization(SerializationError::EmptyContentType))?;
        let node = self
            .parse_node_factory
            .get_root_parse_node(&content_type, body)?;
        Ok(Some(node))
    }
}

fn response_content_type(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    Some(raw.split(';').next()?.trim().to_ascii_lowercase())
}

#[async_trait]
impl RequestAdapter for HttpClientRequestAdapter {
    fn serialization_writer_factory(&self) -> Arc<dyn SerializationWriterFactory> {
        self.serialization_writer_factory.clone()
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn set_base_url(&mut self, base_url: String) {
        self.base_url = base_url;
    }

    async fn send<T: Parsable + Send>(
        &self,
        request: RequestInformation,
        factory: ParsableFactory<T>,
    ) -> Result<Option<T>, ApiError> {
        let (status, headers, body) = self.send_request(request).await?;
        if !status.is_success() {
            return Err(ApiError::Service {
                status,
                headers,
                body,
            });
        }
        match self.root_parse_node(&headers, &body)? {
            None => Ok(None),
            Some(node) => Ok(node.as_ref().get_object_value(factory)?),
        }
    }

    async fn send_collection<T: Parsable + Send>(
        &self,
        request: RequestInformation,
        factory: ParsableFactory<T>,
    ) -> Result<Option<Vec<T>>, ApiError> {
        let (status, headers, body) = self.send_request(request).await?;
        if !status.is_success() {
            return Err(ApiError::Service {
                status,
                headers,
                body,
            });
        }
        match self.root_parse_node(&headers, &body)? {
            None => Ok(None),
            Some(node) => Ok(node.as_ref().get_collection_of_object_values(factory)?),
        }
    }

    async fn send_primitive<T: FromParseNode + Send>(
        &self,
        request: RequestInformation,
    ) -> Result<Option<T>, ApiError> {
        let (status, headers, body) = self.send_request(request).await?;
        if !status.is_success() {
            return Err(ApiError::Service {
                status,
                headers,
                body,
            });
        }
        match self.root_parse_node(&headers, &body)? {
            None => Ok(None),
            Some(node) => Ok(T::from_parse_node(node.as_ref())?),
        }
    }

    async fn send_no_content(&self, request: RequestInformation) -> Result<(), ApiError> {
        let (status, headers, body) = self.send_request(request).await?;
        if !status.is_success() {
            return Err(ApiError::Service {
                status,
                headers,
                body,
            });
        }
        Ok(())
    }

    fn enable_backing_store(&mut self) {
        self.parse_node_factory =
            enable_backing_store_for_parse_node_factory(self.parse_node_factory.clone());
        self.serialization_writer_factory = enable_backing_store_for_serialization_writer_factory(
            self.serialization_writer_factory.clone(),
        );
    }
}
