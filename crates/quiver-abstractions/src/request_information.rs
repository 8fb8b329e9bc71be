use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method};

use crate::errors::SerializationError;
use crate::serialization::{Parsable, SerializationWriterFactory};

pub const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum RequestInformationError {
    #[error("request has no url")]
    MissingUrl,
    #[error("invalid header `{0}`")]
    InvalidHeader(String),
    #[error("invalid query parameters: {0}")]
    InvalidQuery(String),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// An abstract HTTP request: everything a transport needs to send it, and
/// nothing transport-specific.
///
/// Query parameters keep insertion order and are appended to the URL when the
/// final target is built.
#[derive(Debug, Clone)]
pub struct RequestInformation {
    pub http_method: Method,
    url: Option<String>,
    pub query_parameters: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub content: Option<Bytes>,
}

impl RequestInformation {
    pub fn new(http_method: Method) -> Self {
        Self {
            http_method,
            url: None,
            query_parameters: Vec::new(),
            headers: HeaderMap::new(),
            content: None,
        }
    }

    /// Sets the target URL. Any previously added query parameters are
    /// dropped; a URL set here is taken as fully resolved.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
        self.query_parameters.clear();
    }

    /// The final request target: the configured URL plus any accumulated
    /// query parameters.
    pub fn url(&self) -> Result<String, RequestInformationError> {
        let base = self.url.as_deref().ok_or(RequestInformationError::MissingUrl)?;
        if self.query_parameters.is_empty() {
            return Ok(base.to_string());
        }
        let query = serde_urlencoded::to_string(&self.query_parameters)
            .map_err(|err| RequestInformationError::InvalidQuery(err.to_string()))?;
        let separator = if base.contains('?') { '&' } else { '?' };
        Ok(format!("{base}{separator}{query}"))
    }

    pub fn add_query_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query_parameters.push((name.into(), value.into()));
    }

    /// Sets a header, replacing any existing value for the same name.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), RequestInformationError> {
        let name = HeaderName::try_from(name)
            .map_err(|_| RequestInformationError::InvalidHeader(name.to_string()))?;
        let value = HeaderValue::try_from(value)
            .map_err(|_| RequestInformationError::InvalidHeader(name.to_string()))?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.remove(name);
    }

    /// Serializes a model into the request body with the writer registered
    /// for `content_type`, and records that content type on the request.
    pub fn set_content_from_parsable(
        &mut self,
        writer_factory: &dyn SerializationWriterFactory,
        content_type: &str,
        value: &dyn Parsable,
    ) -> Result<(), RequestInformationError> {
        let mut writer = writer_factory.get_serialization_writer(content_type)?;
        writer.write_object_value("", Some(value))?;
        self.content = Some(writer.get_serialized_content()?);
        self.set_header(CONTENT_TYPE.as_str(), content_type)
    }

    /// Serializes a collection of models into the request body.
    pub fn set_content_from_parsable_collection(
        &mut self,
        writer_factory: &dyn SerializationWriterFactory,
        content_type: &str,
        values: &[&dyn Parsable],
    ) -> Result<(), RequestInformationError> {
        let mut writer = writer_factory.get_serialization_writer(content_type)?;
        writer.write_collection_of_object_values("", Some(values))?;
        self.content = Some(writer.get_serialized_content()?);
        self.set_header(CONTENT_TYPE.as_str(), content_type)
    }

    /// Attaches raw bytes as an `application/octet-stream` body.
    pub fn set_stream_content(&mut self, content: Bytes) -> Result<(), RequestInformationError> {
        self.content = Some(content);
        self.set_header(CONTENT_TYPE.as_str(), BINARY_CONTENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_appends_query_parameters_in_order() {
        let mut request = RequestInformation::new(Method::GET);
        request.set_url("https://example.com/users");
        request.add_query_parameter("$top", "5");
        request.add_query_parameter("$select", "displayName");
        assert_eq!(
            request.url().unwrap(),
            "https://example.com/users?%24top=5&%24select=displayName"
        );
    }

    #[test]
    fn set_url_drops_accumulated_parameters() {
        let mut request = RequestInformation::new(Method::GET);
        request.set_url("https://example.com/a");
        request.add_query_parameter("x", "1");
        request.set_url("https://example.com/b");
        assert_eq!(request.url().unwrap(), "https://example.com/b");
    }

    #[test]
    fn missing_url_fails_fast() {
        let request = RequestInformation::new(Method::GET);
        assert!(matches!(
            request.url(),
            Err(RequestInformationError::MissingUrl)
        ));
    }

    #[test]
    fn headers_replace_by_name() {
        let mut request = RequestInformation::new(Method::GET);
        request.set_header("Accept", "application/json").unwrap();
        request.set_header("accept", "text/plain").unwrap();
        assert_eq!(request.header("accept"), Some("text/plain"));
    }
}
