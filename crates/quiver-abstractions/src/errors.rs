use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::authentication::AuthenticationError;
use crate::request_information::RequestInformationError;

/// Errors raised while reading or writing payloads, or while resolving a
/// codec for a content type.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("no factory registered for content type `{0}`")]
    NoFactoryRegistered(String),
    #[error("content type cannot be empty")]
    EmptyContentType,
    #[error("factory for `{valid}` cannot handle content type `{requested}`")]
    ContentTypeMismatch { requested: String, valid: String },
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("cannot read {found} node as {expected}")]
    UnexpectedNodeType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("unknown member `{value}` for enum {enum_type}")]
    UnknownEnumValue {
        value: String,
        enum_type: &'static str,
    },
    #[error("required field `{field}` was null")]
    NullRequiredField { field: &'static str },
    #[error("serialized content was already taken from this writer")]
    WriterConsumed,
}

/// Error surface of a request adapter, as seen by generated client code.
///
/// `Service` carries the final response of a failed request unmodified: once
/// the retry budget is exhausted, the last response is surfaced as-is rather
/// than being replaced by a synthetic retry error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("service returned {status}")]
    Service {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error(transparent)]
    Request(#[from] RequestInformationError),
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}
