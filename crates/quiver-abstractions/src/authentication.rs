use std::collections::HashSet;

use async_trait::async_trait;
use url::Url;

use crate::request_information::{RequestInformation, RequestInformationError};

#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    #[error("authenticated requests require https: {0}")]
    InsecureUrl(String),
    #[error("host `{0}` is not in the allowed hosts list")]
    HostNotAllowed(String),
    #[error("token acquisition failed: {0}")]
    TokenAcquisition(String),
    #[error(transparent)]
    Request(#[from] RequestInformationError),
}

/// Authenticates an outgoing request, typically by adding headers to it.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    async fn authenticate_request(
        &self,
        request: &mut RequestInformation,
    ) -> Result<(), AuthenticationError>;
}

/// Provider for APIs that need no authentication.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnonymousAuthenticationProvider;

#[async_trait]
impl AuthenticationProvider for AnonymousAuthenticationProvider {
    async fn authenticate_request(
        &self,
        _request: &mut RequestInformation,
    ) -> Result<(), AuthenticationError> {
        Ok(())
    }
}

/// Produces bearer tokens for request targets. The seam where a real
/// credential source (OAuth flows, managed identity, a key vault) plugs in.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn get_authorization_token(&self, url: &str) -> Result<String, AuthenticationError>;

    fn allowed_hosts(&self) -> &AllowedHostsValidator;
}

/// Case-insensitive host allowlist for token requests. An empty list allows
/// every host; tokens are never attached to non-https targets either way.
#[derive(Debug, Default, Clone)]
pub struct AllowedHostsValidator {
    allowed_hosts: HashSet<String>,
}

impl AllowedHostsValidator {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_hosts: hosts
                .into_iter()
                .map(|host| host.into().trim().to_ascii_lowercase())
                .filter(|host| !host.is_empty())
                .collect(),
        }
    }

    pub fn is_url_host_valid(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.allowed_hosts.is_empty() || self.allowed_hosts.contains(&host.to_ascii_lowercase())
    }

    /// Full check used before a token is requested for `url`.
    pub fn validate(&self, url: &str) -> Result<(), AuthenticationError> {
        let parsed =
            Url::parse(url).map_err(|_| AuthenticationError::InvalidUrl(url.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| AuthenticationError::InvalidUrl(url.to_string()))?;
        if parsed.scheme() != "https" && host != "localhost" && host != "127.0.0.1" {
            return Err(AuthenticationError::InsecureUrl(url.to_string()));
        }
        if !self.allowed_hosts.is_empty()
            && !self.allowed_hosts.contains(&host.to_ascii_lowercase())
        {
            return Err(AuthenticationError::HostNotAllowed(host.to_string()));
        }
        Ok(())
    }
}
