use std::sync::Arc;

use async_trait::async_trait;

use quiver_abstractions::authentication::{
    AccessTokenProvider, AllowedHostsValidator, AuthenticationError, AuthenticationProvider,
};
use quiver_abstractions::request_information::RequestInformation;

pub(crate) const AUTHORIZATION_HEADER: &str = "authorization";

/// Bearer-token provider: asks an [`AccessTokenProvider`] for a token for the
/// request target and injects it as `Authorization: Bearer <token>`. An
/// already-present authorization header is left alone.
pub struct BaseBearerTokenAuthenticationProvider {
    access_token_provider: Arc<dyn AccessTokenProvider>,
}

impl BaseBearerTokenAuthenticationProvider {
    pub fn new(access_token_provider: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            access_token_provider,
        }
    }
}

#[async_trait]
impl AuthenticationProvider for BaseBearerTokenAuthenticationProvider {
    async fn authenticate_request(
        &self,
        request: &mut RequestInformation,
    ) -> Result<(), AuthenticationError> {
        if request.header(AUTHORIZATION_HEADER).is_some() {
            return Ok(());
        }
        let url = request.url()?;
        self.access_token_provider.allowed_hosts().validate(&url)?;
        let token = self
            .access_token_provider
            .get_authorization_token(&url)
            .await?;
        request.set_header(AUTHORIZATION_HEADER, &format!("Bearer {token}"))?;
        Ok(())
    }
}

/// Access-token provider holding a fixed token, for services authenticated
/// with long-lived secrets and for tests. Real credential flows implement
/// [`AccessTokenProvider`] themselves.
pub struct StaticAccessTokenProvider {
    token: String,
    allowed_hosts: AllowedHostsValidator,
}

impl StaticAccessTokenProvider {
    pub fn new(token: impl Into<String>, allowed_hosts: AllowedHostsValidator) -> Self {
        Self {
            token: token.into(),
            allowed_hosts,
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticAccessTokenProvider {
    async fn get_authorization_token(&self, _url: &str) -> Result<String, AuthenticationError> {
        if self.token.is_empty() {
            return Err(AuthenticationError::TokenAcquisition(
                "no token configured".to_string(),
            ));
        }
        Ok(self.token.clone())
    }

    fn allowed_hosts(&self) -> &AllowedHostsValidator {
        &self.allowed_hosts
    }
}
