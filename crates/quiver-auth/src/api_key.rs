use async_trait::async_trait;

use quiver_abstractions::authentication::{
    AllowedHostsValidator, AuthenticationError, AuthenticationProvider,
};
use quiver_abstractions::request_information::RequestInformation;

/// Where an api key is carried on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLocation {
    QueryParameter,
    Header,
}

/// Authenticates requests with a fixed api key placed in a header or a query
/// parameter.
pub struct ApiKeyAuthenticationProvider {
    api_key: String,
    parameter_name: String,
    key_location: KeyLocation,
    allowed_hosts: AllowedHostsValidator,
}

impl ApiKeyAuthenticationProvider {
    pub fn new(
        api_key: impl Into<String>,
        parameter_name: impl Into<String>,
        key_location: KeyLocation,
        allowed_hosts: AllowedHostsValidator,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            parameter_name: parameter_name.into(),
            key_location,
            allowed_hosts,
        }
    }
}

#[async_trait]
impl AuthenticationProvider for ApiKeyAuthenticationProvider {
    async fn authenticate_request(
        &self,
        request: &mut RequestInformation,
    ) -> Result<(), AuthenticationError> {
        let url = request.url()?;
        self.allowed_hosts.validate(&url)?;
        match self.key_location {
            KeyLocation::QueryParameter => {
                request.add_query_parameter(self.parameter_name.clone(), self.api_key.clone());
            }
            KeyLocation::Header => {
                request.set_header(&self.parameter_name, &self.api_key)?;
            }
        }
        Ok(())
    }
}
