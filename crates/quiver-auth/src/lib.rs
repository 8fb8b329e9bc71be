//! Concrete authentication providers for Quiver-generated API clients. The
//! contracts live in `quiver-abstractions`; this crate supplies the common
//! implementations a generated client wires in at startup.

mod api_key;
mod bearer;

pub use api_key::{ApiKeyAuthenticationProvider, KeyLocation};
pub use bearer::{BaseBearerTokenAuthenticationProvider, StaticAccessTokenProvider};
