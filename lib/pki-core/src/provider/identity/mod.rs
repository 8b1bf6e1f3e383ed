//! Delegated authentication against the Keycloak realm.
//!
//! The client never validates token signatures: it only reads the claims it
//! needs for navigation decisions. The backend validates every token it
//! receives.

use secrecy::SecretString;
use thiserror::Error;

use crate::provider::http_client::{self, StatusCode};

pub mod claims;
pub mod keycloak;
pub mod session;

#[cfg(test)]
mod test;
#[cfg(test)]
pub(crate) mod test_utilities;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Returns a currently valid access token
    async fn access_token(&self) -> Result<SecretString, IdentityError>;
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity provider HTTP error: {0}")]
    Http(#[from] http_client::Error),
    #[error("Identity provider rejected the request ({status}): {description}")]
    Rejected {
        status: StatusCode,
        description: String,
    },
    #[error("Malformed access token: {0}")]
    MalformedToken(String),
    #[error("Invalid identity provider URL: {0}")]
    InvalidUrl(String),
    #[error("Not authenticated")]
    NotAuthenticated,
}
