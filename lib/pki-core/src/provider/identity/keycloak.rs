use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use url::Url;

use super::IdentityError;
use crate::config::core_config::IdentityConfig;
use crate::provider::http_client::{HttpClient, Response};

/// Tokens issued by the identity provider
#[derive(Debug)]
pub struct TokenSet {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub expires_at: Option<OffsetDateTime>,
}

impl TokenSet {
    /// True when the access token is expired or expires within `leeway`
    pub fn expires_within(&self, now: OffsetDateTime, leeway: Duration) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at - leeway <= now)
    }
}

/// OpenID Connect client of a single Keycloak realm
pub struct KeycloakClient {
    http_client: Arc<dyn HttpClient>,
    config: IdentityConfig,
}

#[derive(Serialize)]
struct PasswordGrantRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
    scope: &'static str,
}

#[derive(Serialize)]
struct RefreshTokenGrantRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct LogoutRequest<'a> {
    client_id: &'a str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

impl KeycloakClient {
    pub fn new(http_client: Arc<dyn HttpClient>, config: IdentityConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    pub async fn login_with_password(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<TokenSet, IdentityError> {
        tracing::debug!(%username, realm = %self.config.realm, "Requesting token with password grant");

        let request = PasswordGrantRequest {
            grant_type: "password",
            client_id: &self.config.client_id,
            username,
            password: password.expose_secret(),
            scope: "openid",
        };

        let response = self
            .http_client
            .post(self.endpoint("token")?.as_str())
            .form(request)?
            .send()
            .await?;

        token_set_from_response(response)
    }

    pub async fn refresh(&self, refresh_token: &SecretString) -> Result<TokenSet, IdentityError> {
        tracing::debug!(realm = %self.config.realm, "Refreshing access token");

        let request = RefreshTokenGrantRequest {
            grant_type: "refresh_token",
            client_id: &self.config.client_id,
            refresh_token: refresh_token.expose_secret(),
        };

        let response = self
            .http_client
            .post(self.endpoint("token")?.as_str())
            .form(request)?
            .send()
            .await?;

        token_set_from_response(response)
    }

    /// Ends the SSO session bound to `refresh_token`
    pub async fn logout(&self, refresh_token: &SecretString) -> Result<(), IdentityError> {
        let request = LogoutRequest {
            client_id: &self.config.client_id,
            refresh_token: refresh_token.expose_secret(),
        };

        let response = self
            .http_client
            .post(self.endpoint("logout")?.as_str())
            .form(request)?
            .send()
            .await?;

        if !response.status.is_success() {
            return Err(rejection(response));
        }

        tracing::info!(realm = %self.config.realm, "Logged out");
        Ok(())
    }

    fn endpoint(&self, name: &str) -> Result<Url, IdentityError> {
        let mut url = self.config.url.clone();
        url.path_segments_mut()
            .map_err(|_| IdentityError::InvalidUrl(self.config.url.to_string()))?
            .pop_if_empty()
            .extend([
                "realms",
                self.config.realm.as_str(),
                "protocol",
                "openid-connect",
                name,
            ]);

        Ok(url)
    }
}

fn token_set_from_response(response: Response) -> Result<TokenSet, IdentityError> {
    if !response.status.is_success() {
        return Err(rejection(response));
    }

    let token: TokenResponse = response.json()?;
    let expires_at = token
        .expires_in
        .map(|seconds| OffsetDateTime::now_utc() + Duration::seconds(seconds));

    Ok(TokenSet {
        access_token: token.access_token.into(),
        refresh_token: token.refresh_token.map(Into::into),
        expires_at,
    })
}

fn rejection(response: Response) -> IdentityError {
    let status = response.status;
    let description = match serde_json::from_slice::<TokenErrorResponse>(&response.body) {
        Ok(TokenErrorResponse {
            error_description: Some(description),
            ..
        }) => description,
        Ok(TokenErrorResponse { error, .. }) => error,
        Err(_) => response.text(),
    };

    tracing::warn!(%status, %description, "Identity provider rejected request");
    IdentityError::Rejected {
        status,
        description,
    }
}
