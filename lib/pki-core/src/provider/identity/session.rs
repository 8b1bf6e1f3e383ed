use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

use super::claims::{ADMIN_ROLE, AccessTokenClaims};
use super::keycloak::{KeycloakClient, TokenSet};
use super::{AccessTokenSource, IdentityError};

const REFRESH_LEEWAY: Duration = Duration::seconds(30);

/// Whether the current user is signed in at the identity provider
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait AuthState: Send + Sync {
    async fn is_authenticated(&self) -> bool;
}

/// No user signed in
pub struct Anonymous;

#[async_trait::async_trait]
impl AuthState for Anonymous {
    async fn is_authenticated(&self) -> bool {
        false
    }
}

/// Authenticated user state: tokens plus the claims read at sign in
pub struct Session {
    identity: Option<Arc<KeycloakClient>>,
    claims: AccessTokenClaims,
    tokens: Mutex<TokenSet>,
}

impl Session {
    pub async fn login(
        identity: Arc<KeycloakClient>,
        username: &str,
        password: &SecretString,
    ) -> Result<Self, IdentityError> {
        let tokens = identity.login_with_password(username, password).await?;
        let claims = AccessTokenClaims::decode(tokens.access_token.expose_secret())?;

        tracing::info!(user = claims.username().unwrap_or(username), "Signed in");

        Ok(Self {
            identity: Some(identity),
            claims,
            tokens: Mutex::new(tokens),
        })
    }

    /// Session around a token obtained elsewhere; it cannot be refreshed
    pub fn from_access_token(access_token: SecretString) -> Result<Self, IdentityError> {
        let claims = AccessTokenClaims::decode(access_token.expose_secret())?;
        let tokens = TokenSet {
            access_token,
            refresh_token: None,
            expires_at: claims.expires_at(),
        };

        Ok(Self {
            identity: None,
            claims,
            tokens: Mutex::new(tokens),
        })
    }

    pub fn claims(&self) -> &AccessTokenClaims {
        &self.claims
    }

    pub fn roles(&self) -> &[String] {
        &self.claims.realm_access.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.claims.has_role(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    pub fn username(&self) -> Option<&str> {
        self.claims.username()
    }

    pub async fn logout(&self) -> Result<(), IdentityError> {
        let mut tokens = self.tokens.lock().await;

        match (&self.identity, tokens.refresh_token.take()) {
            (Some(identity), Some(refresh_token)) => identity.logout(&refresh_token).await?,
            _ => tracing::warn!("Session has no refresh token, nothing to end at the identity provider"),
        }

        tokens.expires_at = Some(OffsetDateTime::UNIX_EPOCH);
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthState for Session {
    async fn is_authenticated(&self) -> bool {
        let tokens = self.tokens.lock().await;
        let expired = tokens.expires_within(OffsetDateTime::now_utc(), Duration::ZERO);

        !expired || (self.identity.is_some() && tokens.refresh_token.is_some())
    }
}

#[async_trait::async_trait]
impl AccessTokenSource for Session {
    async fn access_token(&self) -> Result<SecretString, IdentityError> {
        let mut tokens = self.tokens.lock().await;

        if tokens.expires_within(OffsetDateTime::now_utc(), REFRESH_LEEWAY) {
            let (Some(identity), Some(refresh_token)) = (&self.identity, &tokens.refresh_token)
            else {
                return Err(IdentityError::NotAuthenticated);
            };

            let refreshed = identity.refresh(refresh_token).await?;
            *tokens = TokenSet {
                refresh_token: refreshed.refresh_token.or(tokens.refresh_token.take()),
                ..refreshed
            };
        }

        Ok(tokens.access_token.expose_secret().to_owned().into())
    }
}
