use ct_codecs::{Base64UrlSafeNoPadding, Decoder};
use serde::Deserialize;
use time::OffsetDateTime;

use super::IdentityError;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct AccessTokenClaims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub preferred_username: Option<String>,
    pub exp: Option<i64>,
    #[serde(default)]
    pub realm_access: RealmAccess,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AccessTokenClaims {
    /// Reads the payload section of a compact JWT
    pub fn decode(token: &str) -> Result<Self, IdentityError> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => {
                return Err(IdentityError::MalformedToken(
                    "expected three dot-separated sections".to_string(),
                ));
            }
        };

        let payload = Base64UrlSafeNoPadding::decode_to_vec(payload.trim_end_matches('='), None)
            .map_err(|e| IdentityError::MalformedToken(e.to_string()))?;

        serde_json::from_slice(&payload).map_err(|e| IdentityError::MalformedToken(e.to_string()))
    }

    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.exp
            .and_then(|exp| OffsetDateTime::from_unix_timestamp(exp).ok())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.realm_access
            .roles
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(role))
    }

    pub fn username(&self) -> Option<&str> {
        self.preferred_username
            .as_deref()
            .or(self.email.as_deref())
            .or(self.sub.as_deref())
    }
}
