use std::sync::Arc;

use crate::provider::identity::IdentityError;
use crate::provider::identity::session::Session;
use crate::router::Route;

pub struct HomeView {
    session: Arc<Session>,
}

impl HomeView {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn username(&self) -> &str {
        self.session.username().unwrap_or("unknown user")
    }

    pub fn greeting(&self) -> String {
        let role = if self.session.is_admin() {
            " (admin)"
        } else {
            ""
        };
        format!("Signed in as {}{role}", self.username())
    }

    /// Target of the "new certificate" action
    pub fn create_certificate(&self) -> Route {
        Route::CreateCertificate
    }

    pub async fn logout(&self) -> Result<(), IdentityError> {
        self.session.logout().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::provider::identity::session::AuthState;
    use crate::provider::identity::test_utilities::jwt;

    fn session(roles: &[&str]) -> Arc<Session> {
        let exp = (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp();
        let token = jwt(json!({
            "sub": "6c1f",
            "preferred_username": "alice",
            "exp": exp,
            "realm_access": { "roles": roles },
        }));

        Arc::new(Session::from_access_token(token.into()).unwrap())
    }

    #[test]
    fn test_greeting() {
        assert_eq!("Signed in as alice", HomeView::new(session(&["user"])).greeting());
        assert_eq!(
            "Signed in as alice (admin)",
            HomeView::new(session(&["ADMIN"])).greeting()
        );
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let session = session(&[]);
        let view = HomeView::new(session.clone());
        assert!(session.is_authenticated().await);

        view.logout().await.unwrap();

        assert!(!session.is_authenticated().await);
        assert_eq!(Route::CreateCertificate, view.create_certificate());
    }
}
