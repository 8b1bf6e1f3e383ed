use std::sync::Arc;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use similar_asserts::assert_eq;
use time::{Duration, OffsetDateTime};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::claims::AccessTokenClaims;
use super::keycloak::KeycloakClient;
use super::session::{AuthState, Session};
use super::test_utilities::jwt;
use super::{AccessTokenSource, IdentityError};
use crate::config::core_config::IdentityConfig;
use crate::provider::http_client::StatusCode;
use crate::provider::http_client::reqwest_client::ReqwestClient;

const TOKEN_PATH: &str = "/realms/pki/protocol/openid-connect/token";
const LOGOUT_PATH: &str = "/realms/pki/protocol/openid-connect/logout";

fn keycloak(mock_server: &MockServer) -> Arc<KeycloakClient> {
    Arc::new(KeycloakClient::new(
        Arc::new(ReqwestClient::default()),
        IdentityConfig {
            url: mock_server.uri().parse().unwrap(),
            realm: "pki".to_string(),
            client_id: "pki-frontend".to_string(),
        },
    ))
}

fn access_token(username: &str, roles: &[&str]) -> String {
    let exp = (OffsetDateTime::now_utc() + Duration::minutes(5)).unix_timestamp();
    jwt(json!({
        "sub": "6c1f",
        "email": format!("{username}@example.com"),
        "preferred_username": username,
        "exp": exp,
        "realm_access": { "roles": roles },
    }))
}

fn password() -> SecretString {
    "secret".to_string().into()
}

#[test]
fn test_decode_claims() {
    let claims = AccessTokenClaims::decode(&access_token("alice", &["USER", "admin"])).unwrap();

    assert_eq!(Some("alice"), claims.username());
    assert!(claims.has_role("ADMIN"));
    assert!(claims.has_role("user"));
    assert!(!claims.has_role("ca_user"));
    assert!(claims.expires_at().is_some());
}

#[test]
fn test_decode_malformed_token() {
    assert!(matches!(
        AccessTokenClaims::decode("not-a-jwt"),
        Err(IdentityError::MalformedToken(_))
    ));
    assert!(matches!(
        AccessTokenClaims::decode("a.%%%.c"),
        Err(IdentityError::MalformedToken(_))
    ));
}

#[tokio::test]
async fn test_login_with_password() {
    let mock_server = MockServer::start().await;
    let token = access_token("alice", &["user"]);
    Mock::given(method(Method::POST))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=pki-frontend"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=secret"))
        .and(body_string_contains("scope=openid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "expires_in": 300,
            "refresh_token": "refresh-1",
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::login(keycloak(&mock_server), "alice", &password())
        .await
        .unwrap();

    assert_eq!(Some("alice"), session.username());
    assert!(!session.is_admin());
    assert_eq!(&["user".to_string()], session.roles());
    assert!(session.is_authenticated().await);
    assert_eq!(
        token,
        session.access_token().await.unwrap().expose_secret()
    );
}

#[tokio::test]
async fn test_login_rejected() {
    let mock_server = MockServer::start().await;
    Mock::given(method(Method::POST))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid user credentials",
        })))
        .mount(&mock_server)
        .await;

    let result = Session::login(keycloak(&mock_server), "alice", &password()).await;

    match result {
        Err(IdentityError::Rejected {
            status,
            description,
        }) => {
            assert_eq!(StatusCode(401), status);
            assert_eq!("Invalid user credentials", description);
        }
        _ => panic!("expected rejection"),
    }
}

#[tokio::test]
async fn test_expiring_token_refreshed() {
    let mock_server = MockServer::start().await;
    let refreshed = access_token("alice", &["admin"]);
    Mock::given(method(Method::POST))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token("alice", &["admin"]),
            "expires_in": 10,
            "refresh_token": "refresh-1",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method(Method::POST))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": refreshed,
            "expires_in": 300,
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::login(keycloak(&mock_server), "alice", &password())
        .await
        .unwrap();

    assert_eq!(
        refreshed,
        session.access_token().await.unwrap().expose_secret()
    );
    // valid for five minutes now, no second refresh
    assert_eq!(
        refreshed,
        session.access_token().await.unwrap().expose_secret()
    );
}

#[tokio::test]
async fn test_logout_ends_sso_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method(Method::POST))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token("bob", &[]),
            "expires_in": 300,
            "refresh_token": "refresh-2",
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method(Method::POST))
        .and(path(LOGOUT_PATH))
        .and(body_string_contains("refresh_token=refresh-2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::login(keycloak(&mock_server), "bob", &password())
        .await
        .unwrap();
    session.logout().await.unwrap();

    assert!(!session.is_authenticated().await);
    assert!(matches!(
        session.access_token().await,
        Err(IdentityError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_access_token_session_cannot_refresh() {
    let expired = jwt(json!({
        "preferred_username": "carol",
        "exp": (OffsetDateTime::now_utc() - Duration::minutes(1)).unix_timestamp(),
    }));

    let session = Session::from_access_token(expired.into()).unwrap();

    assert_eq!(Some("carol"), session.username());
    assert!(!session.is_authenticated().await);
    assert!(matches!(
        session.access_token().await,
        Err(IdentityError::NotAuthenticated)
    ));
}
