use std::sync::Arc;

use mockall::Sequence;
use serde_json::json;
use shared_types::SerialNumber;
use similar_asserts::assert_eq;

use super::AdminCaAssignView;
use crate::provider::http_client::{HttpClient, Method, MockHttpClient};
use crate::service::certificate::CertificateService;
use crate::service::test_utilities::{api_endpoints, http_client_with, json_body, response};
use crate::service::user::UserService;

const UNASSIGNED_URL: &str = "http://pki.test/api/v1/certificates/unassigned";
const CA_USERS_URL: &str = "http://pki.test/api/v1/users/ca";
const ASSIGNMENT_URL: &str = "http://pki.test/api/v1/users/assignment";

fn setup_view(sender: MockHttpClient) -> AdminCaAssignView {
    let client: Arc<dyn HttpClient> = Arc::new(http_client_with(sender));
    AdminCaAssignView::new(
        CertificateService::new(client.clone(), api_endpoints()),
        UserService::new(client, api_endpoints()),
    )
}

fn expect_get(
    sender: &mut MockHttpClient,
    sequence: &mut Sequence,
    expected: &'static str,
    body: &'static str,
) {
    sender
        .expect_send()
        .once()
        .in_sequence(sequence)
        .withf(move |url, _, _, method| url == expected && *method == Method::Get)
        .returning(move |url, _, _, method| Ok(response(method, url, 200, body)));
}

async fn loaded_view(mut sender: MockHttpClient) -> AdminCaAssignView {
    let mut sequence = Sequence::new();
    expect_get(
        &mut sender,
        &mut sequence,
        UNASSIGNED_URL,
        r#"[{"serialNumber":"11"},{"serialNumber":"12"}]"#,
    );
    expect_get(
        &mut sender,
        &mut sequence,
        CA_USERS_URL,
        r#"[{"id":5,"email":"ca@example.com","role":"CA_USER"}]"#,
    );

    let mut view = setup_view(sender);
    view.load(true).await;
    view
}

#[tokio::test]
async fn test_load_skipped_without_admin_role() {
    let mut view = setup_view(MockHttpClient::new());

    view.load(false).await;

    assert!(!view.is_admin);
    assert!(view.certificates.is_empty());
    assert!(view.users.is_empty());
}

#[tokio::test]
async fn test_assign_updates_user_and_refreshes() {
    let mut sequence = Sequence::new();
    let mut sender = MockHttpClient::new();
    expect_get(
        &mut sender,
        &mut sequence,
        UNASSIGNED_URL,
        r#"[{"serialNumber":"11"},{"serialNumber":"12"}]"#,
    );
    expect_get(
        &mut sender,
        &mut sequence,
        CA_USERS_URL,
        r#"[{"id":5,"email":"ca@example.com","role":"CA_USER"}]"#,
    );
    sender
        .expect_send()
        .once()
        .in_sequence(&mut sequence)
        .withf(|url, body, _, method| {
            url == ASSIGNMENT_URL
                && *method == Method::Put
                && json_body(body) == json!({ "serialNumber": "11", "userId": 5 })
        })
        .returning(|url, _, _, method| Ok(response(method, url, 200, "successfully assigned")));
    expect_get(
        &mut sender,
        &mut sequence,
        UNASSIGNED_URL,
        r#"[{"serialNumber":"12"}]"#,
    );

    let mut view = setup_view(sender);
    view.load(true).await;
    assert!(view.is_admin);
    assert!(!view.loading);
    assert_eq!(2, view.certificates.len());

    view.assign(Some("11"), Some("5")).await;

    assert_eq!(
        vec![SerialNumber::from("11")],
        view.users[0].certificate_serial_numbers
    );
    assert_eq!(Some("successfully assigned".to_string()), view.confirmation);
    assert_eq!(None, view.error);
    assert_eq!(1, view.certificates.len());
}

#[tokio::test]
async fn test_assign_ignores_incomplete_or_unknown_selection() {
    let mut view = loaded_view(MockHttpClient::new()).await;

    view.assign(None, Some("5")).await;
    view.assign(Some("11"), None).await;
    view.assign(Some("11"), Some("99")).await;
    view.assign(Some("11"), Some("not-a-number")).await;

    assert!(view.users[0].certificate_serial_numbers.is_empty());
    assert_eq!(None, view.confirmation);
    assert_eq!(2, view.certificates.len());
}

#[tokio::test]
async fn test_assign_failure_sets_banner() {
    let mut sequence = Sequence::new();
    let mut sender = MockHttpClient::new();
    expect_get(&mut sender, &mut sequence, UNASSIGNED_URL, r#"[{"serialNumber":"11"}]"#);
    expect_get(
        &mut sender,
        &mut sequence,
        CA_USERS_URL,
        r#"[{"id":5,"email":"ca@example.com"}]"#,
    );
    sender
        .expect_send()
        .once()
        .in_sequence(&mut sequence)
        .returning(|url, _, _, method| {
            Ok(response(method, url, 409, r#"{"message":"Certificate already assigned"}"#))
        });

    let mut view = setup_view(sender);
    view.load(true).await;
    view.assign(Some("11"), Some("5")).await;

    assert_eq!(Some("Certificate already assigned".to_string()), view.error);
    assert_eq!(None, view.confirmation);
    assert_eq!(1, view.certificates.len());
    assert!(!view.loading);
}

#[tokio::test]
async fn test_assign_confirmed_when_refresh_fails() {
    let mut sequence = Sequence::new();
    let mut sender = MockHttpClient::new();
    expect_get(&mut sender, &mut sequence, UNASSIGNED_URL, r#"[{"serialNumber":"11"}]"#);
    expect_get(
        &mut sender,
        &mut sequence,
        CA_USERS_URL,
        r#"[{"id":5,"email":"ca@example.com"}]"#,
    );
    sender
        .expect_send()
        .once()
        .in_sequence(&mut sequence)
        .withf(|url, _, _, method| url == ASSIGNMENT_URL && *method == Method::Put)
        .returning(|url, _, _, method| Ok(response(method, url, 200, "successfully assigned")));
    sender
        .expect_send()
        .once()
        .in_sequence(&mut sequence)
        .withf(|url, _, _, method| url == UNASSIGNED_URL && *method == Method::Get)
        .returning(|url, _, _, method| Ok(response(method, url, 500, r#"{"message":"db down"}"#)));

    let mut view = setup_view(sender);
    view.load(true).await;
    view.assign(Some("11"), Some("5")).await;

    assert_eq!(Some("successfully assigned".to_string()), view.confirmation);
    assert_eq!(Some("db down".to_string()), view.error);
    assert_eq!(1, view.certificates.len());
    assert!(!view.loading);
}
