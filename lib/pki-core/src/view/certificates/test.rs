use std::sync::Arc;

use mockall::Sequence;

use super::CertificatesView;
use crate::model::revocation::RevocationReason;
use crate::provider::http_client::{Method, MockHttpClient};
use crate::service::certificate::CertificateService;
use crate::service::test_utilities::{api_endpoints, http_client_with, json_body, response};

const LIST_URL: &str = "http://pki.test/api/v1/certificates";

fn setup_view(sender: MockHttpClient) -> CertificatesView {
    CertificatesView::new(CertificateService::new(
        Arc::new(http_client_with(sender)),
        api_endpoints(),
    ))
}

#[tokio::test]
async fn test_load_lists_certificates() {
    let mut sender = MockHttpClient::new();
    sender
        .expect_send()
        .once()
        .withf(|url, _, _, method| url == LIST_URL && *method == Method::Get)
        .returning(|url, _, _, method| {
            Ok(response(
                method,
                url,
                200,
                r#"[{"serialNumber":"1"},{"serialNumber":"2"}]"#,
            ))
        });

    let mut view = setup_view(sender);
    assert!(view.loading);

    view.load().await;

    assert!(!view.loading);
    assert_eq!(None, view.error);
    assert_eq!(2, view.certificates.len());
}

#[tokio::test]
async fn test_load_failure_sets_banner() {
    let mut sender = MockHttpClient::new();
    sender.expect_send().once().returning(|url, _, _, method| {
        Ok(response(method, url, 500, r#"{"message":"Keystore unavailable"}"#))
    });

    let mut view = setup_view(sender);
    view.load().await;

    assert!(!view.loading);
    assert_eq!(Some("Keystore unavailable".to_string()), view.error);
    assert!(view.certificates.is_empty());
}

#[tokio::test]
async fn test_reload_clears_stale_banner() {
    let mut sequence = Sequence::new();
    let mut sender = MockHttpClient::new();
    sender
        .expect_send()
        .once()
        .in_sequence(&mut sequence)
        .returning(|url, _, _, method| Ok(response(method, url, 503, "")));
    sender
        .expect_send()
        .once()
        .in_sequence(&mut sequence)
        .returning(|url, _, _, method| Ok(response(method, url, 200, r#"[{"serialNumber":"1"}]"#)));

    let mut view = setup_view(sender);
    view.load().await;
    assert_eq!(Some("Server error".to_string()), view.error);

    view.load().await;

    assert_eq!(None, view.error);
    assert_eq!(1, view.certificates.len());
}

#[tokio::test]
async fn test_revoke_refreshes_list_on_success() {
    let mut sequence = Sequence::new();
    let mut sender = MockHttpClient::new();
    sender
        .expect_send()
        .once()
        .in_sequence(&mut sequence)
        .withf(|url, body, _, method| {
            url == "http://pki.test/api/v1/certificates/revoke"
                && *method == Method::Post
                && json_body(body) == serde_json::json!({ "serialNumber": "9", "reason": 5 })
        })
        .returning(|url, _, _, method| Ok(response(method, url, 200, "")));
    sender
        .expect_send()
        .once()
        .in_sequence(&mut sequence)
        .withf(|url, _, _, method| url == LIST_URL && *method == Method::Get)
        .returning(|url, _, _, method| Ok(response(method, url, 200, r#"[{"serialNumber":"10"}]"#)));

    let mut view = setup_view(sender);
    view.error = Some("stale".to_string());

    view.revoke(&"9".into(), RevocationReason::CessationOfOperation)
        .await;

    assert_eq!(None, view.error);
    assert_eq!("10", view.certificates[0].serial_number.as_str());
}

#[tokio::test]
async fn test_revoke_failure_keeps_list() {
    let mut sender = MockHttpClient::new();
    sender.expect_send().once().returning(|url, _, _, method| {
        Ok(response(method, url, 409, r#"{"message":"Already revoked"}"#))
    });

    let mut view = setup_view(sender);
    view.certificates = vec![Default::default()];

    view.revoke(&"9".into(), RevocationReason::KeyCompromise).await;

    assert_eq!(Some("Already revoked".to_string()), view.error);
    assert_eq!(1, view.certificates.len());
    assert!(!view.loading);
}

#[test]
fn test_reasons_offered() {
    let view = setup_view(MockHttpClient::new());

    let reasons = view.reasons();
    assert_eq!(10, reasons.len());
    assert!(!reasons.iter().any(|reason| reason.code() == 7));
}
