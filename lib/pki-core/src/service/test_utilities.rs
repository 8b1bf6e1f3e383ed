use std::sync::Arc;

use crate::provider::http_client::{
    HttpClient, Method, MockHttpClient, Request, RequestBuilder, Response, StatusCode,
};

/// Client whose builders forward every `send` to `sender`
pub(crate) fn http_client_with(sender: MockHttpClient) -> MockHttpClient {
    let sender: Arc<dyn HttpClient> = Arc::new(sender);
    let mut client = MockHttpClient::new();

    let get_sender = sender.clone();
    client
        .expect_get()
        .returning(move |url| RequestBuilder::new(get_sender.clone(), Method::Get, url));
    let post_sender = sender.clone();
    client
        .expect_post()
        .returning(move |url| RequestBuilder::new(post_sender.clone(), Method::Post, url));
    client
        .expect_put()
        .returning(move |url| RequestBuilder::new(sender.clone(), Method::Put, url));

    client
}

pub(crate) fn response(method: Method, url: &str, status: u16, body: &str) -> Response {
    Response {
        body: body.as_bytes().to_vec(),
        headers: Default::default(),
        status: StatusCode(status),
        request: Request {
            body: None,
            headers: Default::default(),
            method,
            url: url.to_string(),
        },
    }
}

pub(crate) fn json_body(body: &Option<Vec<u8>>) -> serde_json::Value {
    serde_json::from_slice(body.as_deref().unwrap_or_default()).unwrap()
}

pub(crate) const API_BASE_URL: &str = "http://pki.test/api/v1";

pub(crate) fn api_endpoints() -> crate::service::ApiEndpoints {
    crate::service::ApiEndpoints::new(API_BASE_URL.parse().unwrap())
}
