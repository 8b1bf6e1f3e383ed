use std::sync::Arc;

use secrecy::ExposeSecret;

use super::{AUTHORIZATION, Error, Headers, HttpClient, Method, RequestBuilder, Response};
use crate::provider::identity::AccessTokenSource;

/// Attaches the current bearer token to every outgoing request
#[derive(Clone)]
pub struct AuthenticatedHttpClient {
    inner: Arc<dyn HttpClient>,
    token_source: Arc<dyn AccessTokenSource>,
}

impl AuthenticatedHttpClient {
    pub fn new(inner: Arc<dyn HttpClient>, token_source: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            inner,
            token_source,
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for AuthenticatedHttpClient {
    fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(Arc::new(self.clone()), Method::Get, url)
    }

    fn post(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(Arc::new(self.clone()), Method::Post, url)
    }

    fn put(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(Arc::new(self.clone()), Method::Put, url)
    }

    async fn send(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: Option<Headers>,
        method: Method,
    ) -> Result<Response, Error> {
        let mut headers = headers.unwrap_or_default();

        let has_authorization = headers
            .keys()
            .any(|key| key.eq_ignore_ascii_case(AUTHORIZATION));

        if !has_authorization {
            let token = self
                .token_source
                .access_token()
                .await
                .map_err(|e| Error::Unauthenticated(e.to_string()))?;

            headers.insert(
                AUTHORIZATION.to_string(),
                format!("Bearer {}", token.expose_secret()),
            );
        }

        self.inner.send(url, body, Some(headers), method).await
    }
}
