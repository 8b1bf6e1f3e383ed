use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::{Error, Headers, HttpClient, Method, Request, RequestBuilder, Response, StatusCode};

/// [`HttpClient`] backed by a shared `reqwest::Client`
#[derive(Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn builder(&self, method: Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(Arc::new(self.clone()), method, url)
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> RequestBuilder {
        self.builder(Method::Get, url)
    }

    fn post(&self, url: &str) -> RequestBuilder {
        self.builder(Method::Post, url)
    }

    fn put(&self, url: &str) -> RequestBuilder {
        self.builder(Method::Put, url)
    }

    async fn send(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: Option<Headers>,
        method: Method,
    ) -> Result<Response, Error> {
        let request = Request {
            body,
            headers: headers.unwrap_or_default(),
            method,
            url: url.to_string(),
        };

        let wire_method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut outgoing = self
            .client
            .request(wire_method, url)
            .headers(header_map(&request.headers)?);
        if let Some(body) = &request.body {
            outgoing = outgoing.body(body.clone());
        }

        let incoming = outgoing.send().await.map_err(transport)?;
        into_response(incoming, request).await
    }
}

async fn into_response(incoming: reqwest::Response, request: Request) -> Result<Response, Error> {
    let status = StatusCode(incoming.status().as_u16());
    let headers = incoming
        .headers()
        .iter()
        .map(|(name, value)| {
            value
                .to_str()
                .map(|value| (name.to_string(), value.to_string()))
                .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))
        })
        .collect::<Result<Headers, _>>()?;
    let body = incoming.bytes().await.map_err(transport)?.to_vec();

    Ok(Response {
        body,
        headers,
        status,
        request,
    })
}

fn header_map(headers: &Headers) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let invalid = |e: &dyn std::fmt::Display| Error::InvalidHeader(format!("{name}: {e}"));
        map.insert(
            HeaderName::try_from(name.as_str()).map_err(|e| invalid(&e))?,
            HeaderValue::try_from(value.as_str()).map_err(|e| invalid(&e))?,
        );
    }
    Ok(map)
}

fn transport(error: reqwest::Error) -> Error {
    Error::Transport(error.to_string())
}
