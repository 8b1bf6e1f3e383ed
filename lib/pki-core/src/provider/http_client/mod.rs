//! Minimal HTTP abstraction used by the identity client and the REST
//! services. The transport is swappable behind [`HttpClient`], which keeps
//! services testable with `MockHttpClient`.

pub mod authenticated;
pub mod reqwest_client;


use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use itertools::Itertools;
use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::Display;
use thiserror::Error;

pub(crate) const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> RequestBuilder;
    fn post(&self, url: &str) -> RequestBuilder;
    fn put(&self, url: &str) -> RequestBuilder;

    async fn send(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: Option<Headers>,
        method: Method,
    ) -> Result<Response, Error>;
}

pub type Headers = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Form encoding error: {0}")]
    UrlEncode(#[from] serde_urlencoded::ser::Error),
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum Method {
    #[strum(serialize = "GET")]
    Get,
    #[strum(serialize = "POST")]
    Post,
    #[strum(serialize = "PUT")]
    Put,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// 4xx or 5xx
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.0)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub body: Option<Vec<u8>>,
    pub headers: Headers,
    pub method: Method,
    pub url: String,
}

#[derive(Debug)]
pub struct Response {
    pub body: Vec<u8>,
    pub headers: Headers,
    pub status: StatusCode,

    pub request: Request,
}

impl Response {
    /// Header lookup ignoring the case of `name`
    pub fn header_get(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find_map(|(key, value)| key.eq_ignore_ascii_case(name).then_some(value))
    }

    #[track_caller]
    pub fn json<T: DeserializeOwned>(self) -> Result<T, Error> {
        serde_json::from_slice(&self.body)
            .map_err(|e| failed(Error::Json(e), Location::caller(), &self.request))
    }

    /// Body as text, invalid UTF-8 sequences replaced
    pub fn text(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct RequestBuilder {
    client: Arc<dyn HttpClient>,
    request: Request,
}

impl RequestBuilder {
    pub fn new(client: Arc<dyn HttpClient>, method: Method, url: &str) -> Self {
        Self {
            client,
            request: Request {
                body: None,
                headers: Headers::default(),
                method,
                url: url.to_string(),
            },
        }
    }

    pub fn bearer_auth(mut self, token: &str) -> Self {
        self.request
            .headers
            .insert(AUTHORIZATION.to_string(), format!("Bearer {token}"));
        self
    }

    #[track_caller]
    pub fn form<T: Serialize>(self, value: T) -> Result<Self, Error> {
        let location = Location::caller();

        match serde_urlencoded::to_string(value) {
            Ok(encoded) => Ok(self.with_body("application/x-www-form-urlencoded", encoded.into_bytes())),
            Err(e) => Err(failed(Error::UrlEncode(e), location, &self.request)),
        }
    }

    #[track_caller]
    pub fn json<T: Serialize>(self, value: T) -> Result<Self, Error> {
        let location = Location::caller();

        match serde_json::to_vec(&value) {
            Ok(body) => Ok(self.with_body("application/json", body)),
            Err(e) => Err(failed(Error::Json(e), location, &self.request)),
        }
    }

    #[track_caller]
    pub fn send(self) -> impl Future<Output = Result<Response, Error>> + Send {
        let location = Location::caller();

        async move {
            let Self { client, request } = self;
            let headers = (!request.headers.is_empty()).then(|| request.headers.clone());

            match client
                .send(&request.url, request.body.clone(), headers, request.method)
                .await
            {
                Ok(response) => {
                    tracing::debug!(
                        method = %request.method,
                        url = %request.url,
                        status = %response.status,
                        %location,
                        "HTTP request completed"
                    );
                    trace_exchange(&request, Some(&response));
                    Ok(response)
                }
                Err(error) => {
                    trace_exchange(&request, None);
                    Err(failed(error, location, &request))
                }
            }
        }
    }

    fn with_body(mut self, content_type: &str, body: Vec<u8>) -> Self {
        self.request
            .headers
            .insert(CONTENT_TYPE.to_string(), content_type.to_string());
        self.request.body = Some(body);
        self
    }
}

fn failed(error: Error, location: &Location, request: &Request) -> Error {
    tracing::error!(method = %request.method, url = %request.url, %error, %location, "HTTP request failed");
    error
}

fn trace_exchange(request: &Request, response: Option<&Response>) {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }

    let response = match response {
        Some(response) => format!(
            "Status: {}\nHeaders:\n{}\nBody:\n{}",
            response.status,
            format_headers(&response.headers),
            format_body(Some(&response.body))
        ),
        None => "<None>".to_string(),
    };

    tracing::trace!(
        request = %format!(
            "{} {}\nHeaders:\n{}\nBody:\n{}",
            request.method,
            request.url,
            format_headers(&request.headers),
            format_body(request.body.as_deref())
        ),
        %response,
        "HTTP exchange"
    );
}

fn format_headers(headers: &Headers) -> String {
    if headers.is_empty() {
        return "<None>".to_string();
    }

    headers
        .iter()
        .sorted()
        .map(|(name, value)| match name.eq_ignore_ascii_case(AUTHORIZATION) {
            true => format!("{name}: <redacted>"),
            false => format!("{name}: {value}"),
        })
        .join("\n")
}

fn format_body(body: Option<&[u8]>) -> String {
    match body.map(std::str::from_utf8) {
        None => "<None>".to_string(),
        Some(Ok(text)) => text.to_string(),
        Some(Err(_)) => format!("<{} bytes>", body.map(<[u8]>::len).unwrap_or_default()),
    }
}
