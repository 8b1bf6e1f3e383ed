use serde::Deserialize;
use thiserror::Error;

use crate::provider::http_client::{self, Response, StatusCode};

pub const GENERIC_ERROR_MESSAGE: &str = "Server error";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] http_client::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Missing configuration `{0}`")]
    MissingConfiguration(&'static str),
}

impl ServiceError {
    /// Text for a view's error banner
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api { message, .. } => message.to_owned(),
            other => other.to_string(),
        };

        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

pub(crate) trait ApiResponseExt: Sized {
    /// Converts 4xx/5xx responses into [`ServiceError::Api`], taking the
    /// `message` field of the JSON error body when there is one
    fn api_error_for_status(self) -> Result<Self, ServiceError>;
}

impl ApiResponseExt for Response {
    fn api_error_for_status(self) -> Result<Self, ServiceError> {
        if !self.status.is_error() {
            return Ok(self);
        }

        let message = serde_json::from_slice::<ApiErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

        tracing::warn!(
            status = %self.status,
            method = %self.request.method,
            url = %self.request.url,
            %message,
            "API request failed"
        );

        Err(ServiceError::Api {
            status: self.status,
            message,
        })
    }
}
