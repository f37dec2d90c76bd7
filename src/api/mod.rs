use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

pub mod gemini;
pub mod plants;
pub mod tags;
pub mod users;
pub mod watering;
pub mod weather;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-success HTTP status; `details` is the backend's structured message,
    /// surfaced to the user verbatim.
    #[error("{details}")]
    Api { status: u16, details: String },
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
    /// Produced entirely locally, before any request is sent.
    #[error("{0}")]
    Validation(String),
}

/// Structured error payload the backend attaches to non-success responses.
#[derive(Deserialize)]
struct ErrorBody {
    details: String,
}

/// Shared handle for all backend calls: one reqwest client plus the base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps a non-success response to [`ApiError::Api`], preferring the
    /// backend's `details` field over a generic status message.
    pub(crate) async fn error_for_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let details = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.details)
            .unwrap_or_else(|_| format!("Request failed: HTTP {}", status.as_u16()));
        Err(ApiError::Api {
            status: status.as_u16(),
            details,
        })
    }

    /// Checks the status and decodes a JSON body.
    pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::error_for_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Checks the status and discards the body (DELETE / PUT endpoints).
    pub(crate) async fn expect_success(response: Response) -> Result<(), ApiError> {
        Self::error_for_status(response).await.map(|_| ())
    }
}
