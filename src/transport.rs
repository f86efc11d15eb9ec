//! HTTP transport used to reach the Data API.
//!
//! The client never talks to the network directly. Every dispatch goes
//! through an [`HttpTransport`], which keeps the request builder independent
//! of the HTTP library and lets tests observe exactly what would be sent.

use crate::error::{MongoError, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::time::Duration;

/// A fully composed POST request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Absolute target URL (`<base>action/<operation>`).
    pub url: String,
    /// Request headers, including the API key.
    pub headers: HeaderMap,
    /// JSON-encoded body.
    pub body: Vec<u8>,
    /// Optional per-request timeout hint.
    pub timeout: Option<Duration>,
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response from a status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implementations perform exactly one attempt per call: no retries, no
/// caching. Network failures map to [`MongoError::Transport`] and timeouts
/// to [`MongoError::Timeout`].
///
/// [`MongoError::Transport`]: crate::MongoError::Transport
/// [`MongoError::Timeout`]: crate::MongoError::Timeout
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a POST request and returns the status and body.
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default `reqwest` client.
    ///
    /// Fails with [`MongoError::Configuration`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| MongoError::configuration(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }

    /// Create a transport from a preconfigured `reqwest` client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .body(request.body);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
