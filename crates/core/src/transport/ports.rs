//! Port interfaces for the HTTP transport

use async_trait::async_trait;
use thiserror::Error;

/// A fully prepared POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub url: String,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

impl PostRequest {
    pub fn new(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self { url: url.into(), body, headers: Vec::new() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The exchange did not complete (DNS, connect, TLS, timeout).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Short label for the failure class: `timeout`, `connect` or `other`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Connect(_) => "connect",
            Self::Other(_) => "other",
        }
    }

    /// Whether the request is known never to have reached the server.
    ///
    /// A timed-out POST may already have been delivered, so only connect
    /// failures qualify.
    pub fn is_resendable(&self) -> bool {
        matches!(self, Self::Connect(_))
    }
}

/// Sends one POST and hands back the raw response
///
/// Implementations must return `Ok` for every completed exchange, including
/// error statuses. Only exchanges that never completed map to `Err`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, request: PostRequest) -> Result<HttpResponse, TransportError>;
}
