//! Error types used throughout the client
//!
//! Two families of errors exist:
//! - [`BatchError`]: the per-call error returned by every send operation. It
//!   carries the vendor error code, the message and where the failure
//!   originated (transport, vendor API, or a reconciled pair of failures).
//! - [`ConfigError`]: raised while building clients from credentials or
//!   configuration, before anything touches the network.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Platform;

/// Error codes documented by the Batch API.
///
/// Format of an error response body:
/// `{"code": integer, "type": string, "message": string}`.
pub mod codes {
    /// Default code for transport failures and composite errors.
    pub const UNCLASSIFIED: i64 = 0;
    /// Internal error coming from Batch's servers.
    pub const SERVER_ERROR: i64 = 1;
    /// Batch's servers are in maintenance.
    pub const MAINTENANCE_ERROR: i64 = 2;
    /// The API key or the REST key is invalid.
    pub const AUTHENTICATION_INVALID: i64 = 10;
    /// The requested route does not exist.
    pub const ROUTE_NOT_FOUND: i64 = 20;
    /// A parameter is missing in the request.
    pub const MISSING_PARAMETER: i64 = 30;
    /// A parameter doesn't have the right format.
    pub const MALFORMED_PARAMETER: i64 = 31;
    /// The body isn't valid JSON.
    pub const MALFORMED_JSON_BODY: i64 = 32;
    /// Code attached to requests rejected locally, before any network call.
    pub const VALIDATION_FAILED: i64 = MALFORMED_JSON_BODY;
}

/// Where a [`BatchError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorOrigin {
    /// The HTTP exchange never completed (DNS, connect, TLS, timeout).
    Transport,
    /// The vendor answered with an error status, or the request was rejected
    /// by local validation.
    Api,
    /// Both targets of a dual dispatch failed with different codes.
    Composite,
}

crate::impl_domain_status_conversions!(ErrorOrigin {
    Transport => "transport",
    Api => "api",
    Composite => "composite",
});

/// Error body returned by the Batch API for any status `>= 400`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub message: String,
}

/// Main error type for Batch calls
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct BatchError {
    code: i64,
    message: String,
    origin: ErrorOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

impl BatchError {
    /// Error reported by the vendor API.
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), origin: ErrorOrigin::Api, kind: None }
    }

    /// Error for an HTTP exchange that could not complete.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            code: codes::UNCLASSIFIED,
            message: message.into(),
            origin: ErrorOrigin::Transport,
            kind: None,
        }
    }

    /// Attach a failure class, e.g. `connect` for a transport error.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Local validation failure for the named request field.
    pub fn validation(field: &str) -> Self {
        Self::api(codes::VALIDATION_FAILED, format!("Incorrect {field} field"))
    }

    /// Combined error for two distinct per-target failures.
    pub fn composite(message: impl Into<String>) -> Self {
        Self {
            code: codes::UNCLASSIFIED,
            message: message.into(),
            origin: ErrorOrigin::Composite,
            kind: None,
        }
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn origin(&self) -> ErrorOrigin {
        self.origin
    }

    /// The vendor's `type` field for API errors, or the failure class
    /// (`timeout`, `connect`, `other`) for transport errors.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Whether sending the same request again could succeed without risking a
    /// duplicate delivery.
    ///
    /// Only connect failures and vendor-side outages (server error,
    /// maintenance) qualify. A timed-out request may already have been
    /// delivered, and any other transport failure needs the request to change.
    pub fn is_retryable(&self) -> bool {
        match self.origin {
            ErrorOrigin::Transport => self.kind.as_deref() == Some("connect"),
            ErrorOrigin::Api => {
                matches!(self.code, codes::SERVER_ERROR | codes::MAINTENANCE_ERROR)
            }
            ErrorOrigin::Composite => false,
        }
    }

    /// Stable label suitable for logging and metrics.
    pub fn label(&self) -> &'static str {
        match (self.origin, self.code) {
            (ErrorOrigin::Transport, _) => "transport",
            (ErrorOrigin::Composite, _) => "composite",
            (ErrorOrigin::Api, codes::SERVER_ERROR) => "server_error",
            (ErrorOrigin::Api, codes::MAINTENANCE_ERROR) => "maintenance",
            (ErrorOrigin::Api, codes::AUTHENTICATION_INVALID) => "authentication",
            (ErrorOrigin::Api, codes::ROUTE_NOT_FOUND) => "route_not_found",
            (ErrorOrigin::Api, codes::MISSING_PARAMETER) => "missing_parameter",
            (ErrorOrigin::Api, codes::MALFORMED_PARAMETER) => "malformed_parameter",
            (ErrorOrigin::Api, codes::MALFORMED_JSON_BODY) => "malformed_request",
            (ErrorOrigin::Api, _) => "api",
        }
    }
}

impl From<ApiErrorBody> for BatchError {
    fn from(body: ApiErrorBody) -> Self {
        Self { code: body.code, message: body.message, origin: ErrorOrigin::Api, kind: body.kind }
    }
}

/// Result type alias for Batch operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// Errors raised while building clients or loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("You must provide a non-empty API key")]
    MissingApiKey,

    #[error("You must provide a non-empty REST key")]
    MissingRestKey,

    #[error("No API key defined for {0}")]
    MissingPlatformKey(Platform),

    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration file error: {0}")]
    File(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_body_converts_verbatim() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"code":31,"type":"invalid","message":"bad field"}"#)
                .unwrap();
        let error = BatchError::from(body);

        assert_eq!(error.code(), 31);
        assert_eq!(error.message(), "bad field");
        assert_eq!(error.origin(), ErrorOrigin::Api);
        assert_eq!(error.kind(), Some("invalid"));
        assert_eq!(error.to_string(), "bad field");
    }

    #[test]
    fn api_error_body_type_is_optional() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"code":10,"message":"Invalid API key"}"#).unwrap();
        assert_eq!(body.kind, None);
    }

    #[test]
    fn transport_errors_default_to_unclassified_code() {
        let error = BatchError::transport("connection refused").with_kind("connect");
        assert_eq!(error.code(), codes::UNCLASSIFIED);
        assert_eq!(error.origin(), ErrorOrigin::Transport);
        assert!(error.is_retryable());
        assert_eq!(error.label(), "transport");
    }

    #[test]
    fn only_connect_failures_are_retryable_transport_errors() {
        assert!(!BatchError::transport("timed out").with_kind("timeout").is_retryable());
        assert!(!BatchError::transport("invalid HTTP request").with_kind("other").is_retryable());
        assert!(!BatchError::transport("unclassified").is_retryable());
    }

    #[test]
    fn validation_errors_name_the_field() {
        let error = BatchError::validation("recipients");
        assert_eq!(error.code(), 32);
        assert_eq!(error.origin(), ErrorOrigin::Api);
        assert!(error.message().contains("recipients"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn only_vendor_outages_are_retryable_api_errors() {
        assert!(BatchError::api(codes::SERVER_ERROR, "boom").is_retryable());
        assert!(BatchError::api(codes::MAINTENANCE_ERROR, "later").is_retryable());
        assert!(!BatchError::api(codes::AUTHENTICATION_INVALID, "nope").is_retryable());
        assert!(!BatchError::composite("two").is_retryable());
    }

    #[test]
    fn error_origin_string_forms() {
        assert_eq!(ErrorOrigin::Composite.to_string(), "composite");
        assert_eq!("API".parse::<ErrorOrigin>(), Ok(ErrorOrigin::Api));
    }

    #[test]
    fn config_error_messages_name_the_platform() {
        let error = ConfigError::MissingPlatformKey(Platform::Android);
        assert_eq!(error.to_string(), "No API key defined for android");
    }
}
