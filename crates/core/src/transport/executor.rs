//! Issues one authenticated JSON POST and classifies the response

use std::fmt;
use std::sync::Arc;

use batchpush_domain::constants::{AUTHORIZATION_HEADER, JSON_CONTENT_TYPE};
use batchpush_domain::{codes, ApiErrorBody, BatchError, Result};
use serde_json::Value;
use tracing::debug;

use super::ports::{HttpResponse, HttpTransport, PostRequest};

/// Sends requests for one Batch application.
///
/// Every request carries `Content-Type: application/json` and the REST key in
/// `X-Authorization`. Exactly one transport call is made per `execute`.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    rest_key: String,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn HttpTransport>, rest_key: impl Into<String>) -> Self {
        Self { transport, rest_key: rest_key.into() }
    }

    /// POST `body` to `url` and return the parsed response body.
    ///
    /// # Errors
    /// - `Transport` origin when the exchange did not complete
    /// - `Api` origin for any status `>= 400`, carrying the vendor code and
    ///   message
    pub async fn execute(&self, url: &str, body: &Value) -> Result<Value> {
        let payload = serde_json::to_vec(body).map_err(|e| {
            BatchError::api(codes::MALFORMED_JSON_BODY, format!("Unable to encode request: {e}"))
        })?;

        let request = PostRequest::new(url, payload)
            .with_header("Content-Type", JSON_CONTENT_TYPE)
            .with_header(AUTHORIZATION_HEADER, self.rest_key.as_str());

        debug!(url, "sending Batch request");
        let response = self.transport.post(request).await.map_err(|e| {
            debug!(url, error = %e, "Batch request did not complete");
            BatchError::transport(e.to_string()).with_kind(e.kind())
        })?;
        debug!(url, status = response.status, "Batch request completed");

        classify_response(&response)
    }
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor").field("rest_key", &"<redacted>").finish_non_exhaustive()
    }
}

/// Turn a completed exchange into a parsed body or a `BatchError`.
///
/// Success bodies that are not JSON are kept as a JSON string; an empty body
/// becomes `null`. Error bodies that do not follow the
/// `{"code", "type", "message"}` shape produce code 0 with the status and the
/// raw body in the message.
///
/// # Errors
/// Returns an `Api` origin error for any status `>= 400`.
pub fn classify_response(response: &HttpResponse) -> Result<Value> {
    if response.is_success() {
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_slice(&response.body)
            .unwrap_or_else(|_| Value::String(response.body_text())));
    }

    match serde_json::from_slice::<ApiErrorBody>(&response.body) {
        Ok(body) => Err(BatchError::from(body)),
        Err(_) => Err(BatchError::api(
            codes::UNCLASSIFIED,
            format!("HTTP {}: {}", response.status, response.body_text()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use batchpush_domain::ErrorOrigin;
    use serde_json::json;

    use super::*;
    use crate::transport::ports::TransportError;

    struct OneShot {
        response: std::result::Result<HttpResponse, TransportError>,
        seen: Mutex<Vec<PostRequest>>,
    }

    impl OneShot {
        fn new(response: std::result::Result<HttpResponse, TransportError>) -> Arc<Self> {
            Arc::new(Self { response, seen: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl HttpTransport for OneShot {
        async fn post(
            &self,
            request: PostRequest,
        ) -> std::result::Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn sends_auth_and_content_type_headers() {
        let transport = OneShot::new(Ok(HttpResponse::new(201, r#"{"token":"abc"}"#)));
        let executor = RequestExecutor::new(transport.clone(), "rest-key");

        let value = executor.execute("https://example/send", &json!({ "a": 1 })).await.unwrap();
        assert_eq!(value, json!({ "token": "abc" }));

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://example/send");
        assert_eq!(seen[0].header("x-authorization"), Some("rest-key"));
        assert_eq!(seen[0].header("Content-Type"), Some("application/json"));
        assert_eq!(serde_json::from_slice::<Value>(&seen[0].body).unwrap(), json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn transport_failures_map_to_transport_origin() {
        let transport = OneShot::new(Err(TransportError::Connect("refused".into())));
        let executor = RequestExecutor::new(transport, "rest-key");

        let error = executor.execute("https://example/send", &json!({})).await.unwrap_err();
        assert_eq!(error.origin(), ErrorOrigin::Transport);
        assert_eq!(error.code(), 0);
        assert!(error.message().contains("refused"));
        assert_eq!(error.kind(), Some("connect"));
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn timed_out_requests_are_not_retryable() {
        let transport = OneShot::new(Err(TransportError::Timeout("30s elapsed".into())));
        let executor = RequestExecutor::new(transport, "rest-key");

        let error = executor.execute("https://example/send", &json!({})).await.unwrap_err();
        assert_eq!(error.origin(), ErrorOrigin::Transport);
        assert_eq!(error.kind(), Some("timeout"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn error_status_uses_vendor_code_and_message() {
        let response =
            HttpResponse::new(422, r#"{"code":31,"type":"invalid","message":"bad field"}"#);
        let error = classify_response(&response).unwrap_err();
        assert_eq!(error.code(), 31);
        assert_eq!(error.message(), "bad field");
        assert_eq!(error.origin(), ErrorOrigin::Api);
    }

    #[test]
    fn unparseable_error_body_keeps_status_and_text() {
        let error = classify_response(&HttpResponse::new(502, "Bad Gateway")).unwrap_err();
        assert_eq!(error.code(), 0);
        assert_eq!(error.origin(), ErrorOrigin::Api);
        assert!(error.message().contains("502"));
        assert!(error.message().contains("Bad Gateway"));
    }

    #[test]
    fn success_bodies_are_lenient() {
        assert_eq!(classify_response(&HttpResponse::new(204, "")).unwrap(), Value::Null);
        assert_eq!(
            classify_response(&HttpResponse::new(200, "OK")).unwrap(),
            Value::String("OK".into())
        );
        assert_eq!(
            classify_response(&HttpResponse::new(202, "[1,2]")).unwrap(),
            json!([1, 2])
        );
    }
}
