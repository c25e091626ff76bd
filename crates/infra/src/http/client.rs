use std::time::Duration;

use async_trait::async_trait;
use batchpush_core::{HttpResponse, HttpTransport, PostRequest, TransportError};
use batchpush_domain::constants::{
    DEFAULT_HTTP_BASE_BACKOFF_MS, DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_HTTP_TIMEOUT_SECS,
};
use batchpush_domain::HttpConfig;
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with timeout and bounded transport-level retries.
///
/// Only connect failures are retried, since the request never left the
/// client. Timeouts surface after one attempt because the POST may already have
/// been delivered. Any status the server answers with, including 5xx, is handed
/// back as is.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    /// Returns `TransportError` if the underlying client cannot be built.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Client configured from the `http` section of the configuration.
    ///
    /// # Errors
    /// Returns `TransportError` if the underlying client cannot be built.
    pub fn from_config(config: &HttpConfig) -> Result<Self, TransportError> {
        let mut builder = Self::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .max_attempts(config.max_attempts)
            .base_backoff(Duration::from_millis(config.base_backoff_ms));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        builder.build()
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// # Errors
    /// Returns `TransportError` once the exchange failed on every attempt.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, TransportError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                TransportError::Other(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request = cloned_builder.build().map_err(InfraError::from)?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt = attempt + 1, %method, %url, %status, "received HTTP response");
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, %url, error = %err, "HTTP request failed");

                    if attempt + 1 < attempts && should_retry_error(&err) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(TransportError::Other("http client exhausted retries without producing a result".into()))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = u32::try_from(retry_number.saturating_sub(1).min(8)).unwrap_or(8);
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn post(&self, request: PostRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(request.url.as_str()).body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = self.send(builder).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(InfraError::from)?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_HTTP_BASE_BACKOFF_MS),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// Returns `TransportError` if reqwest rejects the configuration.
    pub fn build(self) -> Result<HttpClient, TransportError> {
        let agent = self
            .user_agent
            .unwrap_or_else(|| format!("batchpush/{}", env!("CARGO_PKG_VERSION")));
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .no_proxy()
            .user_agent(agent)
            .build()
            .map_err(InfraError::from)?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() && !err.is_timeout() {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_with_retries() -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(10))
            .max_attempts(3)
            .build()
            .expect("http client")
    }

    #[tokio::test]
    async fn posts_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1.1/KEY/transactional/send"))
            .and(header("X-Authorization", "rest"))
            .and(body_string(r#"{"a":1}"#))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"token":"t"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let request = PostRequest::new(
            format!("{}/1.1/KEY/transactional/send", server.uri()),
            br#"{"a":1}"#.to_vec(),
        )
        .with_header("X-Authorization", "rest");

        let response = client_with_retries().post(request).await.expect("response");
        assert_eq!(response.status, 201);
        assert_eq!(response.body_text(), r#"{"token":"t"}"#);
    }

    #[tokio::test]
    async fn does_not_retry_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let request = PostRequest::new(server.uri(), Vec::new());
        let response = client_with_retries().post(request).await.expect("response");

        assert_eq!(response.status, 503);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn timeouts_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_millis(500)))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .timeout(Duration::from_millis(50))
            .base_backoff(Duration::from_millis(5))
            .max_attempts(3)
            .build()
            .expect("http client");

        let result = client.post(PostRequest::new(server.uri(), b"{}".to_vec())).await;
        match result {
            Err(TransportError::Timeout(_)) => {}
            other => panic!("expected timeout error, got {other:?}"),
        }
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn network_failure_surfaces_after_retries() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let client = HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(2)
            .build()
            .expect("http client");

        let result = client.post(PostRequest::new(format!("http://{addr}"), Vec::new())).await;
        match result {
            Err(TransportError::Connect(_)) => {}
            other => panic!("expected connect error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sends_default_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("User-Agent", format!("batchpush/{}", env!("CARGO_PKG_VERSION")).as_str()))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let response =
            HttpClient::new().unwrap().post(PostRequest::new(server.uri(), Vec::new())).await;
        assert_eq!(response.expect("response").status, 201);
    }

    #[tokio::test]
    async fn configured_user_agent_overrides_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("User-Agent", "acme-backend/2.1"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let config =
            HttpConfig { user_agent: Some("acme-backend/2.1".into()), ..HttpConfig::default() };
        let client = HttpClient::from_config(&config).unwrap();

        let response = client.post(PostRequest::new(server.uri(), Vec::new())).await;
        assert_eq!(response.expect("response").status, 201);
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let client = HttpClient::builder().base_backoff(Duration::from_millis(100)).build().unwrap();
        assert_eq!(client.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(client.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(client.backoff_delay(3), Duration::from_millis(400));
    }

    #[test]
    fn config_defaults_to_single_attempt() {
        let client = HttpClient::from_config(&HttpConfig::default()).unwrap();
        assert_eq!(client.max_attempts(), 1);
    }
}
