//! Transactional push service for one Batch application

use std::sync::Arc;

use batchpush_domain::constants::{API_DOMAIN_URL, TRANSACTIONAL_API_VERSION, TRANSACTIONAL_PATH};
use batchpush_domain::{ConfigError, Credentials, OptionalFields, Platform, PushRequest, Result};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::transport::ports::HttpTransport;
use crate::transport::RequestExecutor;

/// Sends transactional pushes through one Batch application.
#[derive(Debug, Clone)]
pub struct TransactionalService {
    executor: RequestExecutor,
    credentials: Credentials,
    base_url: String,
    platform: Option<Platform>,
    debug: bool,
}

impl TransactionalService {
    /// Create a service against the public Batch API domain.
    pub fn new(credentials: Credentials, transport: Arc<dyn HttpTransport>) -> Self {
        let executor = RequestExecutor::new(transport, credentials.rest_key());
        let base_url = credentials.base_url(API_DOMAIN_URL);
        Self { executor, credentials, base_url, platform: None, debug: false }
    }

    /// Create a service from raw keys, using the transactional API version.
    ///
    /// # Errors
    /// Returns `ConfigError` when either key is empty.
    pub fn from_keys(
        api_key: impl Into<String>,
        rest_key: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> std::result::Result<Self, ConfigError> {
        let credentials = Credentials::new(api_key, rest_key, TRANSACTIONAL_API_VERSION)?;
        Ok(Self::new(credentials, transport))
    }

    pub fn with_api_domain(mut self, api_domain: &str) -> Self {
        self.base_url = self.credentials.base_url(api_domain);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Log every accepted push at `info` instead of `debug`.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn push_url(&self) -> String {
        format!("{}{}", self.base_url, TRANSACTIONAL_PATH)
    }

    /// Validate and send one push.
    ///
    /// # Errors
    /// Returns a validation error (code 32) naming the first invalid field
    /// without any network call, or the transport/API error of the call.
    #[instrument(
        skip_all,
        fields(platform = ?self.platform, push_identifier = request.push_identifier())
    )]
    pub async fn send_push(&self, request: &PushRequest) -> Result<Value> {
        request.validate()?;

        let response = self.executor.execute(&self.push_url(), &request.to_body()).await?;
        if self.debug {
            info!(push_identifier = request.push_identifier(), "push accepted by Batch");
        } else {
            debug!(push_identifier = request.push_identifier(), "push accepted by Batch");
        }
        Ok(response)
    }

    /// Send a push described by loosely typed JSON parts.
    ///
    /// # Errors
    /// Same as [`TransactionalService::send_push`]; recipients must carry
    /// exactly one of `custom_ids`, `tokens` or `install_ids`.
    pub async fn send_push_value(
        &self,
        push_identifier: &Value,
        recipients: &Value,
        message: &Value,
        optional_fields: OptionalFields,
    ) -> Result<Value> {
        let request =
            PushRequest::from_values(push_identifier, recipients, message, optional_fields)?;
        self.send_push(&request).await
    }
}
