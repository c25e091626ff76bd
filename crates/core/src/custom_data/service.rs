//! Custom data service for one Batch application

use std::sync::Arc;

use batchpush_domain::constants::{API_DOMAIN_URL, CUSTOM_DATA_API_VERSION, CUSTOM_DATA_PATH};
use batchpush_domain::{ConfigError, Credentials, CustomDataRecord, Platform, Result};
use serde_json::Value;
use tracing::instrument;

use crate::transport::ports::HttpTransport;
use crate::transport::RequestExecutor;

/// Updates user attributes of one Batch application.
#[derive(Debug, Clone)]
pub struct CustomDataService {
    executor: RequestExecutor,
    credentials: Credentials,
    base_url: String,
    platform: Option<Platform>,
}

impl CustomDataService {
    /// Create a service against the public Batch API domain.
    pub fn new(credentials: Credentials, transport: Arc<dyn HttpTransport>) -> Self {
        let executor = RequestExecutor::new(transport, credentials.rest_key());
        let base_url = credentials.base_url(API_DOMAIN_URL);
        Self { executor, credentials, base_url, platform: None }
    }

    /// Create a service from raw keys, using the custom data API version.
    ///
    /// # Errors
    /// Returns `ConfigError` when either key is empty.
    pub fn from_keys(
        api_key: impl Into<String>,
        rest_key: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> std::result::Result<Self, ConfigError> {
        let credentials = Credentials::new(api_key, rest_key, CUSTOM_DATA_API_VERSION)?;
        Ok(Self::new(credentials, transport))
    }

    pub fn with_api_domain(mut self, api_domain: &str) -> Self {
        self.base_url = self.credentials.base_url(api_domain);
        self
    }

    /// Tag log lines with the platform this application serves.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint for one user; the id is percent-encoded as a path segment.
    pub fn user_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, CUSTOM_DATA_PATH, urlencoding::encode(id))
    }

    pub fn bulk_url(&self) -> String {
        format!("{}{}", self.base_url, CUSTOM_DATA_PATH)
    }

    /// Update the attributes of one user.
    ///
    /// # Errors
    /// Returns a validation error for an empty id (no request is sent), or
    /// the transport/API error of the call.
    #[instrument(skip_all, fields(platform = ?self.platform, user_id = %record.id))]
    pub async fn send(&self, record: &CustomDataRecord) -> Result<Value> {
        record.validate()?;
        self.executor.execute(&self.user_url(&record.id), &record.to_body()).await
    }

    /// Send a bulk update. The body is forwarded verbatim.
    ///
    /// # Errors
    /// Returns the transport/API error of the call.
    #[instrument(skip_all, fields(platform = ?self.platform, records = body.len()))]
    pub async fn send_bulk(&self, body: &[Value]) -> Result<Value> {
        self.executor.execute(&self.bulk_url(), &Value::Array(body.to_vec())).await
    }
}
