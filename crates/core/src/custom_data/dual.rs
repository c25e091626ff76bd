//! Custom data updates sent to the iOS and Android applications together

use std::sync::Arc;

use batchpush_domain::constants::CUSTOM_DATA_API_VERSION;
use batchpush_domain::{ConfigError, CustomDataRecord, DualResponse, Platform, Result};
use serde_json::Value;

use super::service::CustomDataService;
use crate::dispatch::{dispatch_both, platform_credentials, DualOutcome};
use crate::transport::ports::HttpTransport;

/// Sends every custom data update to both applications.
///
/// The two calls run concurrently and independently. The combined call only
/// succeeds when both applications accepted the update.
#[derive(Debug, Clone)]
pub struct DualCustomDataService {
    ios: CustomDataService,
    android: CustomDataService,
}

impl DualCustomDataService {
    /// Build both services from the two API keys and the shared REST key.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingPlatformKey` for an empty API key, or
    /// `ConfigError::MissingRestKey` for an empty REST key.
    pub fn new(
        ios_api_key: &str,
        android_api_key: &str,
        rest_key: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> std::result::Result<Self, ConfigError> {
        let ios =
            platform_credentials(Platform::Ios, ios_api_key, rest_key, CUSTOM_DATA_API_VERSION)?;
        let android = platform_credentials(
            Platform::Android,
            android_api_key,
            rest_key,
            CUSTOM_DATA_API_VERSION,
        )?;

        Ok(Self::from_services(
            CustomDataService::new(ios, transport.clone()),
            CustomDataService::new(android, transport),
        ))
    }

    pub fn from_services(ios: CustomDataService, android: CustomDataService) -> Self {
        Self {
            ios: ios.with_platform(Platform::Ios),
            android: android.with_platform(Platform::Android),
        }
    }

    pub fn with_api_domain(self, api_domain: &str) -> Self {
        Self {
            ios: self.ios.with_api_domain(api_domain),
            android: self.android.with_api_domain(api_domain),
        }
    }

    pub fn service(&self, platform: Platform) -> &CustomDataService {
        match platform {
            Platform::Ios => &self.ios,
            Platform::Android => &self.android,
        }
    }

    /// # Errors
    /// Returns the iOS call's error unmodified.
    pub async fn send_ios(&self, record: &CustomDataRecord) -> Result<Value> {
        self.ios.send(record).await
    }

    /// # Errors
    /// Returns the Android call's error unmodified.
    pub async fn send_android(&self, record: &CustomDataRecord) -> Result<Value> {
        self.android.send(record).await
    }

    /// Both per-platform results of an update, without reconciliation.
    pub async fn dispatch(&self, record: &CustomDataRecord) -> DualOutcome<Value> {
        dispatch_both("custom_data.send", self.ios.send(record), self.android.send(record)).await
    }

    /// Update one user on both applications.
    ///
    /// # Errors
    /// Fails when either application failed; two failures with different
    /// codes produce a composite error.
    pub async fn send(&self, record: &CustomDataRecord) -> Result<DualResponse<Value>> {
        self.dispatch(record).await.reconcile()
    }

    /// # Errors
    /// Returns the iOS call's error unmodified.
    pub async fn send_bulk_ios(&self, body: &[Value]) -> Result<Value> {
        self.ios.send_bulk(body).await
    }

    /// # Errors
    /// Returns the Android call's error unmodified.
    pub async fn send_bulk_android(&self, body: &[Value]) -> Result<Value> {
        self.android.send_bulk(body).await
    }

    /// Both per-platform results of a bulk update, without reconciliation.
    pub async fn dispatch_bulk(&self, body: &[Value]) -> DualOutcome<Value> {
        dispatch_both(
            "custom_data.send_bulk",
            self.ios.send_bulk(body),
            self.android.send_bulk(body),
        )
        .await
    }

    /// Send a bulk update to both applications.
    ///
    /// # Errors
    /// Same reconciliation as [`DualCustomDataService::send`].
    pub async fn send_bulk(&self, body: &[Value]) -> Result<DualResponse<Value>> {
        self.dispatch_bulk(body).await.reconcile()
    }
}
