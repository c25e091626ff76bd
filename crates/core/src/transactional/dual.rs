//! Transactional pushes sent to the iOS and Android applications together

use std::sync::Arc;

use batchpush_domain::constants::TRANSACTIONAL_API_VERSION;
use batchpush_domain::{ConfigError, DualResponse, OptionalFields, Platform, PushRequest, Result};
use serde_json::Value;

use super::service::TransactionalService;
use crate::dispatch::{dispatch_both, platform_credentials, DualOutcome};
use crate::transport::ports::HttpTransport;

/// Sends every push to both applications.
///
/// iOS has no notification icon: `media.icon` is stripped from the iOS copy
/// of the request (and `media` dropped if nothing else was in it). Android
/// receives the request untouched.
#[derive(Debug, Clone)]
pub struct DualTransactionalService {
    ios: TransactionalService,
    android: TransactionalService,
}

impl DualTransactionalService {
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
        let ios = platform_credentials(
            Platform::Ios,
            ios_api_key,
            rest_key,
            TRANSACTIONAL_API_VERSION,
        )?;
        let android = platform_credentials(
            Platform::Android,
            android_api_key,
            rest_key,
            TRANSACTIONAL_API_VERSION,
        )?;

        Ok(Self::from_services(
            TransactionalService::new(ios, transport.clone()),
            TransactionalService::new(android, transport),
        ))
    }

    pub fn from_services(ios: TransactionalService, android: TransactionalService) -> Self {
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

    pub fn with_debug(self, debug: bool) -> Self {
        Self { ios: self.ios.with_debug(debug), android: self.android.with_debug(debug) }
    }

    pub fn service(&self, platform: Platform) -> &TransactionalService {
        match platform {
            Platform::Ios => &self.ios,
            Platform::Android => &self.android,
        }
    }

    /// Send the push to the iOS application only, without `media.icon`.
    ///
    /// # Errors
    /// Returns the iOS call's error unmodified.
    pub async fn send_push_ios(&self, request: &PushRequest) -> Result<Value> {
        self.ios.send_push(&request.clone().without_media_icon()).await
    }

    /// # Errors
    /// Returns the Android call's error unmodified.
    pub async fn send_push_android(&self, request: &PushRequest) -> Result<Value> {
        self.android.send_push(request).await
    }

    /// Both per-platform results of a push, without reconciliation.
    pub async fn dispatch_push(&self, request: &PushRequest) -> DualOutcome<Value> {
        dispatch_both(
            "transactional.send_push",
            self.send_push_ios(request),
            self.send_push_android(request),
        )
        .await
    }

    /// Send the push to both applications.
    ///
    /// # Errors
    /// Fails when either application failed; two failures with different
    /// codes produce a composite error. An invalid request fails identically
    /// on both sides, so the iOS validation error is returned and nothing is
    /// sent.
    pub async fn send_push(&self, request: &PushRequest) -> Result<DualResponse<Value>> {
        self.dispatch_push(request).await.reconcile()
    }

    /// Send a push described by loosely typed JSON parts to both
    /// applications.
    ///
    /// # Errors
    /// A validation error (code 32) when the parts do not form a valid push,
    /// otherwise the same as [`DualTransactionalService::send_push`].
    pub async fn send_push_value(
        &self,
        push_identifier: &Value,
        recipients: &Value,
        message: &Value,
        optional_fields: OptionalFields,
    ) -> Result<DualResponse<Value>> {
        let request =
            PushRequest::from_values(push_identifier, recipients, message, optional_fields)?;
        self.send_push(&request).await
    }
}
