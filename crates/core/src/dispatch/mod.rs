//! Dual-target dispatch and outcome reconciliation

mod reconcile;

use std::future::Future;

use batchpush_domain::{ConfigError, Credentials, Platform, Result};
use tracing::{warn, Instrument};
use uuid::Uuid;

pub use reconcile::{merge_failures, reconcile_errors, DualOutcome};

/// Drive the iOS and Android calls of one operation concurrently.
///
/// Both futures always run to completion; a failure on one side never stops
/// the other. Failures are logged per platform under a shared `dispatch_id`.
pub async fn dispatch_both<T, I, A>(operation: &'static str, ios: I, android: A) -> DualOutcome<T>
where
    I: Future<Output = Result<T>>,
    A: Future<Output = Result<T>>,
{
    let dispatch_id = Uuid::now_v7();
    let span = tracing::info_span!("dual_dispatch", operation, %dispatch_id);

    async move {
        let (ios, android) = tokio::join!(ios, android);
        let outcome = DualOutcome { ios, android };

        for platform in Platform::ALL {
            if let Err(error) = outcome.get(platform) {
                warn!(
                    %platform,
                    code = error.code(),
                    kind = error.label(),
                    error = %error,
                    "Batch call failed for one platform"
                );
            }
        }

        outcome
    }
    .instrument(span)
    .await
}

/// Credentials for one platform of a dual coordinator.
///
/// An empty API key is reported against its platform so the caller knows
/// which application is misconfigured.
pub(crate) fn platform_credentials(
    platform: Platform,
    api_key: &str,
    rest_key: &str,
    api_version: &str,
) -> std::result::Result<Credentials, ConfigError> {
    if api_key.trim().is_empty() {
        return Err(ConfigError::MissingPlatformKey(platform));
    }
    Credentials::new(api_key, rest_key, api_version)
}

#[cfg(test)]
mod tests {
    use batchpush_domain::BatchError;

    use super::*;

    #[tokio::test]
    async fn both_sides_run_even_when_one_fails() {
        let outcome = dispatch_both(
            "test",
            async { Err::<u8, _>(BatchError::api(31, "bad field")) },
            async { Ok(7) },
        )
        .await;

        assert!(outcome.ios.is_err());
        assert_eq!(outcome.android, Ok(7));
    }
}
