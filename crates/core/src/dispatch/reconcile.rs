//! Reconciliation of two per-target outcomes
//!
//! | ios error | android error | result |
//! |---|---|---|
//! | none | none | success |
//! | none | present | android's error |
//! | present | none | ios's error |
//! | present | present, same code | ios's error |
//! | present | present, different code | composite error |

use batchpush_domain::{BatchError, DualResponse, Platform, Result};

/// Per-target results of one dual operation, before reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct DualOutcome<T> {
    pub ios: Result<T>,
    pub android: Result<T>,
}

impl<T> DualOutcome<T> {
    pub fn get(&self, platform: Platform) -> &Result<T> {
        match platform {
            Platform::Ios => &self.ios,
            Platform::Android => &self.android,
        }
    }

    /// Exactly one of the two targets failed.
    pub fn is_partial_failure(&self) -> bool {
        self.ios.is_ok() != self.android.is_ok()
    }

    /// Collapse both outcomes into a single result.
    ///
    /// # Errors
    /// Fails as soon as either target failed; see the module table for which
    /// error is reported.
    pub fn reconcile(self) -> Result<DualResponse<T>> {
        match (self.ios, self.android) {
            (Ok(ios), Ok(android)) => Ok(DualResponse { ios, android }),
            (Err(error), Ok(_)) | (Ok(_), Err(error)) => Err(error),
            (Err(ios), Err(android)) => Err(merge_failures(ios, android)),
        }
    }
}

/// Decide the overall error for a pair of optional per-target errors.
///
/// Returns `None` only when neither target failed.
pub fn reconcile_errors(ios: Option<&BatchError>, android: Option<&BatchError>) -> Option<BatchError> {
    match (ios, android) {
        (None, None) => None,
        (Some(error), None) | (None, Some(error)) => Some(error.clone()),
        (Some(ios), Some(android)) => Some(merge_failures(ios.clone(), android.clone())),
    }
}

/// Combine two failures: the iOS error when both codes match, a composite
/// error naming both otherwise.
pub fn merge_failures(ios: BatchError, android: BatchError) -> BatchError {
    if ios.code() == android.code() {
        return ios;
    }

    BatchError::composite(format!(
        "2 Exceptions occurred.\n[{ios_tag}-{}]{}[/{ios_tag}]\n[{android_tag}-{}]{}[/{android_tag}]",
        ios.code(),
        ios.message(),
        android.code(),
        android.message(),
        ios_tag = Platform::Ios.tag(),
        android_tag = Platform::Android.tag(),
    ))
}

#[cfg(test)]
mod tests {
    use batchpush_domain::ErrorOrigin;

    use super::*;

    fn err(code: i64, message: &str) -> BatchError {
        BatchError::api(code, message)
    }

    #[test]
    fn no_errors_means_success() {
        assert_eq!(reconcile_errors(None, None), None);

        let outcome = DualOutcome { ios: Ok(1), android: Ok(2) };
        assert_eq!(outcome.reconcile(), Ok(DualResponse { ios: 1, android: 2 }));
    }

    #[test]
    fn single_failure_is_reported_as_is() {
        let android = err(31, "bad field");
        assert_eq!(reconcile_errors(None, Some(&android)), Some(android.clone()));

        let ios = err(10, "auth");
        assert_eq!(reconcile_errors(Some(&ios), None), Some(ios.clone()));

        let outcome: DualOutcome<()> = DualOutcome { ios: Ok(()), android: Err(android.clone()) };
        assert!(outcome.is_partial_failure());
        assert_eq!(outcome.reconcile(), Err(android));
    }

    #[test]
    fn same_code_reports_ios_error() {
        let ios = err(5, "ios side");
        let android = err(5, "android side");
        assert_eq!(reconcile_errors(Some(&ios), Some(&android)), Some(ios));
    }

    #[test]
    fn different_codes_build_composite() {
        let merged = merge_failures(err(5, "first"), err(9, "second"));

        assert_eq!(merged.code(), 0);
        assert_eq!(merged.origin(), ErrorOrigin::Composite);
        assert_eq!(
            merged.message(),
            "2 Exceptions occurred.\n[iOS-5]first[/iOS]\n[Android-9]second[/Android]"
        );
    }

    #[test]
    fn both_failed_is_not_partial() {
        let outcome: DualOutcome<()> =
            DualOutcome { ios: Err(err(1, "a")), android: Err(err(2, "b")) };
        assert!(!outcome.is_partial_failure());
        assert_eq!(outcome.reconcile().unwrap_err().origin(), ErrorOrigin::Composite);
    }
}
