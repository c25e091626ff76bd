//! Platform identities
//!
//! A dual dispatch targets two independently keyed Batch applications, one
//! per mobile platform.

use serde::{Deserialize, Serialize};

/// One of the two backend applications a logical operation is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

crate::impl_domain_status_conversions!(Platform {
    Ios => "ios",
    Android => "android",
});

impl Platform {
    /// Both platforms, in dispatch order.
    pub const ALL: [Self; 2] = [Self::Ios, Self::Android];

    /// Human-facing tag used in composite error messages.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
        }
    }
}

/// Per-platform results of an operation that succeeded on both targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualResponse<T> {
    pub ios: T,
    pub android: T,
}

impl<T> DualResponse<T> {
    pub fn get(&self, platform: Platform) -> &T {
        match platform {
            Platform::Ios => &self.ios,
            Platform::Android => &self.android,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> DualResponse<U> {
        DualResponse { ios: f(self.ios), android: f(self.android) }
    }
}
