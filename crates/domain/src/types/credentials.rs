//! Credentials for one Batch application

use std::fmt;

use crate::errors::ConfigError;

/// API key, REST key and API version identifying one Batch application.
///
/// The API key selects the application; the REST key grants access to the
/// API and is shared between the iOS and Android applications. Both keys are
/// checked at construction so an unusable client can never be built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    rest_key: String,
    api_version: String,
}

impl Credentials {
    /// Build credentials, rejecting empty keys.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingApiKey` or `ConfigError::MissingRestKey`
    /// when the corresponding key is empty or whitespace.
    pub fn new(
        api_key: impl Into<String>,
        rest_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let rest_key = rest_key.into();
        if rest_key.trim().is_empty() {
            return Err(ConfigError::MissingRestKey);
        }

        Ok(Self { api_key, rest_key, api_version: api_version.into() })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn rest_key(&self) -> &str {
        &self.rest_key
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Base URL of this application: `{domain}/{version}/{api_key}/`.
    pub fn base_url(&self, api_domain: &str) -> String {
        format!("{}/{}/{}/", api_domain.trim_end_matches('/'), self.api_version, self.api_key)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("rest_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .finish()
    }
}
