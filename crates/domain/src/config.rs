//! Configuration management

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    API_DOMAIN_URL, CUSTOM_DATA_API_VERSION, DEFAULT_HTTP_BASE_BACKOFF_MS,
    DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_HTTP_TIMEOUT_SECS, TRANSACTIONAL_API_VERSION,
};
use crate::errors::ConfigError;
use crate::types::Platform;

/// Client configuration
///
/// The REST key is shared by both applications and is never serialized back
/// out.
#[derive(Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub ios_api_key: String,
    pub android_api_key: String,
    #[serde(skip_serializing)]
    pub rest_key: String,
    #[serde(default = "default_api_domain")]
    pub api_domain: String,
    #[serde(default = "default_custom_data_api_version")]
    pub custom_data_api_version: String,
    #[serde(default = "default_transactional_api_version")]
    pub transactional_api_version: String,
    /// Log every successful push at `info`.
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per call (initial try + retries). Retries only happen
    /// for connect failures.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    /// `User-Agent` header value; `batchpush/<version>` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_api_domain() -> String {
    API_DOMAIN_URL.to_string()
}

fn default_custom_data_api_version() -> String {
    CUSTOM_DATA_API_VERSION.to_string()
}

fn default_transactional_api_version() -> String {
    TRANSACTIONAL_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_HTTP_MAX_ATTEMPTS
}

fn default_base_backoff_ms() -> u64 {
    DEFAULT_HTTP_BASE_BACKOFF_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
            base_backoff_ms: DEFAULT_HTTP_BASE_BACKOFF_MS,
            user_agent: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

impl BatchConfig {
    /// Configuration with the given keys and every other field defaulted.
    pub fn new(
        ios_api_key: impl Into<String>,
        android_api_key: impl Into<String>,
        rest_key: impl Into<String>,
    ) -> Self {
        Self {
            ios_api_key: ios_api_key.into(),
            android_api_key: android_api_key.into(),
            rest_key: rest_key.into(),
            api_domain: default_api_domain(),
            custom_data_api_version: default_custom_data_api_version(),
            transactional_api_version: default_transactional_api_version(),
            debug: false,
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn with_api_domain(mut self, api_domain: impl Into<String>) -> Self {
        self.api_domain = api_domain.into();
        self
    }

    pub fn api_key(&self, platform: Platform) -> &str {
        match platform {
            Platform::Ios => &self.ios_api_key,
            Platform::Android => &self.android_api_key,
        }
    }

    /// Check the configuration before any client is built from it.
    ///
    /// # Errors
    /// Returns `ConfigError` for empty keys, an unparseable API domain or an
    /// attempt budget of zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for platform in Platform::ALL {
            if self.api_key(platform).trim().is_empty() {
                return Err(ConfigError::MissingPlatformKey(platform));
            }
        }

        if self.rest_key.trim().is_empty() {
            return Err(ConfigError::MissingRestKey);
        }

        let domain = Url::parse(&self.api_domain).map_err(|e| {
            ConfigError::Invalid(format!("api_domain '{}' is not a URL: {e}", self.api_domain))
        })?;
        if !matches!(domain.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "api_domain must use http or https, got '{}'",
                domain.scheme()
            )));
        }

        if self.http.max_attempts == 0 {
            return Err(ConfigError::Invalid("http.max_attempts must be at least 1".into()));
        }

        Ok(())
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("ios_api_key", &self.ios_api_key)
            .field("android_api_key", &self.android_api_key)
            .field("rest_key", &"<redacted>")
            .field("api_domain", &self.api_domain)
            .field("custom_data_api_version", &self.custom_data_api_version)
            .field("transactional_api_version", &self.transactional_api_version)
            .field("debug", &self.debug)
            .field("http", &self.http)
            .field("logging", &self.logging)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let config: BatchConfig = serde_json::from_str(
            r#"{"ios_api_key": "ios", "android_api_key": "android", "rest_key": "rest"}"#,
        )
        .unwrap();

        assert_eq!(config.api_domain, "https://api.batch.com");
        assert_eq!(config.custom_data_api_version, "1.0");
        assert_eq!(config.transactional_api_version, "1.1");
        assert_eq!(config.http.max_attempts, 1);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rest_key_is_never_serialized() {
        let config = BatchConfig::new("ios", "android", "secret-rest");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-rest"));
        assert!(!format!("{config:?}").contains("secret-rest"));
    }

    #[test]
    fn validate_reports_missing_platform_key() {
        let config = BatchConfig::new("ios", "", "rest");
        assert_eq!(config.validate(), Err(ConfigError::MissingPlatformKey(Platform::Android)));

        let config = BatchConfig::new("", "android", "rest");
        assert_eq!(config.validate(), Err(ConfigError::MissingPlatformKey(Platform::Ios)));
    }

    #[test]
    fn validate_rejects_bad_domain_and_attempts() {
        let config = BatchConfig::new("ios", "android", "rest").with_api_domain("not a url");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = BatchConfig::new("ios", "android", "rest").with_api_domain("ftp://batch");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = BatchConfig::new("ios", "android", "rest");
        config.http.max_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
