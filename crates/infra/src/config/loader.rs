//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads an optional `.env` file into the environment
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `BATCH_IOS_API_KEY`: API key of the iOS application (required)
//! - `BATCH_ANDROID_API_KEY`: API key of the Android application (required)
//! - `BATCH_REST_KEY`: REST key shared by both applications (required)
//! - `BATCH_API_DOMAIN`: API domain, defaults to `https://api.batch.com`
//! - `BATCH_CUSTOM_DATA_API_VERSION`: defaults to `1.0`
//! - `BATCH_TRANSACTIONAL_API_VERSION`: defaults to `1.1`
//! - `BATCH_HTTP_TIMEOUT_SECS`: request timeout in seconds
//! - `BATCH_HTTP_MAX_ATTEMPTS`: total attempts per request
//! - `BATCH_HTTP_BASE_BACKOFF_MS`: backoff before the first retry
//! - `BATCH_HTTP_USER_AGENT`: `User-Agent` sent with every request
//! - `BATCH_DEBUG`: log every accepted push at `info` (true/false)
//! - `BATCH_LOG_LEVEL`: default log level when `RUST_LOG` is unset
//! - `BATCH_LOG_JSON`: emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./batch.toml` or `./batch.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use batchpush_domain::{BatchConfig, ConfigError, HttpConfig, LoggingConfig};

type Result<T> = std::result::Result<T, ConfigError>;

const CONFIG_FILE_NAMES: [&str; 4] = ["batch.toml", "batch.json", "config.toml", "config.json"];

/// Load and validate configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ConfigError` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails [`BatchConfig::validate`]
pub fn load() -> Result<BatchConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// The three keys are required; every other variable falls back to its
/// default when unset.
///
/// # Errors
/// Returns `ConfigError::MissingEnv` if a key is missing, or
/// `ConfigError::Invalid` if a numeric variable does not parse.
pub fn load_from_env() -> Result<BatchConfig> {
    let mut config = BatchConfig::new(
        env_var("BATCH_IOS_API_KEY")?,
        env_var("BATCH_ANDROID_API_KEY")?,
        env_var("BATCH_REST_KEY")?,
    );

    if let Ok(domain) = std::env::var("BATCH_API_DOMAIN") {
        config.api_domain = domain;
    }
    if let Ok(version) = std::env::var("BATCH_CUSTOM_DATA_API_VERSION") {
        config.custom_data_api_version = version;
    }
    if let Ok(version) = std::env::var("BATCH_TRANSACTIONAL_API_VERSION") {
        config.transactional_api_version = version;
    }
    config.debug = env_bool("BATCH_DEBUG", false);

    let defaults = HttpConfig::default();
    config.http = HttpConfig {
        timeout_secs: env_parse("BATCH_HTTP_TIMEOUT_SECS", defaults.timeout_secs)?,
        max_attempts: env_parse("BATCH_HTTP_MAX_ATTEMPTS", defaults.max_attempts)?,
        base_backoff_ms: env_parse("BATCH_HTTP_BASE_BACKOFF_MS", defaults.base_backoff_ms)?,
        user_agent: std::env::var("BATCH_HTTP_USER_AGENT").ok().filter(|ua| !ua.trim().is_empty()),
    };

    let logging = LoggingConfig::default();
    config.logging = LoggingConfig {
        level: std::env::var("BATCH_LOG_LEVEL").unwrap_or(logging.level),
        json: env_bool("BATCH_LOG_JSON", logging.json),
    };

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ConfigError::File` if the file is missing or unreadable, or
/// `ConfigError::Invalid` if its contents do not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<BatchConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::File(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ConfigError::File("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ConfigError::File(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<BatchConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConfigError::Invalid(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConfigError::Invalid(format!("Invalid JSON format: {e}"))),
        _ => Err(ConfigError::File(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard paths for configuration files
///
/// Searches the current working directory first, then the directory of the
/// executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnv(key.to_string()))
}

/// Parse an optional environment variable, using `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
