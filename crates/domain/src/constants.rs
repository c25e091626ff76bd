//! Batch API constants
//!
//! Centralized location for the vendor-level constants used throughout the
//! client: endpoints, versions, headers and the push default table values.

// Endpoints
pub const API_DOMAIN_URL: &str = "https://api.batch.com";
pub const CUSTOM_DATA_PATH: &str = "data/users";
pub const TRANSACTIONAL_PATH: &str = "transactional/send";

// API versions per API family
pub const CUSTOM_DATA_API_VERSION: &str = "1.0";
pub const TRANSACTIONAL_API_VERSION: &str = "1.1";

// Headers
pub const AUTHORIZATION_HEADER: &str = "X-Authorization";
pub const JSON_CONTENT_TYPE: &str = "application/json";

// Push optional-field defaults
pub const DEFAULT_PRIORITY: &str = "normal";
pub const DEFAULT_TIME_TO_LIVE_SECS: u64 = 172_800;
pub const DEFAULT_COLLAPSE_KEY: &str = "default";
pub const DEFAULT_CUSTOM_PAYLOAD: &str = "{}";

// Transport defaults
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_MAX_ATTEMPTS: usize = 1;
pub const DEFAULT_HTTP_BASE_BACKOFF_MS: u64 = 200;
