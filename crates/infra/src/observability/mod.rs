//! Logging setup
//!
//! Installs a `tracing-subscriber` fmt subscriber. `RUST_LOG` takes
//! precedence over the configured level; otherwise the level from
//! [`LoggingConfig`] applies to every target.

use batchpush_domain::LoggingConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber described by `config`.
///
/// Returns `false` when a subscriber was already installed (by an earlier
/// call or by the host application); the existing one is kept.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let builder = fmt::Subscriber::builder().with_env_filter(env_filter(config)).with_target(true);

    let installed = if config.json {
        builder.json().flatten_event(true).try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "tracing initialised");
    }
    installed
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
