//! Tracing subscriber setup.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// `level` is an `EnvFilter` directive (`info`, `url_shortener_core=debug`, ...).
/// `format` is `json` for one JSON object per line, anything else for
/// human-readable text.
///
/// # Errors
///
/// Fails if `level` does not parse or a global subscriber is already set.
pub fn init(level: &str, format: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(level)
        .map_err(|e| anyhow!("Invalid log filter '{level}': {e}"))?;

    let result = if format == "json" {
        Registry::default()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()
    } else {
        Registry::default()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()
    };

    result.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}
