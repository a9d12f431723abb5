//! Tracing Setup
//!
//! Installs a console `tracing` subscriber.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives; wins over the configured level
//! - `observability.logging.format`: `pretty` (default) or `json`
//!
//! # Usage
//!
//! ```rust,ignore
//! use lookback_selector::telemetry::init_tracing;
//!
//! init_tracing(&config.observability.logging);
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` when set, otherwise the configured level.
#[must_use]
pub fn env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Initialize the global tracing subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing(logging: &LoggingConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(logging))
        .with_target(logging.include_target);

    let result = if logging.is_json() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back() {
        let logging = LoggingConfig {
            level: "[not a directive".to_string(),
            ..LoggingConfig::default()
        };
        // RUST_LOG may be set in the environment; either way a filter is built
        let filter = env_filter(&logging);
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let logging = LoggingConfig::default();
        init_tracing(&logging);
        init_tracing(&logging);
    }
}
