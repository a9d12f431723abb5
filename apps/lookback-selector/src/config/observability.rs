//! Console logging settings.

use serde::{Deserialize, Serialize};

/// Where run diagnostics go. Only console logging is supported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Console log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Line format of the console subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Console log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is not set (e.g. `info`,
    /// `lookback_selector=debug`).
    #[serde(default = "info_level")]
    pub level: String,
    /// Line format.
    #[serde(default)]
    pub format: LogFormat,
    /// Print the event target (module path) on each line.
    #[serde(default = "enabled")]
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: info_level(),
            format: LogFormat::default(),
            include_target: true,
        }
    }
}

impl LoggingConfig {
    /// Whether structured JSON output was requested.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, LogFormat::Json)
    }
}

fn info_level() -> String {
    "info".to_string()
}

const fn enabled() -> bool {
    true
}
