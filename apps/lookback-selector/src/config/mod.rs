//! Configuration module for the lookback selector.
//!
//! Loads the run configuration from YAML, interpolates environment
//! variables and validates every value the selection core consumes before
//! any table is read.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lookback_selector::config::load_config;
//!
//! // Load from default path (report_config.yaml)
//! let config = load_config(None)?;
//!
//! println!("OOS gate: {}", config.report.specific.selection.oos_threshold);
//! ```

mod observability;
mod overrides;
mod paths;
mod report;
mod scoring;

use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};
pub use overrides::{PeriodOverride, UNSET_MARKER};
pub use paths::CoreConfig;
pub use report::{CombineSystemsConfig, ReportConfig, SpecificConfig, SystemConfig};
pub use scoring::{SelectionConfig, SharpeConfig};

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = "report_config.yaml";

/// Upper bound for `max_oos_age_days` (about a century).
pub const MAX_OOS_AGE_DAYS: u32 = 36_500;

/// Errors raised before any table is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// File that was requested.
        path: String,
        /// Cause.
        source: std::io::Error,
    },

    /// The YAML is malformed or does not match the schema.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// A value is out of range or a referenced directory is missing.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// A full run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Input and output locations.
    pub core: CoreConfig,
    /// Report stages and selection settings.
    #[serde(default)]
    pub report: ReportConfig,
    /// Console logging.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Read, interpolate, parse and validate the configuration at `path`
/// (`report_config.yaml` when `None`).
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.display().to_string(),
        source,
    })?;

    load_config_from_string(&yaml)
}

/// Same as [`load_config`] for YAML already in memory.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml_bw::from_str(&interpolate_env_vars(yaml))?;
    validate_config(&config)?;
    Ok(config)
}

/// Replace `${VAR}` and `${VAR:-default}` with values from the environment.
///
/// An unset or empty variable takes the default, or the empty string
/// without one.
#[allow(clippy::expect_used)] // constant pattern
fn interpolate_env_vars(input: &str) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

    let placeholder = PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("placeholder pattern compiles")
    });

    placeholder
        .replace_all(input, |caps: &Captures<'_>| {
            let fallback = caps.get(2).map_or("", |m| m.as_str());
            std::env::var(&caps[1])
                .ok()
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        })
        .into_owned()
}

/// Check every value the selection core relies on.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let core = &config.core;
    if core.output_name.trim().is_empty() {
        return Err(invalid("core.output_name must not be empty"));
    }
    if core.is_file_name.trim().is_empty() || core.oos_file_name.trim().is_empty() {
        return Err(invalid(
            "core.is_file_name and core.oos_file_name must not be empty",
        ));
    }
    if core
        .parameters_file_name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        return Err(invalid("core.parameters_file_name must not be empty when set"));
    }

    let sharpe = &config.report.sharpe;
    if sharpe.periods_per_year == 0 {
        return Err(invalid("report.sharpe.periods_per_year must be positive"));
    }
    if !(0.0..=1.0).contains(&sharpe.risk_free_rate) {
        return Err(invalid(
            "report.sharpe.risk_free_rate must be between 0.0 and 1.0",
        ));
    }

    validate_selection("report.specific.selection", &config.report.specific.selection)?;

    let combine = &config.report.combine_systems;
    validate_selection("report.combine_systems.selection", &combine.selection)?;

    if combine.enable {
        if combine.systems.is_empty() {
            return Err(invalid(
                "report.combine_systems.systems must list at least one system when enabled",
            ));
        }

        for (dir, system) in &combine.systems {
            if !system.risk.is_finite() || system.risk <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "risk for system '{}' must be a positive number",
                    dir.display()
                )));
            }
            if !dir.is_dir() {
                return Err(ConfigError::ValidationError(format!(
                    "system directory '{}' does not exist",
                    dir.display()
                )));
            }
        }
    }

    Ok(())
}

fn validate_selection(name: &str, selection: &SelectionConfig) -> Result<(), ConfigError> {
    let values = [
        selection.oos_threshold,
        selection.combined_threshold,
        selection.oos_weight,
        selection.combined_weight,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ConfigError::ValidationError(format!(
            "{name} thresholds and weights must be finite"
        )));
    }

    if selection.oos_weight < 0.0 || selection.combined_weight < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "{name} weights must not be negative"
        )));
    }

    if selection.oos_weight == 0.0 && selection.combined_weight == 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "{name} weights must not both be zero"
        )));
    }

    if selection
        .max_oos_age_days
        .is_some_and(|days| days > MAX_OOS_AGE_DAYS)
    {
        return Err(ConfigError::ValidationError(format!(
            "{name}.max_oos_age_days must be at most {MAX_OOS_AGE_DAYS}"
        )));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
