// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::unreadable_literal
    )
)]

//! Lookback Selector - Rust Core Library
//!
//! Picks, per market, the in-sample lookback period (`IS_QuarterCount`)
//! whose out-of-sample and spliced IS-then-OOS returns score best, and
//! hands the chosen return series to a report renderer.
//!
//! # Architecture
//!
//! Leaves first:
//!
//! - `table`: CSV trade tables and the parameters extract
//! - `returns`: return series, derived IS/OOS views and date-aligned aggregation
//! - `metrics`: statistics, the `ReturnScorer` port and the Sharpe scorer
//! - `selection`: gate, weighted ranking and manual overrides per market
//! - `combine`: selection and aggregation across several systems
//! - `report`: the `ReportRenderer` port, JSON tearsheets and persistence
//! - `pipeline`: the explicit run entry point and its stages
//!
//! Ambient:
//!
//! - `config`: YAML configuration with environment interpolation and validation
//! - `telemetry`: tracing subscriber setup
//! - `error`: the run-level error type

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Combination of independently backtested systems.
pub mod combine;

/// Configuration loading and validation.
pub mod config;

/// Run-level errors.
pub mod error;

/// Performance metrics and scoring.
pub mod metrics;

/// Run orchestration.
pub mod pipeline;

/// Report rendering and persistence.
pub mod report;

/// Return series and aggregation.
pub mod returns;

/// Lookback period selection.
pub mod selection;

/// Trade tables.
pub mod table;

/// Tracing setup.
pub mod telemetry;

pub use config::{Config, ConfigError, load_config, load_config_from_string};
pub use error::ReportError;
pub use metrics::{ReturnScorer, SharpeScorer};
pub use pipeline::{InputTables, Pipeline, RunSummary, Stage, run};
pub use report::{JsonReportRenderer, ReportRenderer};
pub use selection::{LookbackSelector, MarketSelection, SelectionRecord};
