//! Backtest trade tables.
//!
//! The selector reads two CSV tables per system, one with in-sample trades
//! and one with out-of-sample trades. Each row is a single trade tagged by
//! market and lookback period (`IS_QuarterCount`). Only the four columns the
//! selector needs are kept; any extra columns are ignored.
//!
//! # Required columns
//!
//! | Column | Type | Notes |
//! |--------|------|-------|
//! | `Market` | string | Market identifier |
//! | `IS_QuarterCount` | integer | Lookback period in quarters |
//! | `LimitCreated` | timestamp | Trade timestamp |
//! | `ProfitPercent` | float | Percent return, may be empty |

mod parameters;
mod timestamp;
mod trades;

use std::path::PathBuf;

use thiserror::Error;

pub use parameters::extract_selected_parameters;
pub use timestamp::parse_timestamp;
pub use trades::{TradeRecord, TradeTable};

/// Column holding the market identifier.
pub const MARKET_COLUMN: &str = "Market";
/// Column holding the lookback period.
pub const LOOKBACK_COLUMN: &str = "IS_QuarterCount";
/// Column holding the trade timestamp.
pub const TIMESTAMP_COLUMN: &str = "LimitCreated";
/// Column holding the percent return.
pub const PROFIT_COLUMN: &str = "ProfitPercent";

/// Errors from reading or writing trade tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file could not be opened.
    #[error("Failed to open table '{path}': {source}")]
    Open {
        /// Path to the table.
        path: PathBuf,
        /// The underlying CSV error.
        source: csv::Error,
    },

    /// A row could not be decoded.
    #[error("Failed to parse table '{source_name}': {source}")]
    Parse {
        /// Name of the table being read.
        source_name: String,
        /// The underlying CSV error.
        source: csv::Error,
    },

    /// A required column is absent from the header.
    #[error("Table '{source_name}' is missing required column '{column}'")]
    MissingColumn {
        /// Name of the table being read.
        source_name: String,
        /// The absent column.
        column: &'static str,
    },

    /// A `LimitCreated` value is not a recognised timestamp.
    #[error("Table '{source_name}' row {row}: invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// Name of the table being read.
        source_name: String,
        /// One-based data row number.
        row: usize,
        /// The raw value.
        value: String,
    },

    /// An `IS_QuarterCount` value is not a non-negative integer.
    #[error("Table '{source_name}' row {row}: invalid lookback period '{value}'")]
    InvalidLookback {
        /// Name of the table being read.
        source_name: String,
        /// One-based data row number.
        row: usize,
        /// The raw value.
        value: String,
    },

    /// Writing an extract failed.
    #[error("Failed to write table '{path}': {source}")]
    Write {
        /// Output path.
        path: PathBuf,
        /// The underlying CSV error.
        source: csv::Error,
    },
}
