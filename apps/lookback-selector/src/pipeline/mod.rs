//! Run orchestration.
//!
//! A run loads the in-sample and out-of-sample tables once and then executes
//! the enabled stages in order:
//!
//! 1. **specific**: select the best lookback per market, persist the
//!    selection, extract parameters and render the chosen series
//! 2. **general**: render every market and lookback period
//! 3. **combine**: select and aggregate across several systems
//!
//! Any error aborts the run; files written by earlier stages stay.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lookback_selector::config::load_config;
//! use lookback_selector::pipeline::{InputTables, run};
//! use lookback_selector::report::JsonReportRenderer;
//!
//! let config = load_config(None)?;
//! let tables = InputTables::load(&config.core)?;
//! let summary = run(&config, &tables, &JsonReportRenderer::default(), None)?;
//! ```

mod layout;
mod stages;

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use layout::{BEST_PERIODS_FILE, RunPaths, SELECTED_PARAMETERS_FILE};

use crate::combine::BestPeriodMap;
use crate::config::{Config, CoreConfig};
use crate::error::ReportError;
use crate::metrics::SharpeScorer;
use crate::report::ReportRenderer;
use crate::selection::SelectionRecord;
use crate::table::{TableError, TradeTable};

/// A stage of the run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Best lookback per market for the primary system.
    Specific,
    /// Every market and lookback period.
    General,
    /// Selection and aggregation across systems.
    Combine,
}

impl Stage {
    /// Stages in execution order.
    pub const ALL: [Self; 3] = [Self::Specific, Self::General, Self::Combine];

    /// Whether the configuration enables this stage.
    #[must_use]
    pub const fn enabled_in(self, config: &Config) -> bool {
        match self {
            Self::Specific => config.report.generate_specific,
            Self::General => config.report.generate_general,
            Self::Combine => config.report.combine_systems.enable,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Specific => "specific",
            Self::General => "general",
            Self::Combine => "combine",
        })
    }
}

/// The primary system's trade tables.
#[derive(Debug, Clone, Default)]
pub struct InputTables {
    /// In-sample trades.
    pub in_sample: TradeTable,
    /// Out-of-sample trades.
    pub out_of_sample: TradeTable,
}

impl InputTables {
    /// Read both tables from the run directory.
    pub fn load(core: &CoreConfig) -> Result<Self, TableError> {
        let in_sample = TradeTable::from_path(&core.is_path())?;
        let out_of_sample = TradeTable::from_path(&core.oos_path())?;

        info!(
            is_source = in_sample.source_name(),
            oos_source = out_of_sample.source_name(),
            is_rows = in_sample.len(),
            oos_rows = out_of_sample.len(),
            markets = in_sample.markets().len(),
            "Loaded trade tables"
        );

        Ok(Self {
            in_sample,
            out_of_sample,
        })
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Stages that ran, in order.
    pub stages: Vec<Stage>,
    /// Single-system selection, when the specific stage ran.
    pub selection: Option<SelectionRecord>,
    /// Multi-system selection, when the combine stage ran.
    pub combined: Option<BestPeriodMap>,
    /// Number of reports handed to the renderer.
    pub reports_rendered: usize,
}

/// Executes stages against loaded tables.
#[derive(Debug)]
pub struct Pipeline<'a, R: ReportRenderer> {
    config: &'a Config,
    renderer: &'a R,
    scorer: SharpeScorer,
    paths: RunPaths,
    reference_time: Option<NaiveDateTime>,
}

impl<'a, R: ReportRenderer> Pipeline<'a, R> {
    /// Create a pipeline for a validated configuration.
    #[must_use]
    pub fn new(config: &'a Config, renderer: &'a R) -> Self {
        Self {
            config,
            renderer,
            scorer: SharpeScorer::new(config.report.sharpe),
            paths: RunPaths::from_core(&config.core),
            reference_time: None,
        }
    }

    /// Measure stale-data cutoffs from `reference_time` instead of now.
    #[must_use]
    pub fn with_reference_time(mut self, reference_time: NaiveDateTime) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    /// Run one stage, or every enabled stage when `stage` is `None`.
    ///
    /// An explicitly requested stage runs even when the configuration
    /// disables it.
    pub fn run(
        &self,
        tables: &InputTables,
        stage: Option<Stage>,
    ) -> Result<RunSummary, ReportError> {
        let stages: Vec<Stage> = match stage {
            Some(stage) => vec![stage],
            None => Stage::ALL
                .into_iter()
                .filter(|stage| stage.enabled_in(self.config))
                .collect(),
        };

        self.paths.prepare()?;
        info!(
            output_dir = %self.paths.output_dir.display(),
            stages = ?stages,
            "Starting run"
        );

        let mut summary = RunSummary::default();
        for stage in stages {
            info!(%stage, "Running stage");
            match stage {
                Stage::Specific => {
                    let (record, rendered) = self.run_specific(tables)?;
                    summary.selection = Some(record);
                    summary.reports_rendered += rendered;
                }
                Stage::General => {
                    summary.reports_rendered += self.run_general(tables)?;
                }
                Stage::Combine => {
                    let (best, rendered) = self.run_combine()?;
                    summary.combined = Some(best);
                    summary.reports_rendered += rendered;
                }
            }
            summary.stages.push(stage);
        }

        info!(
            stages = summary.stages.len(),
            reports = summary.reports_rendered,
            "Run complete"
        );
        Ok(summary)
    }
}

/// Run one stage, or every enabled stage, with the current time as the
/// stale-data reference.
pub fn run<R: ReportRenderer>(
    config: &Config,
    tables: &InputTables,
    renderer: &R,
    stage: Option<Stage>,
) -> Result<RunSummary, ReportError> {
    Pipeline::new(config, renderer).run(tables, stage)
}
