//! Output directory layout and report names.

use std::path::{Path, PathBuf};

use crate::config::CoreConfig;
use crate::error::ReportError;
use crate::returns::SeriesCategory;

/// Selection record file name.
pub const BEST_PERIODS_FILE: &str = "best_periods.json";
/// Parameters extract file name.
pub const SELECTED_PARAMETERS_FILE: &str = "selected_parameters.csv";

/// Directories a run writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// Run directory; holds the single-system selection record.
    pub output_dir: PathBuf,
    /// Every market and period.
    pub general_dir: PathBuf,
    /// Best period per market.
    pub specific_dir: PathBuf,
    /// Multi-system combination.
    pub combined_dir: PathBuf,
}

impl RunPaths {
    /// Layout below `core.output_dir()`.
    #[must_use]
    pub fn from_core(core: &CoreConfig) -> Self {
        let output_dir = core.output_dir();
        Self {
            general_dir: output_dir.join("report"),
            specific_dir: output_dir.join("report_specific"),
            combined_dir: output_dir.join("report_combined_systems"),
            output_dir,
        }
    }

    /// Create every directory that does not exist yet.
    pub fn prepare(&self) -> Result<(), ReportError> {
        for dir in [
            &self.output_dir,
            &self.general_dir,
            &self.specific_dir,
            &self.combined_dir,
        ] {
            create_dir(dir)?;
        }
        Ok(())
    }

    /// Per-market directory of the general stage.
    #[must_use]
    pub fn general_market_dir(&self, market: &str) -> PathBuf {
        self.general_dir.join(market)
    }
}

pub(crate) fn create_dir(dir: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// `<market>_<period>_<category>_report`
pub(crate) fn general_report_name(market: &str, period: u32, category: SeriesCategory) -> String {
    format!("{market}_{period}_{}_report", category.slug())
}

/// `<market>_<period>_best_<category>_report`
pub(crate) fn specific_report_name(market: &str, period: u32, category: SeriesCategory) -> String {
    format!("{market}_{period}_best_{}_report", category.slug())
}

/// `_all_returns_<category>`
pub(crate) fn specific_total_name(category: SeriesCategory) -> String {
    format!("_all_returns_{}", category.slug())
}

pub(crate) const fn specific_total_title(category: SeriesCategory) -> &'static str {
    match category {
        SeriesCategory::InSample => "All IS Returns (Best Lookback)",
        SeriesCategory::InSampleUntilOutOfSample => {
            "All IS Returns until OOS begins (Best Lookback)"
        }
        SeriesCategory::InSampleThenOutOfSample => "All IS then OOS Returns (Best Lookback)",
        SeriesCategory::OutOfSample => "All OOS Returns (Best Lookback)",
    }
}

/// `<market>_best_<category>_report`
pub(crate) fn combined_report_name(market: &str, category: SeriesCategory) -> String {
    format!("{market}_best_{}_report", category.slug())
}

pub(crate) fn combined_report_title(market: &str, category: SeriesCategory) -> String {
    format!("Combined {} Report for {market}", category.label())
}

/// `all_returns_<category>`
pub(crate) fn combined_total_name(category: SeriesCategory) -> String {
    format!("all_returns_{}", category.slug())
}

pub(crate) fn combined_total_title(category: SeriesCategory) -> String {
    format!("Total Combined {} Report", category.label())
}
