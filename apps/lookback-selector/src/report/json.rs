//! JSON tearsheet renderer.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::persist::write_json_pretty;
use super::port::{RenderError, ReportJob, ReportRenderer};
use crate::metrics::{SeriesSummary, SharpeScorer};
use crate::returns::{ReturnPoint, ReturnSeries};

/// File extension added to every report location.
pub const REPORT_EXTENSION: &str = "json";

#[derive(Debug, Serialize)]
struct Tearsheet<'a> {
    title: Option<&'a str>,
    summary: SeriesSummary,
    returns: &'a [ReturnPoint],
}

/// Writes one JSON tearsheet per series: title, summary statistics and
/// every return point.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportRenderer {
    scorer: SharpeScorer,
}

impl JsonReportRenderer {
    /// Create a renderer that reports Sharpe with `scorer`'s parameters.
    #[must_use]
    pub const fn new(scorer: SharpeScorer) -> Self {
        Self { scorer }
    }

    /// The file a job is written to.
    #[must_use]
    pub fn output_path(output: &Path) -> PathBuf {
        let mut path = OsString::from(output.as_os_str());
        path.push(".");
        path.push(REPORT_EXTENSION);
        PathBuf::from(path)
    }
}

impl ReportRenderer for JsonReportRenderer {
    fn render(&self, series: &ReturnSeries, job: &ReportJob) -> Result<(), RenderError> {
        let path = Self::output_path(&job.output);
        let tearsheet = Tearsheet {
            title: job.title.as_deref(),
            summary: SeriesSummary::from_series(series, &self.scorer),
            returns: series.points(),
        };

        write_json_pretty(&path, &tearsheet)?;
        debug!(path = %path.display(), points = series.len(), "Rendered report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_output_path_keeps_dotted_names() {
        let path = JsonReportRenderer::output_path(Path::new("/out/ES.F_4_best_is_report"));
        assert_eq!(path, PathBuf::from("/out/ES.F_4_best_is_report.json"));
    }

    #[test]
    fn test_render_writes_tearsheet() {
        let dir = tempfile::tempdir().unwrap();
        let series = ReturnSeries::from_points((1..=3).map(|d| {
            let timestamp = NaiveDate::from_ymd_opt(2024, 4, d)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .unwrap();
            ReturnPoint::new(timestamp, f64::from(d) / 100.0)
        }));
        let job = ReportJob::new(dir.path().join("_all_returns_oos"))
            .with_title("All OOS Returns (Best Lookback)");

        JsonReportRenderer::default().render(&series, &job).unwrap();

        let written = std::fs::read_to_string(dir.path().join("_all_returns_oos.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["title"], "All OOS Returns (Best Lookback)");
        assert_eq!(value["summary"]["observations"], 3);
        assert_eq!(value["returns"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["returns"][0]["timestamp"], "2024-04-01T00:00:00");
    }

    #[test]
    fn test_untitled_report_has_null_title() {
        let dir = tempfile::tempdir().unwrap();
        let job = ReportJob::new(dir.path().join("empty"));

        JsonReportRenderer::default()
            .render(&ReturnSeries::default(), &job)
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("empty.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert!(value["title"].is_null());
        assert!(value["summary"]["sharpe"].is_null());
    }
}
