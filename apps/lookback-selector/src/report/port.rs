//! Report Renderer Port (Driven Port)
//!
//! Interface for turning a return series into a report.

use std::path::PathBuf;

use crate::returns::ReturnSeries;

/// Report rendering error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Writing the report failed.
    #[error("Failed to write report '{path}': {source}")]
    Io {
        /// Output path.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Serializing the report failed.
    #[error("Report serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

/// Where a report goes and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportJob {
    /// Report title, if any.
    pub title: Option<String>,
    /// Output location without extension; renderers add their own.
    pub output: PathBuf,
}

impl ReportJob {
    /// An untitled report.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            title: None,
            output: output.into(),
        }
    }

    /// Attach a title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Port for rendering return series.
#[cfg_attr(test, mockall::automock)]
pub trait ReportRenderer {
    /// Render one series.
    fn render(&self, series: &ReturnSeries, job: &ReportJob) -> Result<(), RenderError>;
}
