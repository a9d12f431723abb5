//! Run-level error type.
//!
//! Every layer has its own error enum; [`ReportError`] wraps them so a run
//! can propagate any failure to the binary with `?`.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::report::RenderError;
use crate::table::TableError;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A trade or parameters table could not be read or written.
    #[error(transparent)]
    Table(#[from] TableError),

    /// A report or selection record could not be written.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// An output directory could not be created.
    #[error("Failed to create directory '{path}': {source}")]
    Io {
        /// Directory path.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
}
