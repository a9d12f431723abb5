//! Input and output locations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the backtest tables live and where run output goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Root directory of the strategy run.
    pub base_dir: PathBuf,
    /// Name of the run directory below `base_dir`.
    pub output_name: String,
    /// File name of the in-sample trade table.
    #[serde(default = "default_is_file_name")]
    pub is_file_name: String,
    /// File name of the out-of-sample trade table.
    #[serde(default = "default_oos_file_name")]
    pub oos_file_name: String,
    /// Optional parameters table filtered down to the selection.
    #[serde(default)]
    pub parameters_file_name: Option<String>,
}

impl CoreConfig {
    /// Run directory (`base_dir/output_name`).
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output_name)
    }

    /// In-sample table path.
    #[must_use]
    pub fn is_path(&self) -> PathBuf {
        self.output_dir().join(&self.is_file_name)
    }

    /// Out-of-sample table path.
    #[must_use]
    pub fn oos_path(&self) -> PathBuf {
        self.output_dir().join(&self.oos_file_name)
    }

    /// Parameters table path, when configured.
    #[must_use]
    pub fn parameters_path(&self) -> Option<PathBuf> {
        self.parameters_file_name
            .as_ref()
            .map(|name| self.output_dir().join(name))
    }
}

fn default_is_file_name() -> String {
    "is_data.csv".to_string()
}

fn default_oos_file_name() -> String {
    "oos_data.csv".to_string()
}
