//! Report stage configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use super::overrides::PeriodOverride;
use super::scoring::{
    SelectionConfig, SharpeConfig, default_multi_system_selection,
    default_single_system_selection,
};

/// Which report stages run and how they select.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Render every market and lookback period.
    #[serde(default)]
    pub generate_general: bool,
    /// Select the best lookback per market and render it.
    #[serde(default = "default_true")]
    pub generate_specific: bool,
    /// Sharpe parameters shared by every stage.
    #[serde(default)]
    pub sharpe: SharpeConfig,
    /// Single-system selection settings.
    #[serde(default)]
    pub specific: SpecificConfig,
    /// Multi-system combination settings.
    #[serde(default)]
    pub combine_systems: CombineSystemsConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            generate_general: false,
            generate_specific: true,
            sharpe: SharpeConfig::default(),
            specific: SpecificConfig::default(),
            combine_systems: CombineSystemsConfig::default(),
        }
    }
}

/// Overrides and gate for the single-system run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecificConfig {
    /// Manual lookback periods keyed by market.
    #[serde(default, deserialize_with = "null_as_default")]
    pub add: BTreeMap<String, PeriodOverride>,
    /// Markets left out of the selection.
    #[serde(default, deserialize_with = "null_as_default")]
    pub remove: BTreeSet<String>,
    /// Gate and weights.
    #[serde(default = "default_single_system_selection")]
    pub selection: SelectionConfig,
}

impl Default for SpecificConfig {
    fn default() -> Self {
        Self {
            add: BTreeMap::new(),
            remove: BTreeSet::new(),
            selection: SelectionConfig::single_system(),
        }
    }
}

/// Settings for merging several independently run systems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineSystemsConfig {
    /// Run the combination stage.
    #[serde(default)]
    pub enable: bool,
    /// Systems keyed by their directory.
    #[serde(default)]
    pub systems: BTreeMap<PathBuf, SystemConfig>,
    /// Gate and weights applied per system.
    #[serde(default = "default_multi_system_selection")]
    pub selection: SelectionConfig,
}

impl Default for CombineSystemsConfig {
    fn default() -> Self {
        Self {
            enable: false,
            systems: BTreeMap::new(),
            selection: SelectionConfig::multi_system(),
        }
    }
}

/// One system taking part in the combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Multiplier applied to every `ProfitPercent` of the system.
    pub risk: f64,
    /// Manual lookback periods keyed by market.
    #[serde(default, deserialize_with = "null_as_default")]
    pub add: BTreeMap<String, PeriodOverride>,
    /// Markets left out for this system.
    #[serde(default, deserialize_with = "null_as_default")]
    pub remove: BTreeSet<String>,
}

const fn default_true() -> bool {
    true
}

/// Treat an explicit YAML `null` (e.g. `remove:` with no entries) as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
