//! A trading system taking part in the combination.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{CoreConfig, SystemConfig};
use crate::selection::MarketOverrides;
use crate::table::{TableError, TradeTable};

/// One system's risk-scaled tables and overrides.
#[derive(Debug, Clone)]
pub struct TradingSystem {
    key: PathBuf,
    config: SystemConfig,
    in_sample: TradeTable,
    out_of_sample: TradeTable,
}

impl TradingSystem {
    /// Wrap already loaded tables, scaling every `ProfitPercent` by the
    /// system's risk.
    #[must_use]
    pub fn from_tables(
        key: impl Into<PathBuf>,
        config: SystemConfig,
        in_sample: &TradeTable,
        out_of_sample: &TradeTable,
    ) -> Self {
        Self {
            key: key.into(),
            in_sample: in_sample.scaled(config.risk),
            out_of_sample: out_of_sample.scaled(config.risk),
            config,
        }
    }

    /// Load the system's tables from its directory.
    ///
    /// Returns `Ok(None)` when either table file is missing; the caller
    /// skips the system.
    pub fn load(
        dir: &Path,
        config: &SystemConfig,
        core: &CoreConfig,
    ) -> Result<Option<Self>, TableError> {
        let is_path = dir.join(&core.is_file_name);
        let oos_path = dir.join(&core.oos_file_name);

        if !is_path.is_file() || !oos_path.is_file() {
            warn!(
                system = %dir.display(),
                is_file = %core.is_file_name,
                oos_file = %core.oos_file_name,
                "Missing trade tables, skipping system"
            );
            return Ok(None);
        }

        let in_sample = TradeTable::from_path(&is_path)?;
        let out_of_sample = TradeTable::from_path(&oos_path)?;

        info!(
            system = %dir.display(),
            risk = config.risk,
            is_rows = in_sample.len(),
            oos_rows = out_of_sample.len(),
            "Loaded system"
        );

        Ok(Some(Self::from_tables(
            dir,
            config.clone(),
            &in_sample,
            &out_of_sample,
        )))
    }

    /// Directory the system was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.key
    }

    /// Key used in the best-period map.
    #[must_use]
    pub fn key(&self) -> String {
        self.key.display().to_string()
    }

    /// Risk multiplier applied to the tables.
    #[must_use]
    pub const fn risk(&self) -> f64 {
        self.config.risk
    }

    /// Overrides and exclusions of this system.
    #[must_use]
    pub fn overrides(&self) -> MarketOverrides<'_> {
        MarketOverrides::from(&self.config)
    }

    /// Risk-scaled in-sample table.
    #[must_use]
    pub const fn in_sample(&self) -> &TradeTable {
        &self.in_sample
    }

    /// Risk-scaled out-of-sample table.
    #[must_use]
    pub const fn out_of_sample(&self) -> &TradeTable {
        &self.out_of_sample
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;

    const IS_CSV: &str = "\
Market,IS_QuarterCount,LimitCreated,ProfitPercent
EURUSD,4,2024-01-01,1.0
";
    const OOS_CSV: &str = "\
Market,IS_QuarterCount,LimitCreated,ProfitPercent
EURUSD,4,2024-02-01,-2.0
";

    fn core() -> CoreConfig {
        CoreConfig {
            base_dir: PathBuf::from("/tmp"),
            output_name: "run".to_string(),
            is_file_name: "is_data.csv".to_string(),
            oos_file_name: "oos_data.csv".to_string(),
            parameters_file_name: None,
        }
    }

    fn system_config(risk: f64) -> SystemConfig {
        SystemConfig {
            risk,
            add: BTreeMap::new(),
            remove: BTreeSet::new(),
        }
    }

    #[test]
    fn test_load_scales_by_risk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("is_data.csv"), IS_CSV).unwrap();
        std::fs::write(dir.path().join("oos_data.csv"), OOS_CSV).unwrap();

        let system = TradingSystem::load(dir.path(), &system_config(0.5), &core())
            .unwrap()
            .unwrap();

        assert_eq!(system.in_sample().records()[0].profit_percent, Some(0.5));
        assert_eq!(system.out_of_sample().records()[0].profit_percent, Some(-1.0));
        assert_eq!(system.key(), dir.path().display().to_string());
        assert_eq!(system.risk(), 0.5);
    }

    #[test]
    fn test_missing_table_skips_system() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("is_data.csv"), IS_CSV).unwrap();

        let loaded = TradingSystem::load(dir.path(), &system_config(1.0), &core()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_malformed_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("is_data.csv"),
            "Market,LimitCreated\nEURUSD,2024-01-01\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("oos_data.csv"), OOS_CSV).unwrap();

        let result = TradingSystem::load(dir.path(), &system_config(1.0), &core());
        assert!(matches!(result, Err(TableError::MissingColumn { .. })));
    }
}
