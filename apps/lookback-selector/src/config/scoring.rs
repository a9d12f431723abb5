//! Scoring and selection gate configuration.

use serde::{Deserialize, Serialize};

/// Sharpe ratio parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharpeConfig {
    /// Annual risk-free rate, spread evenly over `periods_per_year`.
    #[serde(default)]
    pub risk_free_rate: f64,
    /// Number of return observations per year used for annualization.
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
    /// Multiply the ratio by `sqrt(periods_per_year)`.
    #[serde(default = "default_true")]
    pub annualize: bool,
    /// Penalize the divisor for lag-1 autocorrelation.
    #[serde(default)]
    pub smart: bool,
}

impl Default for SharpeConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            periods_per_year: default_periods_per_year(),
            annualize: true,
            smart: false,
        }
    }
}

/// Gate and weighting used to pick a lookback period.
///
/// A period is a candidate only when its out-of-sample score exceeds
/// `oos_threshold` and its IS-then-OOS score exceeds `combined_threshold`.
/// Candidates are ranked by `oos_weight * oos + combined_weight * combined`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Minimum (exclusive) out-of-sample Sharpe.
    pub oos_threshold: f64,
    /// Minimum (exclusive) IS-then-OOS Sharpe.
    pub combined_threshold: f64,
    /// Weight of the out-of-sample Sharpe in the ranking score.
    #[serde(default = "default_oos_weight")]
    pub oos_weight: f64,
    /// Weight of the IS-then-OOS Sharpe in the ranking score.
    #[serde(default = "default_combined_weight")]
    pub combined_weight: f64,
    /// Ignore periods whose last out-of-sample trade is older than this many days.
    #[serde(default)]
    pub max_oos_age_days: Option<u32>,
}

impl SelectionConfig {
    /// Defaults for the single-system selection run.
    #[must_use]
    pub const fn single_system() -> Self {
        Self {
            oos_threshold: 2.5,
            combined_threshold: 2.0,
            oos_weight: 0.6,
            combined_weight: 0.4,
            max_oos_age_days: None,
        }
    }

    /// Defaults for the multi-system combination run.
    #[must_use]
    pub const fn multi_system() -> Self {
        Self {
            oos_threshold: 2.0,
            combined_threshold: 2.0,
            oos_weight: 0.6,
            combined_weight: 0.4,
            max_oos_age_days: None,
        }
    }

    /// Check both scores against the gate. Missing scores never pass.
    #[must_use]
    pub fn passes_gate(&self, oos: Option<f64>, combined: Option<f64>) -> bool {
        matches!(
            (oos, combined),
            (Some(oos), Some(combined))
                if oos > self.oos_threshold && combined > self.combined_threshold
        )
    }

    /// Weighted ranking score.
    #[must_use]
    pub fn weighted_score(&self, oos: f64, combined: f64) -> f64 {
        self.oos_weight.mul_add(oos, self.combined_weight * combined)
    }
}

pub(crate) const fn default_single_system_selection() -> SelectionConfig {
    SelectionConfig::single_system()
}

pub(crate) const fn default_multi_system_selection() -> SelectionConfig {
    SelectionConfig::multi_system()
}

const fn default_periods_per_year() -> u32 {
    252
}

const fn default_oos_weight() -> f64 {
    0.6
}

const fn default_combined_weight() -> f64 {
    0.4
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_per_mode_defaults_differ() {
        let single = SelectionConfig::single_system();
        let multi = SelectionConfig::multi_system();

        assert_eq!(single.oos_threshold, 2.5);
        assert_eq!(multi.oos_threshold, 2.0);
        assert_eq!(single.combined_threshold, multi.combined_threshold);
    }

    #[test_case(Some(3.0), Some(2.2), true ; "both above")]
    #[test_case(Some(2.5), Some(2.2), false ; "oos on threshold")]
    #[test_case(Some(3.0), Some(2.0), false ; "combined on threshold")]
    #[test_case(None, Some(2.2), false ; "missing oos")]
    #[test_case(Some(3.0), None, false ; "missing combined")]
    fn test_passes_gate(oos: Option<f64>, combined: Option<f64>, expected: bool) {
        let config = SelectionConfig::single_system();
        assert_eq!(config.passes_gate(oos, combined), expected);
    }

    #[test]
    fn test_weighted_score() {
        let config = SelectionConfig::single_system();
        let score = config.weighted_score(3.0, 2.2);
        assert!((score - 2.68).abs() < 1e-12);
    }

    #[test]
    fn test_sharpe_defaults() {
        let config = SharpeConfig::default();
        assert_eq!(config.periods_per_year, 252);
        assert!(config.annualize);
        assert!(!config.smart);
        assert_eq!(config.risk_free_rate, 0.0);
    }
}
