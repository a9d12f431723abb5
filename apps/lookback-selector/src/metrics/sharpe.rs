//! Sharpe ratio scoring.
//!
//! The score is `mean(r - rf / periods) / std(r)`, optionally multiplied by
//! `sqrt(periods)`. The smart variant inflates the divisor by an
//! autocorrelation penalty:
//!
//! ```text
//! penalty = sqrt(1 + 2 * sum_{x=1}^{n-1} ((n - x) / n) * |rho_1|^x)
//! ```
//!
//! Series that cannot be scored (fewer than two points, zero variance,
//! non-finite intermediates) yield `None` rather than NaN or infinity.

use super::math::{lag1_autocorrelation, mean, std_dev};
use crate::config::SharpeConfig;
use crate::returns::ReturnSeries;

/// Divisors at or below this are treated as zero variance.
const MIN_DIVISOR: f64 = 1e-12;

/// Scores a return series. `None` means the series has no usable score.
#[cfg_attr(test, mockall::automock)]
pub trait ReturnScorer {
    /// Score a series.
    fn score(&self, series: &ReturnSeries) -> Option<f64>;
}

/// Annualised (optionally autocorrelation-penalised) Sharpe ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharpeScorer {
    config: SharpeConfig,
}

impl SharpeScorer {
    /// Create a scorer with the given parameters.
    #[must_use]
    pub const fn new(config: SharpeConfig) -> Self {
        Self { config }
    }

    /// The scorer parameters.
    #[must_use]
    pub const fn config(&self) -> &SharpeConfig {
        &self.config
    }

    /// Sharpe ratio of raw values.
    #[must_use]
    pub fn sharpe(&self, values: &[f64]) -> Option<f64> {
        let periods = f64::from(self.config.periods_per_year);
        let per_period_rf = self.config.risk_free_rate / periods;
        let excess: Vec<f64> = values.iter().map(|r| r - per_period_rf).collect();

        let mut divisor = std_dev(&excess)?;
        if self.config.smart {
            divisor *= autocorr_penalty(&excess);
        }
        if divisor <= MIN_DIVISOR || !divisor.is_finite() {
            return None;
        }

        let mut ratio = mean(&excess)? / divisor;
        if self.config.annualize {
            ratio *= periods.sqrt();
        }

        ratio.is_finite().then_some(ratio)
    }
}

impl ReturnScorer for SharpeScorer {
    fn score(&self, series: &ReturnSeries) -> Option<f64> {
        self.sharpe(&series.values())
    }
}

/// Divisor penalty for serially correlated returns. 1 when the lag-1
/// autocorrelation is undefined.
#[must_use]
pub fn autocorr_penalty(values: &[f64]) -> f64 {
    let Some(rho) = lag1_autocorrelation(values) else {
        return 1.0;
    };

    let n = values.len() as f64;
    let coefficient = rho.abs();
    let weighted_sum: f64 = (1..values.len())
        .map(|x| ((n - x as f64) / n) * coefficient.powi(x as i32))
        .sum();

    2.0f64.mul_add(weighted_sum, 1.0).sqrt()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;

    fn plain() -> SharpeScorer {
        SharpeScorer::new(SharpeConfig {
            annualize: false,
            ..SharpeConfig::default()
        })
    }

    #[test]
    fn test_plain_sharpe() {
        // mean 0.02, sample std 0.01
        let Some(score) = plain().sharpe(&[0.01, 0.02, 0.03]) else {
            panic!("series has variance");
        };
        assert!((score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_annualised_sharpe() {
        let scorer = SharpeScorer::default();
        let Some(score) = scorer.sharpe(&[0.01, 0.02, 0.03]) else {
            panic!("series has variance");
        };
        assert!((score - 2.0 * 252f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_risk_free_rate_lowers_score() {
        let with_rf = SharpeScorer::new(SharpeConfig {
            risk_free_rate: 0.0252,
            periods_per_year: 252,
            annualize: false,
            smart: false,
        });
        // per-period rf 0.0001 shifts the mean to 0.0199
        let Some(score) = with_rf.sharpe(&[0.01, 0.02, 0.03]) else {
            panic!("series has variance");
        };
        assert!((score - 1.99).abs() < 1e-9);
    }

    #[test_case(&[] ; "empty")]
    #[test_case(&[0.05] ; "single observation")]
    #[test_case(&[0.25, 0.25, 0.25] ; "zero variance")]
    #[test_case(&[0.0, 0.0] ; "all zero")]
    #[test_case(&[0.01, 0.01, 0.01] ; "rounding noise only")]
    fn test_degenerate_series_have_no_score(values: &[f64]) {
        assert_eq!(SharpeScorer::default().sharpe(values), None);
    }

    #[test]
    fn test_smart_sharpe_penalises_autocorrelation() {
        let values = [0.01, 0.012, 0.015, 0.02, 0.018, 0.022, 0.025, 0.03];
        let base = plain().sharpe(&values);
        let smart = SharpeScorer::new(SharpeConfig {
            annualize: false,
            smart: true,
            ..SharpeConfig::default()
        })
        .sharpe(&values);

        let (Some(base), Some(smart)) = (base, smart) else {
            panic!("both variants should score");
        };
        assert!(smart < base);
        assert!(smart > 0.0);
    }

    #[test]
    fn test_autocorr_penalty_undefined_is_one() {
        assert_eq!(autocorr_penalty(&[0.1, 0.2]), 1.0);
    }

    #[test]
    fn test_autocorr_penalty_perfect_alternation() {
        // |rho| = 1, n = 4: sqrt(1 + 2 * (3/4 + 2/4 + 1/4)) = 2
        let penalty = autocorr_penalty(&[1.0, -1.0, 1.0, -1.0]);
        assert!((penalty - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_scorer_trait_uses_series_values() {
        use crate::returns::{ReturnPoint, ReturnSeries};
        use chrono::NaiveDate;

        let series = ReturnSeries::from_points((1..=3).map(|d| {
            let timestamp = NaiveDate::from_ymd_opt(2024, 1, d)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .unwrap();
            ReturnPoint::new(timestamp, f64::from(d) / 100.0)
        }));

        let score = plain().score(&series).unwrap();
        assert!((score - 2.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_score_is_finite_or_none(
            values in prop::collection::vec(-1.0f64..1.0, 0..50)
        ) {
            if let Some(score) = SharpeScorer::default().sharpe(&values) {
                prop_assert!(score.is_finite());
            }
        }
    }
}
