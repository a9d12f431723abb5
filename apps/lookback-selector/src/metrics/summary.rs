//! Tearsheet statistics for a rendered series.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::math::{compounded_return, max_drawdown, mean, std_dev};
use super::sharpe::SharpeScorer;
use crate::returns::ReturnSeries;

/// Summary statistics shown at the top of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Number of return observations.
    pub observations: usize,
    /// First timestamp in the series.
    pub first_timestamp: Option<NaiveDateTime>,
    /// Last timestamp in the series.
    pub last_timestamp: Option<NaiveDateTime>,
    /// Compounded total return.
    pub total_return: f64,
    /// Mean return per observation.
    pub mean_return: Option<f64>,
    /// Sample deviation scaled by `sqrt(periods_per_year)`.
    pub annualized_volatility: Option<f64>,
    /// Sharpe ratio with the run's parameters.
    pub sharpe: Option<f64>,
    /// Deepest drawdown of the compounded curve (non-positive).
    pub max_drawdown: f64,
    /// Share of observations with a positive return.
    pub win_rate: Option<f64>,
}

impl SeriesSummary {
    /// Compute the summary of a series.
    #[must_use]
    pub fn from_series(series: &ReturnSeries, scorer: &SharpeScorer) -> Self {
        let values = series.values();
        let periods = f64::from(scorer.config().periods_per_year);

        let win_rate = (!values.is_empty()).then(|| {
            let wins = values.iter().filter(|r| **r > 0.0).count();
            wins as f64 / values.len() as f64
        });

        Self {
            observations: values.len(),
            first_timestamp: series.first_timestamp(),
            last_timestamp: series.last_timestamp(),
            total_return: compounded_return(&values),
            mean_return: mean(&values),
            annualized_volatility: std_dev(&values).map(|std| std * periods.sqrt()),
            sharpe: scorer.sharpe(&values),
            max_drawdown: max_drawdown(&values),
            win_rate,
        }
    }
}
