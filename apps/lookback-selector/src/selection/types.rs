//! Selection results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The lookback period chosen for one market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSelection {
    /// Selected lookback period in quarters.
    pub lookback_period: u32,
    /// Winning weighted score rounded to 3 decimals; `None` for manual overrides.
    pub sharpe: Option<f64>,
}

impl MarketSelection {
    /// A period chosen by scoring.
    #[must_use]
    pub fn scored(lookback_period: u32, weighted_score: f64) -> Self {
        Self {
            lookback_period,
            sharpe: Some(round_score(weighted_score)),
        }
    }

    /// A period fixed by a manual override.
    #[must_use]
    pub const fn manual(lookback_period: u32) -> Self {
        Self {
            lookback_period,
            sharpe: None,
        }
    }
}

/// Selection for every market of a run, persisted as `best_periods.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionRecord {
    markets: BTreeMap<String, MarketSelection>,
}

impl SelectionRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the selection for a market.
    pub fn insert(&mut self, market: impl Into<String>, selection: MarketSelection) {
        self.markets.insert(market.into(), selection);
    }

    /// Selection for a market.
    #[must_use]
    pub fn get(&self, market: &str) -> Option<&MarketSelection> {
        self.markets.get(market)
    }

    /// Markets and selections in market order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MarketSelection)> {
        self.markets
            .iter()
            .map(|(market, selection)| (market.as_str(), selection))
    }

    /// Market to lookback period.
    #[must_use]
    pub fn periods(&self) -> BTreeMap<String, u32> {
        self.markets
            .iter()
            .map(|(market, selection)| (market.clone(), selection.lookback_period))
            .collect()
    }

    /// Number of selected markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether no market was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

/// Scores of one candidate lookback period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodEvaluation {
    /// Candidate lookback period.
    pub lookback_period: u32,
    /// Score of the out-of-sample series.
    pub oos_sharpe: Option<f64>,
    /// Score of the IS-then-OOS series.
    pub combined_sharpe: Option<f64>,
    /// Weighted score, present only when the period passed the gate.
    pub weighted_score: Option<f64>,
}

impl PeriodEvaluation {
    /// Whether the period passed the gate.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.weighted_score.is_some()
    }
}

fn round_score(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
