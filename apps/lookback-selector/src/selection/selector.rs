//! Lookback period selection.

use chrono::{Duration, NaiveDateTime, Utc};
use tracing::{debug, info};

use super::overrides::{MarketOverrides, OverrideDecision};
use super::types::{MarketSelection, PeriodEvaluation, SelectionRecord};
use crate::config::SelectionConfig;
use crate::metrics::ReturnScorer;
use crate::returns::MarketReturns;
use crate::table::TradeTable;

/// Scans the candidate lookback periods of each market and keeps the best
/// one that passes the gate.
///
/// Selection is pure: nothing is written and the tables are only read.
#[derive(Debug)]
pub struct LookbackSelector<'a, S: ReturnScorer> {
    scorer: &'a S,
    selection: SelectionConfig,
    reference_time: NaiveDateTime,
}

impl<'a, S: ReturnScorer> LookbackSelector<'a, S> {
    /// Create a selector. The stale-data cutoff, when configured, is
    /// measured from the current time.
    #[must_use]
    pub fn new(scorer: &'a S, selection: SelectionConfig) -> Self {
        Self {
            scorer,
            selection,
            reference_time: Utc::now().naive_utc(),
        }
    }

    /// Measure the stale-data cutoff from `reference_time` instead of now.
    #[must_use]
    pub const fn with_reference_time(mut self, reference_time: NaiveDateTime) -> Self {
        self.reference_time = reference_time;
        self
    }

    /// Score one `(market, period)` slice.
    ///
    /// Returns `None` when the period is not a candidate at all: no
    /// in-sample rows, no out-of-sample rows, or out-of-sample data older
    /// than `max_oos_age_days`.
    pub fn evaluate_period(
        &self,
        in_sample: &TradeTable,
        out_of_sample: &TradeTable,
        market: &str,
        lookback_period: u32,
    ) -> Option<PeriodEvaluation> {
        if in_sample.slice(market, lookback_period).next().is_none() {
            return None;
        }

        let returns = MarketReturns::from_tables(in_sample, out_of_sample, market, lookback_period);
        let last_oos = returns.out_of_sample.last_timestamp()?;

        // A cutoff before the representable range leaves nothing stale
        let cutoff = self.selection.max_oos_age_days.and_then(|max_age| {
            self.reference_time
                .checked_sub_signed(Duration::days(i64::from(max_age)))
        });
        if let Some(cutoff) = cutoff.filter(|cutoff| last_oos < *cutoff) {
            debug!(
                market,
                period = lookback_period,
                last_oos = %last_oos,
                cutoff = %cutoff,
                "Skipping period with stale out-of-sample data"
            );
            return None;
        }

        let oos_sharpe = self.scorer.score(&returns.out_of_sample);
        let combined_sharpe = self.scorer.score(&returns.in_sample_then_out_of_sample);

        let weighted_score = match (oos_sharpe, combined_sharpe) {
            (Some(oos), Some(combined))
                if self.selection.passes_gate(oos_sharpe, combined_sharpe) =>
            {
                Some(self.selection.weighted_score(oos, combined))
            }
            _ => None,
        };

        debug!(
            market,
            period = lookback_period,
            oos_sharpe = ?oos_sharpe,
            combined_sharpe = ?combined_sharpe,
            weighted = ?weighted_score,
            "Evaluated lookback period"
        );

        Some(PeriodEvaluation {
            lookback_period,
            oos_sharpe,
            combined_sharpe,
            weighted_score,
        })
    }

    /// Evaluate every lookback period of the in-sample table for `market`,
    /// in first-seen order.
    pub fn evaluate_market(
        &self,
        in_sample: &TradeTable,
        out_of_sample: &TradeTable,
        market: &str,
    ) -> Vec<PeriodEvaluation> {
        in_sample
            .lookback_periods()
            .into_iter()
            .filter_map(|period| self.evaluate_period(in_sample, out_of_sample, market, period))
            .collect()
    }

    /// Choose the lookback period for one market.
    ///
    /// Exclusion wins over overrides; an override skips scoring entirely.
    /// Among periods that pass the gate the highest weighted score wins,
    /// and the first-seen period wins a tie.
    pub fn select_market(
        &self,
        in_sample: &TradeTable,
        out_of_sample: &TradeTable,
        market: &str,
        overrides: &MarketOverrides<'_>,
    ) -> Option<MarketSelection> {
        match overrides.decision(market) {
            OverrideDecision::Excluded => {
                debug!(market, "Market excluded");
                None
            }
            OverrideDecision::Fixed(period) => {
                debug!(market, period, "Using manual lookback period");
                Some(MarketSelection::manual(period))
            }
            OverrideDecision::Evaluate => {
                let mut best: Option<(u32, f64)> = None;
                for evaluation in self.evaluate_market(in_sample, out_of_sample, market) {
                    let Some(score) = evaluation.weighted_score else {
                        continue;
                    };
                    if best.is_none_or(|(_, best_score)| score > best_score) {
                        best = Some((evaluation.lookback_period, score));
                    }
                }

                best.map(|(period, score)| MarketSelection::scored(period, score))
            }
        }
    }

    /// Choose lookback periods for every market of the in-sample table.
    pub fn select_all(
        &self,
        in_sample: &TradeTable,
        out_of_sample: &TradeTable,
        overrides: &MarketOverrides<'_>,
    ) -> SelectionRecord {
        let mut record = SelectionRecord::new();

        for market in in_sample.markets() {
            let selection = self.select_market(in_sample, out_of_sample, market, overrides);
            if let Some(selection) = selection {
                info!(
                    market,
                    period = selection.lookback_period,
                    sharpe = ?selection.sharpe,
                    "Selected lookback period"
                );
                record.insert(market, selection);
            }
        }

        record
    }
}
