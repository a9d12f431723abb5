//! Selection and aggregation across systems.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::system::TradingSystem;
use crate::config::SelectionConfig;
use crate::metrics::ReturnScorer;
use crate::returns::{CategoryAggregates, CategorySeries, MarketReturns, SeriesCategory};
use crate::selection::LookbackSelector;

/// Chosen lookback period per market and system,
/// persisted as `best_periods.json` of the combination stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestPeriodMap {
    markets: BTreeMap<String, BTreeMap<String, u32>>,
}

impl BestPeriodMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the period a system uses for a market.
    pub fn insert(&mut self, market: &str, system_key: String, lookback_period: u32) {
        self.markets
            .entry(market.to_string())
            .or_default()
            .insert(system_key, lookback_period);
    }

    /// Periods of every system for a market.
    #[must_use]
    pub fn get(&self, market: &str) -> Option<&BTreeMap<String, u32>> {
        self.markets.get(market)
    }

    /// Markets in order, with their per-system periods.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, u32>)> {
        self.markets
            .iter()
            .map(|(market, systems)| (market.as_str(), systems))
    }

    /// Number of markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether no market has a selection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

/// Aggregated series of a combination run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedReturns {
    /// Per-market aggregates, in market order.
    pub per_market: BTreeMap<String, Vec<CategorySeries>>,
    /// Grand totals across markets.
    pub totals: Vec<CategorySeries>,
}

/// Runs the selector per system and sums the chosen series.
#[derive(Debug)]
pub struct SystemCombiner<'a, S: ReturnScorer> {
    scorer: &'a S,
    selection: SelectionConfig,
    systems: Vec<TradingSystem>,
    reference_time: Option<NaiveDateTime>,
}

impl<'a, S: ReturnScorer> SystemCombiner<'a, S> {
    /// Create a combiner over loaded systems.
    #[must_use]
    pub fn new(scorer: &'a S, selection: SelectionConfig, systems: Vec<TradingSystem>) -> Self {
        Self {
            scorer,
            selection,
            systems,
            reference_time: None,
        }
    }

    /// Measure the stale-data cutoff from `reference_time` instead of now.
    #[must_use]
    pub fn with_reference_time(mut self, reference_time: NaiveDateTime) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    /// Select a lookback period per `(system, market)`.
    pub fn select(&self) -> BestPeriodMap {
        let mut selector = LookbackSelector::new(self.scorer, self.selection);
        if let Some(reference_time) = self.reference_time {
            selector = selector.with_reference_time(reference_time);
        }

        let mut best = BestPeriodMap::new();
        for system in &self.systems {
            let record = selector.select_all(
                system.in_sample(),
                system.out_of_sample(),
                &system.overrides(),
            );
            info!(
                system = %system.path().display(),
                markets = record.len(),
                "Selected lookback periods for system"
            );
            for (market, selection) in record.iter() {
                best.insert(market, system.key(), selection.lookback_period);
            }
        }

        best
    }

    /// Rebuild every chosen series and sum per market and across markets.
    ///
    /// Out-of-sample aggregates only receive non-empty series. Entries that
    /// name an unknown system or an empty in-sample slice are skipped.
    pub fn aggregate(&self, best: &BestPeriodMap) -> CombinedReturns {
        let mut totals = CategoryAggregates::new();
        let mut per_market = BTreeMap::new();

        for (market, systems) in best.iter() {
            let mut market_aggregates = CategoryAggregates::new();

            for (system_key, &period) in systems {
                let Some(system) = self.find_system(system_key) else {
                    debug!(market, system = %system_key, "System not loaded, skipping");
                    continue;
                };

                let returns = MarketReturns::from_tables(
                    system.in_sample(),
                    system.out_of_sample(),
                    market,
                    period,
                );
                if returns.in_sample.is_empty() {
                    debug!(market, system = %system_key, period, "No in-sample rows, skipping");
                    continue;
                }

                market_aggregates.fold(SeriesCategory::InSample, &returns.in_sample);
                if !returns.out_of_sample.is_empty() {
                    market_aggregates.fold(SeriesCategory::OutOfSample, &returns.out_of_sample);
                }
                market_aggregates.fold(
                    SeriesCategory::InSampleThenOutOfSample,
                    &returns.in_sample_then_out_of_sample,
                );
            }

            if market_aggregates.is_empty() {
                continue;
            }
            market_aggregates.fold_into(&mut totals);
            per_market.insert(market.to_string(), market_aggregates.finish_all());
        }

        CombinedReturns {
            per_market,
            totals: totals.finish_all(),
        }
    }

    fn find_system(&self, key: &str) -> Option<&TradingSystem> {
        self.systems.iter().find(|system| system.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::config::{PeriodOverride, SystemConfig};
    use crate::metrics::MockReturnScorer;
    use crate::returns::ReturnSeries;
    use crate::table::{TradeRecord, TradeTable};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn rows(market: &str, period: u32, points: &[(u32, f64)]) -> Vec<TradeRecord> {
        points
            .iter()
            .map(|&(d, profit)| TradeRecord::new(market, period, day(d), Some(profit)))
            .collect()
    }

    fn system(key: &str, risk: f64, add: &[(&str, u32)], remove: &[&str]) -> TradingSystem {
        let mut is = rows("EURUSD", 4, &[(1, 1.0), (2, 2.0)]);
        is.extend(rows("GBPUSD", 4, &[(1, 3.0), (2, 1.0)]));
        let oos = rows("EURUSD", 4, &[(3, 1.0), (4, 1.0)]);

        let config = SystemConfig {
            risk,
            add: add
                .iter()
                .map(|(market, period)| ((*market).to_string(), PeriodOverride::Period(*period)))
                .collect(),
            remove: remove.iter().map(|market| (*market).to_string()).collect::<BTreeSet<_>>(),
        };

        TradingSystem::from_tables(
            key,
            config,
            &TradeTable::from_records("is", is),
            &TradeTable::from_records("oos", oos),
        )
    }

    fn always(score: f64) -> MockReturnScorer {
        let mut scorer = MockReturnScorer::new();
        scorer
            .expect_score()
            .returning(move |series: &ReturnSeries| (!series.is_empty()).then_some(score));
        scorer
    }

    #[test]
    fn test_select_keys_by_system_path() {
        let scorer = always(3.0);
        let combiner = SystemCombiner::new(
            &scorer,
            SelectionConfig::multi_system(),
            vec![
                system("/systems/a", 1.0, &[], &[]),
                system("/systems/b", 2.0, &[("GBPUSD", 12)], &["EURUSD"]),
            ],
        );

        let best = combiner.select();

        let Some(eurusd) = best.get("EURUSD") else {
            panic!("EURUSD selected by system a");
        };
        assert_eq!(eurusd.len(), 1);
        assert_eq!(eurusd.get("/systems/a"), Some(&4));

        let Some(gbpusd) = best.get("GBPUSD") else {
            panic!("GBPUSD fixed by system b");
        };
        assert_eq!(gbpusd.get("/systems/b"), Some(&12));
        assert_eq!(gbpusd.get("/systems/a"), None);

        let json = serde_json::to_value(&best).unwrap();
        assert_eq!(json["EURUSD"]["/systems/a"], 4);
    }

    #[test]
    fn test_aggregate_sums_risk_scaled_systems() {
        let scorer = always(3.0);
        let combiner = SystemCombiner::new(
            &scorer,
            SelectionConfig::multi_system(),
            vec![
                system("/systems/a", 1.0, &[], &[]),
                system("/systems/b", 2.0, &[], &[]),
            ],
        );

        let mut best = BestPeriodMap::new();
        best.insert("EURUSD", "/systems/a".to_string(), 4);
        best.insert("EURUSD", "/systems/b".to_string(), 4);

        let combined = combiner.aggregate(&best);
        let Some(eurusd) = combined.per_market.get("EURUSD") else {
            panic!("EURUSD aggregate");
        };

        let categories: Vec<_> = eurusd.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            vec![
                SeriesCategory::InSample,
                SeriesCategory::InSampleThenOutOfSample,
                SeriesCategory::OutOfSample,
            ]
        );

        // 1% + 2% (risk 2) on day 1
        let is = &eurusd[0].series;
        assert!((is.values()[0] - 0.03).abs() < 1e-12);
        assert_eq!(combined.totals.len(), 3);
    }

    #[test]
    fn test_aggregate_skips_unknown_system_and_empty_slice() {
        let scorer = always(3.0);
        let combiner = SystemCombiner::new(
            &scorer,
            SelectionConfig::multi_system(),
            vec![system("/systems/a", 1.0, &[], &[])],
        );

        let mut best = BestPeriodMap::new();
        best.insert("EURUSD", "/systems/missing".to_string(), 4);
        best.insert("GBPUSD", "/systems/a".to_string(), 99);

        let combined = combiner.aggregate(&best);
        assert!(combined.per_market.is_empty());
        assert!(combined.totals.is_empty());
    }

    #[test]
    fn test_market_without_oos_has_no_oos_aggregate() {
        let scorer = always(3.0);
        let combiner = SystemCombiner::new(
            &scorer,
            SelectionConfig::multi_system(),
            vec![system("/systems/a", 1.0, &[("GBPUSD", 4)], &[])],
        );

        let best = combiner.select();
        let combined = combiner.aggregate(&best);

        let Some(gbpusd) = combined.per_market.get("GBPUSD") else {
            panic!("GBPUSD fixed by override");
        };
        assert!(gbpusd.iter().all(|c| c.category != SeriesCategory::OutOfSample));
        // without OOS the spliced series is the in-sample series
        assert_eq!(gbpusd[0].series, gbpusd[1].series);
    }
}
