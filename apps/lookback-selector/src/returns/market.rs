//! Derived series for one market and lookback period.

use super::aggregate::SeriesCategory;
use super::series::ReturnSeries;
use crate::table::TradeTable;

/// The in-sample and out-of-sample series of a `(market, period)` slice
/// together with the two series derived from them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketReturns {
    /// De-duplicated in-sample series.
    pub in_sample: ReturnSeries,
    /// Out-of-sample series.
    pub out_of_sample: ReturnSeries,
    /// In-sample before the switch date followed by out-of-sample.
    pub in_sample_then_out_of_sample: ReturnSeries,
    /// In-sample up to and including the switch date.
    pub in_sample_until_out_of_sample: ReturnSeries,
}

impl MarketReturns {
    /// Build every series from the two halves.
    #[must_use]
    pub fn from_series(in_sample: ReturnSeries, out_of_sample: ReturnSeries) -> Self {
        let in_sample_then_out_of_sample = in_sample.spliced_with(&out_of_sample);
        let in_sample_until_out_of_sample = in_sample.until_switch(&out_of_sample);
        Self {
            in_sample,
            out_of_sample,
            in_sample_then_out_of_sample,
            in_sample_until_out_of_sample,
        }
    }

    /// Slice both tables to `(market, lookback_period)` and build every series.
    #[must_use]
    pub fn from_tables(
        in_sample: &TradeTable,
        out_of_sample: &TradeTable,
        market: &str,
        lookback_period: u32,
    ) -> Self {
        Self::from_series(
            ReturnSeries::in_sample_from_trades(in_sample.slice(market, lookback_period)),
            ReturnSeries::from_trades(out_of_sample.slice(market, lookback_period)),
        )
    }

    /// The series for one category.
    #[must_use]
    pub const fn get(&self, category: SeriesCategory) -> &ReturnSeries {
        match category {
            SeriesCategory::InSample => &self.in_sample,
            SeriesCategory::InSampleUntilOutOfSample => &self.in_sample_until_out_of_sample,
            SeriesCategory::InSampleThenOutOfSample => &self.in_sample_then_out_of_sample,
            SeriesCategory::OutOfSample => &self.out_of_sample,
        }
    }

    /// Non-empty series with their categories, in report order.
    pub fn non_empty(&self) -> impl Iterator<Item = (SeriesCategory, &ReturnSeries)> {
        SeriesCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
            .filter(|(_, series)| !series.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::table::TradeRecord;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn tables() -> (TradeTable, TradeTable) {
        let is = TradeTable::from_records(
            "is",
            vec![
                TradeRecord::new("EURUSD", 4, day(1), Some(1.0)),
                TradeRecord::new("EURUSD", 4, day(2), Some(2.0)),
                TradeRecord::new("EURUSD", 4, day(2), Some(9.0)),
                TradeRecord::new("EURUSD", 4, day(4), Some(4.0)),
                TradeRecord::new("EURUSD", 8, day(1), Some(7.0)),
                TradeRecord::new("GBPUSD", 4, day(1), Some(7.0)),
            ],
        );
        let oos = TradeTable::from_records(
            "oos",
            vec![
                TradeRecord::new("EURUSD", 4, day(3), Some(-1.0)),
                TradeRecord::new("EURUSD", 4, day(5), None),
            ],
        );
        (is, oos)
    }

    #[test]
    fn test_from_tables_builds_all_categories() {
        let (is, oos) = tables();
        let returns = MarketReturns::from_tables(&is, &oos, "EURUSD", 4);

        assert_eq!(returns.in_sample.values(), vec![0.01, 0.02, 0.04]);
        assert_eq!(returns.out_of_sample.values(), vec![-0.01, 0.0]);
        assert_eq!(
            returns.in_sample_then_out_of_sample.values(),
            vec![0.01, 0.02, -0.01, 0.0]
        );
        assert_eq!(returns.in_sample_until_out_of_sample.values(), vec![0.01, 0.02]);
        assert_eq!(returns.non_empty().count(), 4);
    }

    #[test]
    fn test_without_oos_only_in_sample_categories() {
        let (is, oos) = tables();
        let returns = MarketReturns::from_tables(&is, &oos, "EURUSD", 8);

        let categories: Vec<_> = returns.non_empty().map(|(category, _)| category).collect();
        assert_eq!(
            categories,
            vec![SeriesCategory::InSample, SeriesCategory::InSampleThenOutOfSample]
        );
        assert_eq!(returns.in_sample_then_out_of_sample, returns.in_sample);
    }

    #[test]
    fn test_unknown_market_is_empty() {
        let (is, oos) = tables();
        let returns = MarketReturns::from_tables(&is, &oos, "USDJPY", 4);
        assert_eq!(returns.non_empty().count(), 0);
    }
}
