//! Cross-market and cross-system return aggregation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::series::ReturnSeries;

/// Which slice of a backtest a series covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesCategory {
    /// In-sample returns.
    InSample,
    /// In-sample returns up to the first out-of-sample timestamp.
    InSampleUntilOutOfSample,
    /// In-sample returns spliced with out-of-sample returns.
    InSampleThenOutOfSample,
    /// Out-of-sample returns.
    OutOfSample,
}

impl SeriesCategory {
    /// Every category, in report order.
    pub const ALL: [Self; 4] = [
        Self::InSample,
        Self::InSampleUntilOutOfSample,
        Self::InSampleThenOutOfSample,
        Self::OutOfSample,
    ];

    /// Short name used in output file names.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::InSample => "is",
            Self::InSampleUntilOutOfSample => "is_until_oos",
            Self::InSampleThenOutOfSample => "is_then_oos",
            Self::OutOfSample => "oos",
        }
    }

    /// Human readable name used in report titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InSample => "IS",
            Self::InSampleUntilOutOfSample => "IS until OOS",
            Self::InSampleThenOutOfSample => "IS then OOS",
            Self::OutOfSample => "OOS",
        }
    }
}

impl fmt::Display for SeriesCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Accumulates series by date-aligned addition.
///
/// The first fold adopts its series as is; later folds outer-join add.
#[derive(Debug, Clone, Default)]
pub struct ReturnAggregator {
    acc: Option<ReturnSeries>,
}

impl ReturnAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub const fn new() -> Self {
        Self { acc: None }
    }

    /// Add a series into the accumulator.
    pub fn fold(&mut self, series: &ReturnSeries) {
        self.acc = Some(match self.acc.take() {
            None => series.clone(),
            Some(acc) => acc.add_aligned(series),
        });
    }

    /// Whether nothing has been folded yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.acc.is_none()
    }

    /// The finalised accumulator (non-finite values as 0, sorted), if
    /// anything was folded.
    #[must_use]
    pub fn finish(&self) -> Option<ReturnSeries> {
        self.acc
            .as_ref()
            .map(|acc| ReturnSeries::from_points(acc.points().iter().copied()))
    }
}

/// A finalised aggregate with its category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeries {
    /// Category of the aggregate.
    pub category: SeriesCategory,
    /// The aggregated series.
    pub series: ReturnSeries,
}

/// One aggregator per [`SeriesCategory`].
#[derive(Debug, Clone, Default)]
pub struct CategoryAggregates {
    aggregators: BTreeMap<SeriesCategory, ReturnAggregator>,
}

impl CategoryAggregates {
    /// Create empty aggregates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a series into the aggregate for `category`.
    pub fn fold(&mut self, category: SeriesCategory, series: &ReturnSeries) {
        self.aggregators.entry(category).or_default().fold(series);
    }

    /// Finalised aggregate for one category.
    #[must_use]
    pub fn finish(&self, category: SeriesCategory) -> Option<ReturnSeries> {
        self.aggregators.get(&category).and_then(ReturnAggregator::finish)
    }

    /// Every finalised aggregate, in category order.
    #[must_use]
    pub fn finish_all(&self) -> Vec<CategorySeries> {
        self.aggregators
            .iter()
            .filter_map(|(category, aggregator)| {
                aggregator.finish().map(|series| CategorySeries {
                    category: *category,
                    series,
                })
            })
            .collect()
    }

    /// Fold every finalised aggregate of `self` into `totals`.
    pub fn fold_into(&self, totals: &mut Self) {
        for CategorySeries { category, series } in self.finish_all() {
            totals.fold(category, &series);
        }
    }

    /// Whether no category has been folded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aggregators.values().all(ReturnAggregator::is_empty)
    }
}
