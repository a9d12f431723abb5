//! Time-indexed return series.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::table::TradeRecord;

/// A single fractional return at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    /// Trade timestamp.
    pub timestamp: NaiveDateTime,
    /// Fractional return (`0.015` for 1.5%).
    pub value: f64,
}

impl ReturnPoint {
    /// Create a new return point.
    #[must_use]
    pub const fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Returns sorted ascending by timestamp, with every value finite.
///
/// Equal timestamps keep their input order. Out-of-sample series may hold
/// several points at the same timestamp; in-sample series never do.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    /// Normalise arbitrary points: non-finite values become 0, then a
    /// stable sort by timestamp.
    pub fn from_points(points: impl IntoIterator<Item = ReturnPoint>) -> Self {
        let mut points: Vec<ReturnPoint> = points
            .into_iter()
            .map(|point| ReturnPoint {
                value: if point.value.is_finite() { point.value } else { 0.0 },
                ..point
            })
            .collect();
        points.sort_by_key(|point| point.timestamp);
        Self { points }
    }

    /// Series from trade rows: `ProfitPercent / 100`, missing as 0.
    pub fn from_trades<'a>(trades: impl IntoIterator<Item = &'a TradeRecord>) -> Self {
        Self::from_points(trades.into_iter().map(|trade| {
            ReturnPoint::new(
                trade.limit_created,
                trade.profit_percent.unwrap_or(0.0) / 100.0,
            )
        }))
    }

    /// Like [`Self::from_trades`], then drop every point whose timestamp
    /// repeats an earlier one.
    pub fn in_sample_from_trades<'a>(trades: impl IntoIterator<Item = &'a TradeRecord>) -> Self {
        let mut series = Self::from_trades(trades);
        series.points.dedup_by_key(|point| point.timestamp);
        series
    }

    /// Points in timestamp order.
    #[must_use]
    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    /// Return values in timestamp order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.value).collect()
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest timestamp.
    #[must_use]
    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.points.first().map(|point| point.timestamp)
    }

    /// Latest timestamp.
    #[must_use]
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.points.last().map(|point| point.timestamp)
    }

    /// Points strictly before `cutoff`.
    #[must_use]
    pub fn before(&self, cutoff: NaiveDateTime) -> Self {
        self.filtered(|timestamp| timestamp < cutoff)
    }

    /// Points at or before `cutoff`.
    #[must_use]
    pub fn until(&self, cutoff: NaiveDateTime) -> Self {
        self.filtered(|timestamp| timestamp <= cutoff)
    }

    /// This in-sample series up to the first out-of-sample point, followed
    /// by the whole out-of-sample series. Without out-of-sample points the
    /// in-sample series is returned unchanged.
    #[must_use]
    pub fn spliced_with(&self, out_of_sample: &Self) -> Self {
        match out_of_sample.first_timestamp() {
            Some(switch_date) => Self::from_points(
                self.before(switch_date)
                    .points
                    .into_iter()
                    .chain(out_of_sample.points.iter().copied()),
            ),
            None => self.clone(),
        }
    }

    /// In-sample points up to and including the first out-of-sample
    /// timestamp. Empty when there is no out-of-sample data.
    #[must_use]
    pub fn until_switch(&self, out_of_sample: &Self) -> Self {
        out_of_sample
            .first_timestamp()
            .map_or_else(Self::default, |switch_date| self.until(switch_date))
    }

    /// Date-aligned addition. Every timestamp from either side appears once
    /// in the result; a side without that timestamp contributes 0.
    #[must_use]
    pub fn add_aligned(&self, other: &Self) -> Self {
        let mut sums: BTreeMap<NaiveDateTime, f64> = BTreeMap::new();
        for point in self.points.iter().chain(&other.points) {
            *sums.entry(point.timestamp).or_insert(0.0) += point.value;
        }
        Self::from_points(
            sums.into_iter()
                .map(|(timestamp, value)| ReturnPoint::new(timestamp, value)),
        )
    }

    fn filtered(&self, keep: impl Fn(NaiveDateTime) -> bool) -> Self {
        Self {
            points: self
                .points
                .iter()
                .copied()
                .filter(|point| keep(point.timestamp))
                .collect(),
        }
    }
}
