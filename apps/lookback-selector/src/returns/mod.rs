//! Return series built from trade tables, and their aggregation.
//!
//! - [`ReturnSeries`]: sorted fractional returns for one slice of a table
//! - [`MarketReturns`]: IS, OOS and the two spliced views of a `(market, period)`
//! - [`ReturnAggregator`] / [`CategoryAggregates`]: date-aligned summation

mod aggregate;
mod market;
mod series;

pub use aggregate::{CategoryAggregates, CategorySeries, ReturnAggregator, SeriesCategory};
pub use market::MarketReturns;
pub use series::{ReturnPoint, ReturnSeries};
