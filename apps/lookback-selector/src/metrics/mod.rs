//! Performance metrics for return series.
//!
//! - `math`: mean, sample deviation, autocorrelation, drawdown
//! - `sharpe`: the [`ReturnScorer`] port and its Sharpe implementation
//! - `summary`: tearsheet statistics for rendered series

pub mod math;
mod sharpe;
mod summary;

#[cfg(test)]
pub use sharpe::MockReturnScorer;
pub use sharpe::{ReturnScorer, SharpeScorer, autocorr_penalty};
pub use summary::SeriesSummary;
