//! Multi-system combination.
//!
//! Several independently backtested systems are selected one by one with
//! the combination gate, each with its own risk scaling and overrides. The
//! chosen series are then summed per market and across markets.

mod combiner;
mod system;

pub use combiner::{BestPeriodMap, CombinedReturns, SystemCombiner};
pub use system::TradingSystem;
