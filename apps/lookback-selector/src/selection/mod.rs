//! Per-market lookback period selection.
//!
//! For every market the selector walks the lookback periods found in the
//! in-sample table, scores the out-of-sample series and the spliced
//! IS-then-OOS series, and keeps the period with the best weighted score
//! among those that clear both thresholds of the gate.
//!
//! # Precedence
//!
//! 1. Markets in the exclusion set get no selection.
//! 2. Markets with a manual period get it with a `null` score.
//! 3. Everything else is scored.

mod overrides;
mod selector;
mod types;

pub use overrides::{MarketOverrides, OverrideDecision};
pub use selector::LookbackSelector;
pub use types::{MarketSelection, PeriodEvaluation, SelectionRecord};
