//! Per-market inclusion and exclusion overrides.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{PeriodOverride, SpecificConfig, SystemConfig};

/// What the overrides say about one market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideDecision {
    /// Listed in `remove`; no selection at all.
    Excluded,
    /// Listed in `add` with a period; use it without scoring.
    Fixed(u32),
    /// Score the candidate periods.
    Evaluate,
}

/// Borrowed `add` map and `remove` set for one run or system.
#[derive(Debug, Clone, Copy)]
pub struct MarketOverrides<'a> {
    add: &'a BTreeMap<String, PeriodOverride>,
    remove: &'a BTreeSet<String>,
}

impl<'a> MarketOverrides<'a> {
    /// Wrap an override map and exclusion set.
    #[must_use]
    pub const fn new(
        add: &'a BTreeMap<String, PeriodOverride>,
        remove: &'a BTreeSet<String>,
    ) -> Self {
        Self { add, remove }
    }

    /// Decide how to treat `market`. Exclusion wins over an override.
    #[must_use]
    pub fn decision(&self, market: &str) -> OverrideDecision {
        if self.remove.contains(market) {
            return OverrideDecision::Excluded;
        }

        match self.add.get(market).and_then(|value| value.period()) {
            Some(period) => OverrideDecision::Fixed(period),
            None => OverrideDecision::Evaluate,
        }
    }
}

impl<'a> From<&'a SpecificConfig> for MarketOverrides<'a> {
    fn from(config: &'a SpecificConfig) -> Self {
        Self::new(&config.add, &config.remove)
    }
}

impl<'a> From<&'a SystemConfig> for MarketOverrides<'a> {
    fn from(config: &'a SystemConfig) -> Self {
        Self::new(&config.add, &config.remove)
    }
}
