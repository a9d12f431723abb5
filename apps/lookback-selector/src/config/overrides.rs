//! Manual lookback overrides.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker used in override maps for "no manual period, select normally".
pub const UNSET_MARKER: &str = "?";

/// A manual lookback period override for one market.
///
/// Accepts an integer (`8`), a numeric string (`"8"`), or the unset
/// marker `"?"`. Anything else is rejected while parsing the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOverride", into = "RawOverride")]
pub enum PeriodOverride {
    /// Listed but left to the selector.
    Unset,
    /// Use this lookback period without scoring.
    Period(u32),
}

impl PeriodOverride {
    /// The fixed period, if any.
    #[must_use]
    pub const fn period(self) -> Option<u32> {
        match self {
            Self::Unset => None,
            Self::Period(period) => Some(period),
        }
    }
}

impl fmt::Display for PeriodOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str(UNSET_MARKER),
            Self::Period(period) => write!(f, "{period}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawOverride {
    Number(i64),
    Text(String),
}

impl TryFrom<RawOverride> for PeriodOverride {
    type Error = String;

    fn try_from(raw: RawOverride) -> Result<Self, Self::Error> {
        match raw {
            RawOverride::Number(value) => u32::try_from(value)
                .map(Self::Period)
                .map_err(|_| format!("override period {value} is out of range")),
            RawOverride::Text(text) => {
                let text = text.trim();
                if text == UNSET_MARKER {
                    return Ok(Self::Unset);
                }
                text.parse::<u32>().map(Self::Period).map_err(|_| {
                    format!("override value '{text}' is neither a period nor '{UNSET_MARKER}'")
                })
            }
        }
    }
}

impl From<PeriodOverride> for RawOverride {
    fn from(value: PeriodOverride) -> Self {
        match value {
            PeriodOverride::Unset => Self::Text(UNSET_MARKER.to_string()),
            PeriodOverride::Period(period) => Self::Number(i64::from(period)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use test_case::test_case;

    use super::*;

    #[test_case("EURUSD: 8", PeriodOverride::Period(8) ; "integer")]
    #[test_case("EURUSD: \"12\"", PeriodOverride::Period(12) ; "numeric string")]
    #[test_case("EURUSD: \"?\"", PeriodOverride::Unset ; "unset marker")]
    fn test_parse_override(yaml: &str, expected: PeriodOverride) {
        let parsed: BTreeMap<String, PeriodOverride> = match serde_yaml_bw::from_str(yaml) {
            Ok(parsed) => parsed,
            Err(e) => panic!("override should parse: {e}"),
        };
        assert_eq!(parsed.get("EURUSD"), Some(&expected));
    }

    #[test_case("EURUSD: abc" ; "text")]
    #[test_case("EURUSD: -4" ; "negative")]
    fn test_reject_malformed_override(yaml: &str) {
        let parsed: Result<BTreeMap<String, PeriodOverride>, _> = serde_yaml_bw::from_str(yaml);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_period_accessor() {
        assert_eq!(PeriodOverride::Period(4).period(), Some(4));
        assert_eq!(PeriodOverride::Unset.period(), None);
        assert_eq!(PeriodOverride::Unset.to_string(), "?");
    }
}
