//! Prometheus duration literals.
//!
//! Intervals are written the way PromQL writes range selectors: one or more
//! `<integer><unit>` groups from largest to smallest unit, e.g. `30s`, `5m`,
//! `1h30m` or `7d`.

use std::time::Duration;

use thiserror::Error;

/// Unit suffixes with their length in milliseconds, largest first.
///
/// Position in this table defines the required ordering of groups.
const UNITS: &[(&str, u64)] = &[
    ("y", 365 * 24 * 60 * 60 * 1000),
    ("w", 7 * 24 * 60 * 60 * 1000),
    ("d", 24 * 60 * 60 * 1000),
    ("h", 60 * 60 * 1000),
    ("m", 60 * 1000),
    ("s", 1000),
    ("ms", 1),
];

/// Errors produced when parsing an interval literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    /// The input was empty or only whitespace.
    #[error("empty interval")]
    Empty,

    /// A unit appeared without a number in front of it.
    #[error("missing number in interval {0:?}")]
    MissingNumber(String),

    /// A number was not followed by a unit.
    #[error("missing unit in interval {0:?}")]
    MissingUnit(String),

    /// The unit suffix is not one of `y w d h m s ms`.
    #[error("unknown unit {unit:?} in interval {input:?}")]
    UnknownUnit { input: String, unit: String },

    /// Units must go from largest to smallest, each at most once.
    #[error("units out of order in interval {0:?}")]
    OutOfOrder(String),

    /// The interval does not fit in 64 bits of milliseconds.
    #[error("interval {0:?} is too large")]
    Overflow(String),
}

/// Parse a Prometheus duration literal like `"5m"` or `"1h30m"`.
pub fn parse_interval(s: &str) -> Result<Duration, IntervalError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(IntervalError::Empty);
    }

    let mut total: u64 = 0;
    let mut last_rank: Option<usize> = None;
    let mut rest = s;

    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(IntervalError::MissingNumber(s.to_string()));
        }
        let (number, tail) = rest.split_at(digits);

        let unit_len = tail.find(|c: char| c.is_ascii_digit()).unwrap_or(tail.len());
        if unit_len == 0 {
            return Err(IntervalError::MissingUnit(s.to_string()));
        }
        let (unit, tail) = tail.split_at(unit_len);

        let (rank, millis_per_unit) = UNITS
            .iter()
            .enumerate()
            .find(|(_, (suffix, _))| *suffix == unit)
            .map(|(rank, (_, millis))| (rank, *millis))
            .ok_or_else(|| IntervalError::UnknownUnit {
                input: s.to_string(),
                unit: unit.to_string(),
            })?;

        if last_rank.is_some_and(|last| rank <= last) {
            return Err(IntervalError::OutOfOrder(s.to_string()));
        }
        last_rank = Some(rank);

        let overflow = || IntervalError::Overflow(s.to_string());
        let value: u64 = number.parse().map_err(|_| overflow())?;
        total = value
            .checked_mul(millis_per_unit)
            .and_then(|millis| total.checked_add(millis))
            .ok_or_else(overflow)?;

        rest = tail;
    }

    Ok(Duration::from_millis(total))
}

/// Format a duration as a canonical Prometheus literal.
///
/// Sub-millisecond precision is truncated; a zero duration formats as `0s`.
pub fn format_interval(d: Duration) -> String {
    let mut remaining = d.as_millis();
    if remaining == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    for (suffix, millis) in UNITS {
        let millis = u128::from(*millis);
        let count = remaining / millis;
        if count > 0 {
            out.push_str(&count.to_string());
            out.push_str(suffix);
            remaining %= millis;
        }
    }
    out
}

/// Serde adapter for `Option<Duration>` fields stored as interval literals.
///
/// Use with `#[serde(with = "promgraph_types::interval::serde_opt")]`.
#[cfg(feature = "serde")]
pub mod serde_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_some(&super::format_interval(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| super::parse_interval(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_units() {
        assert_eq!(parse_interval("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_interval("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_interval("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_interval("7d").unwrap(), Duration::from_secs(7 * 86_400));
        assert_eq!(parse_interval("1w").unwrap(), Duration::from_secs(7 * 86_400));
        assert_eq!(parse_interval("1y").unwrap(), Duration::from_secs(365 * 86_400));
        assert_eq!(parse_interval("500ms").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn parse_compound() {
        assert_eq!(parse_interval("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(
            parse_interval("1m30s250ms").unwrap(),
            Duration::from_millis(90_250)
        );
    }

    #[test]
    fn parse_with_whitespace() {
        assert_eq!(parse_interval("  15m ").unwrap(), Duration::from_secs(900));
    }

    #[test]
    fn parse_zero() {
        assert_eq!(parse_interval("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parse_empty_fails() {
        assert_eq!(parse_interval("   "), Err(IntervalError::Empty));
    }

    #[test]
    fn parse_missing_number_fails() {
        assert!(matches!(
            parse_interval("m"),
            Err(IntervalError::MissingNumber(_))
        ));
    }

    #[test]
    fn parse_missing_unit_fails() {
        assert!(matches!(
            parse_interval("300"),
            Err(IntervalError::MissingUnit(_))
        ));
    }

    #[test]
    fn parse_unknown_unit_fails() {
        let err = parse_interval("5x").unwrap_err();
        assert_eq!(
            err,
            IntervalError::UnknownUnit {
                input: "5x".to_string(),
                unit: "x".to_string(),
            }
        );
    }

    #[test]
    fn parse_fractional_fails() {
        // "1.5m": the '.' ends up as an unknown unit
        assert!(parse_interval("1.5m").is_err());
    }

    #[test]
    fn parse_out_of_order_fails() {
        assert!(matches!(
            parse_interval("30m1h"),
            Err(IntervalError::OutOfOrder(_))
        ));
        assert!(matches!(
            parse_interval("5m5m"),
            Err(IntervalError::OutOfOrder(_))
        ));
    }

    #[test]
    fn parse_overflow_fails() {
        assert!(matches!(
            parse_interval("99999999999999999999y"),
            Err(IntervalError::Overflow(_))
        ));
        assert!(matches!(
            parse_interval("999999999999y"),
            Err(IntervalError::Overflow(_))
        ));
    }

    #[test]
    fn format_zero() {
        assert_eq!(format_interval(Duration::ZERO), "0s");
    }

    #[test]
    fn format_uses_largest_units() {
        assert_eq!(format_interval(Duration::from_secs(300)), "5m");
        assert_eq!(format_interval(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_interval(Duration::from_secs(5400)), "1h30m");
        assert_eq!(format_interval(Duration::from_secs(7 * 86_400)), "1w");
        assert_eq!(format_interval(Duration::from_millis(1500)), "1s500ms");
    }

    #[test]
    fn format_truncates_sub_millisecond() {
        assert_eq!(format_interval(Duration::from_micros(2_500)), "2ms");
        assert_eq!(format_interval(Duration::from_micros(999)), "0s");
    }

    #[test]
    fn parse_accepts_formatted_output() {
        for literal in ["5m", "1h30m", "1d12h", "2w3d", "1s500ms"] {
            let d = parse_interval(literal).unwrap();
            assert_eq!(format_interval(d), literal);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_opt_uses_literals() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Holder {
            #[serde(with = "serde_opt", default)]
            interval: Option<Duration>,
        }

        let json = serde_json::to_string(&Holder {
            interval: Some(Duration::from_secs(300)),
        })
        .unwrap();
        assert_eq!(json, r#"{"interval":"5m"}"#);

        let parsed: Holder = serde_json::from_str(r#"{"interval":"1h"}"#).unwrap();
        assert_eq!(parsed.interval, Some(Duration::from_secs(3600)));

        let parsed: Holder = serde_json::from_str(r#"{"interval":null}"#).unwrap();
        assert_eq!(parsed.interval, None);

        assert!(serde_json::from_str::<Holder>(r#"{"interval":"soon"}"#).is_err());
    }
}
