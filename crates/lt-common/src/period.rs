//! Resampling periods.
//!
//! Periods are written the way analysts are used to typing them: `"D"`,
//! `"3D"`, `"W"`, `"2W"`, `"M"`. An empty string or `"none"` means no
//! resampling at all (cumulative counts, daily rows).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Granularity to resample a cumulative table into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PeriodSpec {
    /// Keep daily cumulative rows; only sanitize missing values.
    #[default]
    None,
    /// Buckets of `n` calendar days.
    Days(u32),
    /// Buckets of `n` weeks ending on Sunday.
    Weeks(u32),
    /// Buckets of `n` calendar months ending on the last day of the month.
    Months(u32),
}

impl PeriodSpec {
    /// Daily deltas.
    pub const DAILY: PeriodSpec = PeriodSpec::Days(1);

    pub fn is_none(&self) -> bool {
        matches!(self, PeriodSpec::None)
    }

    /// Unit name used on plot axes.
    pub fn axis_unit(&self) -> String {
        match self {
            PeriodSpec::None => "Day".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for PeriodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n, unit) = match self {
            PeriodSpec::None => return write!(f, "none"),
            PeriodSpec::Days(n) => (*n, 'D'),
            PeriodSpec::Weeks(n) => (*n, 'W'),
            PeriodSpec::Months(n) => (*n, 'M'),
        };
        if n == 1 {
            write!(f, "{unit}")
        } else {
            write!(f, "{n}{unit}")
        }
    }
}

impl FromStr for PeriodSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(PeriodSpec::None);
        }

        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);
        let n = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<u32>()
                .map_err(|_| Error::InvalidPeriod(s.to_string()))?
        };
        if n == 0 {
            return Err(Error::InvalidPeriod(format!(
                "{s}: multiplier must be at least 1"
            )));
        }

        match unit.to_ascii_uppercase().as_str() {
            "D" => Ok(PeriodSpec::Days(n)),
            "W" => Ok(PeriodSpec::Weeks(n)),
            "M" => Ok(PeriodSpec::Months(n)),
            _ => Err(Error::InvalidPeriod(s.to_string())),
        }
    }
}

impl Serialize for PeriodSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
