//! Graph range tokens and resolution of the query window.

use chrono::{Months, NaiveDate};

use crate::error::{Error, Result};

/// A symbolic graph window specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    LastMonth,
    LastSixMonths,
    LastYear,
    All,
    From(NaiveDate),
}

impl RangeSpec {
    /// Parse a range token: `1m`, `6m`, `1y`, `all`, or `from:YYYY-MM-DD`.
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "1m" => Ok(RangeSpec::LastMonth),
            "6m" => Ok(RangeSpec::LastSixMonths),
            "1y" => Ok(RangeSpec::LastYear),
            "all" => Ok(RangeSpec::All),
            _ => match token.strip_prefix("from:") {
                Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map(RangeSpec::From)
                    .map_err(|_| Error::InvalidRange(token.to_string())),
                None => Err(Error::InvalidRange(token.to_string())),
            },
        }
    }

    /// The symbolic token form, as persisted for the default range.
    pub fn token(&self) -> String {
        match self {
            RangeSpec::LastMonth => "1m".to_string(),
            RangeSpec::LastSixMonths => "6m".to_string(),
            RangeSpec::LastYear => "1y".to_string(),
            RangeSpec::All => "all".to_string(),
            RangeSpec::From(date) => format!("from:{}", date.format("%Y-%m-%d")),
        }
    }

    /// Inclusive lower bound of the graph window, `None` for all time.
    ///
    /// Month and year offsets are calendar-aware and clamp to the last
    /// valid day of the target month (Mar 31 minus one month is Feb 28/29).
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            RangeSpec::LastMonth => today.checked_sub_months(Months::new(1)),
            RangeSpec::LastSixMonths => today.checked_sub_months(Months::new(6)),
            RangeSpec::LastYear => today.checked_sub_months(Months::new(12)),
            RangeSpec::All => None,
            RangeSpec::From(date) => Some(*date),
        }
    }
}

/// Resolve the effective range for a graph request.
///
/// An explicit from-date wins outright, then an explicit token, then the
/// persisted default, then all time. A corrupt persisted token surfaces
/// the same `InvalidRange` as a bad explicit one.
pub fn resolve(
    from_date: Option<NaiveDate>,
    range: Option<RangeSpec>,
    stored: Option<&str>,
) -> Result<RangeSpec> {
    if let Some(date) = from_date {
        return Ok(RangeSpec::From(date));
    }
    if let Some(range) = range {
        return Ok(range);
    }
    match stored {
        Some(token) => RangeSpec::parse(token),
        None => Ok(RangeSpec::All),
    }
}
