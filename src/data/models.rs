//! Data models for logged weight measurements.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One logged measurement: a calendar date and the weight recorded for it.
///
/// Dates are unique keys in storage; logging twice for the same date
/// overwrites the earlier value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight: f64,
}

impl WeightEntry {
    pub fn new(date: NaiveDate, weight: f64) -> Self {
        WeightEntry { date, weight }
    }
}
