//! Decoding of the legacy weight export.
//!
//! The historical data source is a JSON object mapping ISO dates to
//! weights, e.g. `{"2023-01-01": 185.2, "2023-01-02": 184.9}`.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::data::WeightEntry;
use crate::error::{Error, Result};

/// Read and decode the legacy file into date-ordered entries.
pub fn load_legacy_file(path: &Path) -> Result<Vec<WeightEntry>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::InvalidInput(format!("cannot read {}: {e}", path.display())))?;
    parse_legacy_json(&contents)
}

fn parse_legacy_json(contents: &str) -> Result<Vec<WeightEntry>> {
    // BTreeMap keys sort lexicographically, which for ISO dates is
    // chronological order
    let records: BTreeMap<String, f64> = serde_json::from_str(contents).map_err(|e| {
        Error::InvalidInput(format!("legacy data is not a date-to-weight map: {e}"))
    })?;

    let mut entries = Vec::with_capacity(records.len());
    for (date, weight) in records {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| Error::InvalidInput(format!("legacy entry has bad date `{date}`")))?;
        if !(weight.is_finite() && weight > 0.0) {
            return Err(Error::InvalidInput(format!(
                "legacy entry for {date} has a non-positive weight"
            )));
        }
        entries.push(WeightEntry::new(date, weight));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legacy_json() {
        let json = r#"{"2023-01-02": 184.9, "2023-01-01": 185.2}"#;
        let entries = parse_legacy_json(json).unwrap();
        assert_eq!(entries.len(), 2);
        // Date-ordered regardless of key order in the file
        assert_eq!(
            entries[0].date,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
        assert_eq!(entries[0].weight, 185.2);
        assert_eq!(entries[1].weight, 184.9);
    }

    #[test]
    fn test_rejects_bad_dates() {
        let json = r#"{"January 1st": 185.2}"#;
        assert!(matches!(
            parse_legacy_json(json),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_weights() {
        let json = r#"{"2023-01-01": -5.0}"#;
        assert!(matches!(
            parse_legacy_json(json),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_non_map_payload() {
        assert!(matches!(
            parse_legacy_json("[1, 2, 3]"),
            Err(Error::InvalidInput(_))
        ));
    }
}
