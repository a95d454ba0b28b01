//! Least-squares trend fitting over the displayed entries.

use crate::data::WeightEntry;

/// A fitted line over the day-ordinal axis of the displayed entries.
///
/// `x` is measured in days since the first entry's date, so the intercept
/// is the fitted weight at the start of the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    /// lbs per day
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn value_at(&self, day_offset: f64) -> f64 {
        self.slope * day_offset + self.intercept
    }
}

/// Fit a simple linear least-squares trend to the entries.
///
/// Returns `None` when fewer than two points exist or all points share a
/// single date; the graph then shows the raw series without an overlay.
pub fn fit(entries: &[WeightEntry]) -> Option<TrendLine> {
    if entries.len() < 2 {
        return None;
    }

    let origin = entries[0].date;
    let xs: Vec<f64> = entries
        .iter()
        .map(|e| (e.date - origin).num_days() as f64)
        .collect();
    let n = entries.len() as f64;

    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = entries.iter().map(|e| e.weight).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (x, entry) in xs.iter().zip(entries) {
        numerator += (x - mean_x) * (entry.weight - mean_y);
        denominator += (x - mean_x) * (x - mean_x);
    }

    if denominator.abs() < 1e-10 {
        return None;
    }

    let slope = numerator / denominator;
    Some(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
