//! Daily date sequence generation.

use chrono::NaiveDate;

/// Generates `n_days` consecutive Gregorian dates starting at `start`.
///
/// Leap days are included, so a sequence starting on 2000-01-01 reaches
/// 2000-12-31 at index 365.
pub fn daily_sequence(start: NaiveDate, n_days: usize) -> Vec<NaiveDate> {
    start.iter_days().take(n_days).collect()
}
