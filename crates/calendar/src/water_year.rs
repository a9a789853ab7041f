//! Hydrological-year labels and window segmentation.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::CalendarError;

/// Returns the hydrological-year label for a calendar year and month.
///
/// The label is the calendar year in which the hydrological year *starts*:
/// with `start_month = 7`, July 2000 through June 2001 all map to 2000.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` or `start_month` is
/// outside 1..=12.
///
/// # Examples
///
/// ```
/// use onset_calendar::hydro_year;
///
/// assert_eq!(hydro_year(2000, 7, 7).unwrap(), 2000);
/// assert_eq!(hydro_year(2001, 6, 7).unwrap(), 2000);
/// // Calendar year (start_month = 1):
/// assert_eq!(hydro_year(2000, 6, 1).unwrap(), 2000);
/// ```
pub fn hydro_year(year: i32, month: u8, start_month: u8) -> Result<i32, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { month });
    }
    if !(1..=12).contains(&start_month) {
        return Err(CalendarError::InvalidMonth { month: start_month });
    }
    if month >= start_month {
        Ok(year)
    } else {
        Ok(year - 1)
    }
}

/// The time indices belonging to one complete hydrological year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydroYearWindow {
    year: i32,
    indices: Vec<usize>,
}

impl HydroYearWindow {
    /// Creates a window from a year label and its ordered time indices.
    pub fn new(year: i32, indices: Vec<usize>) -> Self {
        Self { year, indices }
    }

    /// Year label `Y` of the `Y/Y+1` hydrological year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Ordered indices into the source time axis.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of days in the window (365 or 366 on a complete daily axis).
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the window holds no time index.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Per-year accumulator used while scanning the date axis.
#[derive(Default)]
struct YearBucket {
    indices: Vec<usize>,
    months_seen: [bool; 12],
}

/// Partitions a daily date axis into complete hydrological-year windows.
///
/// A year `Y` is kept only when its window has at least one date in each of
/// its twelve months (`start_month` of `Y` through `start_month - 1` of
/// `Y + 1`). Partial years at either end of the axis are dropped. The result
/// is ascending by year and is empty when no year is complete.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `start_month` is outside
/// 1..=12, or [`CalendarError::UnorderedDates`] if `dates` is not strictly
/// increasing.
pub fn segment_water_years(
    dates: &[NaiveDate],
    start_month: u8,
) -> Result<Vec<HydroYearWindow>, CalendarError> {
    if !(1..=12).contains(&start_month) {
        return Err(CalendarError::InvalidMonth { month: start_month });
    }
    if let Some(pos) = dates.windows(2).position(|w| w[1] <= w[0]) {
        return Err(CalendarError::UnorderedDates { index: pos + 1 });
    }

    let mut buckets: BTreeMap<i32, YearBucket> = BTreeMap::new();
    for (idx, date) in dates.iter().enumerate() {
        // chrono months are always 1..=12
        let month = date.month() as u8;
        let label = hydro_year(date.year(), month, start_month)?;
        let bucket = buckets.entry(label).or_default();
        bucket.indices.push(idx);
        bucket.months_seen[usize::from(month - 1)] = true;
    }

    let mut windows = Vec::with_capacity(buckets.len());
    for (year, bucket) in buckets {
        if bucket.months_seen.iter().all(|&seen| seen) {
            windows.push(HydroYearWindow::new(year, bucket.indices));
        } else {
            let n_months = bucket.months_seen.iter().filter(|&&seen| seen).count();
            debug!(year, n_months, "dropping incomplete hydrological year");
        }
    }
    Ok(windows)
}
