//! Entry point from a precipitation field to an onset run.

use chrono::NaiveDate;
use ndarray::{ArrayView3, Axis};
use onset_calendar::segment_water_years;
use tracing::{info, warn};

use crate::config::OnsetConfig;
use crate::error::AggregateError;
use crate::stack::{OnsetRun, build_onset_stack};

/// Segments the date axis into hydrological years and detects the onset map
/// of each.
///
/// `precip` is `[time, lat, lon]` in millimetres with `dates[t]` labelling
/// `precip[t, .., ..]`. A date range without any complete hydrological year
/// is not an error: it is logged and gives a run with an empty stack.
///
/// # Errors
///
/// - Any [`OnsetConfig::validate`] error.
/// - [`AggregateError::DimensionMismatch`] if `dates` and the time axis differ
///   in length.
/// - [`AggregateError::Calendar`] if `dates` is not strictly increasing.
pub fn detect_onsets(
    precip: ArrayView3<'_, f64>,
    dates: &[NaiveDate],
    config: &OnsetConfig,
) -> Result<OnsetRun, AggregateError> {
    config.validate()?;
    let n_steps = precip.len_of(Axis(0));
    if dates.len() != n_steps {
        return Err(AggregateError::DimensionMismatch {
            name: "time".into(),
            expected: n_steps,
            got: dates.len(),
        });
    }

    let windows = segment_water_years(dates, config.start_month())?;
    if windows.is_empty() {
        warn!(
            n_days = n_steps,
            start_month = config.start_month(),
            "no complete hydrological year in date range"
        );
    } else {
        info!(
            n_years = windows.len(),
            first = windows[0].year(),
            parallel = config.parallel(),
            "detecting onsets"
        );
    }

    Ok(build_onset_stack(precip, &windows, config.parallel()))
}
