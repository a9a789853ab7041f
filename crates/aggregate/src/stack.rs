//! The onset stack: one onset map per processed hydrological year.

use ndarray::{Array3, ArrayView2, ArrayView3, Axis};
use onset_accumulation::{AccumulationError, OnsetMap, detect_onset};
use onset_calendar::HydroYearWindow;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::AggregateError;

/// Onset days stacked along a year axis `[year, lat, lon]`, with the year
/// labels held in a parallel vector.
#[derive(Debug, Clone, PartialEq)]
pub struct OnsetStack {
    years: Vec<i32>,
    data: Array3<Option<u16>>,
}

impl OnsetStack {
    /// Creates a stack from year labels and a `[year, lat, lon]` array.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::DimensionMismatch`] if the number of labels
    /// differs from the length of the year axis.
    pub fn new(years: Vec<i32>, data: Array3<Option<u16>>) -> Result<Self, AggregateError> {
        let n_slices = data.len_of(Axis(0));
        if years.len() != n_slices {
            return Err(AggregateError::DimensionMismatch {
                name: "year".into(),
                expected: n_slices,
                got: years.len(),
            });
        }
        Ok(Self { years, data })
    }

    /// Builds a stack from `(year, map)` pairs in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::DimensionMismatch`] if a map's shape differs
    /// from `(n_lat, n_lon)`.
    pub fn from_maps(
        n_lat: usize,
        n_lon: usize,
        entries: Vec<(i32, OnsetMap)>,
    ) -> Result<Self, AggregateError> {
        for (_, map) in &entries {
            let (rows, cols) = map.dim();
            if rows != n_lat {
                return Err(AggregateError::DimensionMismatch {
                    name: "lat".into(),
                    expected: n_lat,
                    got: rows,
                });
            }
            if cols != n_lon {
                return Err(AggregateError::DimensionMismatch {
                    name: "lon".into(),
                    expected: n_lon,
                    got: cols,
                });
            }
        }
        let data = stack_maps(n_lat, n_lon, &entries);
        let years = entries.into_iter().map(|(year, _)| year).collect();
        Ok(Self { years, data })
    }

    /// Year labels, in stack order.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// The `[year, lat, lon]` onset array.
    pub fn data(&self) -> &Array3<Option<u16>> {
        &self.data
    }

    /// Number of years in the stack.
    pub fn n_years(&self) -> usize {
        self.years.len()
    }

    /// Whether the stack holds no year.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Spatial shape `(n_lat, n_lon)`.
    pub fn grid_shape(&self) -> (usize, usize) {
        let (_, n_lat, n_lon) = self.data.dim();
        (n_lat, n_lon)
    }

    /// Onset map of the year at stack position `slot`.
    pub fn slice(&self, slot: usize) -> Option<ArrayView2<'_, Option<u16>>> {
        (slot < self.n_years()).then(|| self.data.index_axis(Axis(0), slot))
    }

    /// Iterator over `(year, onset map)` pairs in stack order.
    pub fn iter_years(&self) -> impl Iterator<Item = (i32, ArrayView2<'_, Option<u16>>)> {
        self.years
            .iter()
            .copied()
            .zip(self.data.axis_iter(Axis(0)))
    }

    /// `"first-last"` label of the processed years, `None` when empty.
    pub fn period_label(&self) -> Option<String> {
        match (self.years.first(), self.years.last()) {
            (Some(first), Some(last)) => Some(format!("{first}-{last}")),
            _ => None,
        }
    }
}

/// A hydrological year that could not be processed.
#[derive(Debug, Clone, PartialEq)]
pub struct YearFailure {
    /// Year label of the skipped window.
    pub year: i32,
    /// Why the year was skipped.
    pub error: AggregateError,
}

/// Result of a detection run: the stack of processed years plus the years
/// that were skipped.
#[derive(Debug, Clone)]
pub struct OnsetRun {
    stack: OnsetStack,
    failures: Vec<YearFailure>,
}

impl OnsetRun {
    /// The onset stack of successfully processed years.
    pub fn stack(&self) -> &OnsetStack {
        &self.stack
    }

    /// Years excluded from the stack, in window order.
    pub fn failures(&self) -> &[YearFailure] {
        &self.failures
    }

    /// Consumes the run, returning the stack and the failures.
    pub fn into_parts(self) -> (OnsetStack, Vec<YearFailure>) {
        (self.stack, self.failures)
    }
}

/// Detects the onset map of every window and stacks them in window order.
///
/// Each window writes into its own pre-allocated slot, so with `parallel`
/// the windows are processed on the rayon pool without shared mutable state.
/// A window that fails is logged, recorded in [`OnsetRun::failures`] and
/// left out of the stack; the other windows are unaffected.
pub fn build_onset_stack(
    precip: ArrayView3<'_, f64>,
    windows: &[HydroYearWindow],
    parallel: bool,
) -> OnsetRun {
    let (_, n_lat, n_lon) = precip.dim();

    let mut slots: Vec<Option<Result<OnsetMap, AggregateError>>> = Vec::new();
    slots.resize_with(windows.len(), || None);

    if parallel {
        slots
            .par_iter_mut()
            .zip(windows.par_iter())
            .for_each(|(slot, window)| *slot = Some(onset_for_window(precip, window)));
    } else {
        for (slot, window) in slots.iter_mut().zip(windows) {
            *slot = Some(onset_for_window(precip, window));
        }
    }

    let mut entries = Vec::with_capacity(windows.len());
    let mut failures = Vec::new();
    for (window, outcome) in windows.iter().zip(slots.into_iter().flatten()) {
        match outcome {
            Ok(map) => {
                debug!(year = window.year(), n_days = window.len(), "onset map computed");
                entries.push((window.year(), map));
            }
            Err(error) => {
                warn!(year = window.year(), %error, "skipping hydrological year");
                failures.push(YearFailure {
                    year: window.year(),
                    error,
                });
            }
        }
    }

    // every map comes from detect_onset on an (n_lat, n_lon) slice
    let data = stack_maps(n_lat, n_lon, &entries);
    let years = entries.into_iter().map(|(year, _)| year).collect();
    OnsetRun {
        stack: OnsetStack { years, data },
        failures,
    }
}

fn stack_maps(n_lat: usize, n_lon: usize, entries: &[(i32, OnsetMap)]) -> Array3<Option<u16>> {
    let mut data = Array3::from_elem((entries.len(), n_lat, n_lon), None);
    for (mut slice, (_, map)) in data.axis_iter_mut(Axis(0)).zip(entries) {
        slice.assign(map);
    }
    data
}

fn onset_for_window(
    precip: ArrayView3<'_, f64>,
    window: &HydroYearWindow,
) -> Result<OnsetMap, AggregateError> {
    let (n_steps, n_lat, n_lon) = precip.dim();
    if window.is_empty() {
        return Err(AccumulationError::EmptyWindow { n_lat, n_lon }.into());
    }
    if let Some(&index) = window.indices().iter().find(|&&i| i >= n_steps) {
        return Err(AggregateError::WindowOutOfRange {
            year: window.year(),
            index,
            n_steps,
        });
    }
    let slice = precip.select(Axis(0), window.indices());
    Ok(detect_onset(slice.view())?)
}
