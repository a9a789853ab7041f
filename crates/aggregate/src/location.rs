//! Tolerance-rectangle lookup of named locations in the onset stack.

use tracing::{debug, warn};

use crate::config::validate_tolerance;
use crate::error::AggregateError;
use crate::stack::OnsetStack;

/// A named point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedLocation {
    name: String,
    lat: f64,
    lon: f64,
}

impl NamedLocation {
    /// Creates a location from its name and target coordinates (degrees).
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Returns the location name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target latitude.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Returns the target longitude.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// The grid rectangle matched by a location: every latitude index and every
/// longitude index within the tolerance of the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationWindow {
    lat_indices: Vec<usize>,
    lon_indices: Vec<usize>,
}

impl LocationWindow {
    /// Resolves `location` against the grid coordinates.
    ///
    /// A coordinate matches when it lies in `[target - tolerance, target + tolerance]`.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::UnresolvableLocation`] if no latitude or no
    /// longitude matches.
    pub fn resolve(
        location: &NamedLocation,
        lats: &[f64],
        lons: &[f64],
        tolerance: f64,
    ) -> Result<Self, AggregateError> {
        let lat_indices = within(lats, location.lat, tolerance);
        let lon_indices = within(lons, location.lon, tolerance);
        if lat_indices.is_empty() || lon_indices.is_empty() {
            return Err(AggregateError::UnresolvableLocation {
                name: location.name.clone(),
                lat: location.lat,
                lon: location.lon,
                tolerance,
            });
        }
        Ok(Self {
            lat_indices,
            lon_indices,
        })
    }

    /// Matched latitude indices, ascending.
    pub fn lat_indices(&self) -> &[usize] {
        &self.lat_indices
    }

    /// Matched longitude indices, ascending.
    pub fn lon_indices(&self) -> &[usize] {
        &self.lon_indices
    }

    /// Per-year onset of the rectangle: the mean of its valid cells rounded
    /// to the nearest day, `None` for a year with no valid cell.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::DimensionMismatch`] if the rectangle reaches
    /// outside the stack's grid.
    pub fn sample(&self, stack: &OnsetStack) -> Result<Vec<Option<u16>>, AggregateError> {
        let (n_lat, n_lon) = stack.grid_shape();
        check_bounds("lat", &self.lat_indices, n_lat)?;
        check_bounds("lon", &self.lon_indices, n_lon)?;

        let series = stack
            .iter_years()
            .map(|(_, map)| {
                let (sum, count) = self
                    .lat_indices
                    .iter()
                    .flat_map(|&i| self.lon_indices.iter().map(move |&j| (i, j)))
                    .filter_map(|(i, j)| map[[i, j]])
                    .fold((0.0_f64, 0_u32), |(sum, n), day| (sum + f64::from(day), n + 1));
                // the mean of u16 days stays within u16
                (count > 0).then(|| (sum / f64::from(count)).round() as u16)
            })
            .collect();
        Ok(series)
    }
}

fn within(coords: &[f64], target: f64, tolerance: f64) -> Vec<usize> {
    coords
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v >= target - tolerance && v <= target + tolerance)
        .map(|(i, _)| i)
        .collect()
}

fn check_bounds(name: &str, indices: &[usize], len: usize) -> Result<(), AggregateError> {
    match indices.iter().max() {
        Some(&max) if max >= len => Err(AggregateError::DimensionMismatch {
            name: name.into(),
            expected: len,
            got: max + 1,
        }),
        _ => Ok(()),
    }
}

/// A resolved location with its per-year onset series.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSeries {
    location: NamedLocation,
    window: LocationWindow,
    values: Vec<Option<u16>>,
}

impl LocationSeries {
    /// The sampled location.
    pub fn location(&self) -> &NamedLocation {
        &self.location
    }

    /// The grid rectangle the location resolved to.
    pub fn window(&self) -> &LocationWindow {
        &self.window
    }

    /// One value per stack year, in stack order.
    pub fn values(&self) -> &[Option<u16>] {
        &self.values
    }
}

/// A location that matched no grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedLocation {
    name: String,
    error: AggregateError,
}

impl UnresolvedLocation {
    /// Name of the location.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Why it could not be resolved.
    pub fn error(&self) -> &AggregateError {
        &self.error
    }
}

/// Outcome of sampling a list of locations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationSampling {
    series: Vec<LocationSeries>,
    unresolved: Vec<UnresolvedLocation>,
}

impl LocationSampling {
    /// Resolved locations with their series, in input order.
    pub fn series(&self) -> &[LocationSeries] {
        &self.series
    }

    /// Locations that matched no grid cell, in input order.
    pub fn unresolved(&self) -> &[UnresolvedLocation] {
        &self.unresolved
    }

    /// Consumes the sampling, returning `(series, unresolved)`.
    pub fn into_parts(self) -> (Vec<LocationSeries>, Vec<UnresolvedLocation>) {
        (self.series, self.unresolved)
    }
}

/// Samples every location from the stack.
///
/// A location that cannot be resolved is logged and recorded in
/// [`LocationSampling::unresolved`]; the others are still sampled.
///
/// # Errors
///
/// - [`AggregateError::InvalidTolerance`] for a negative or non-finite tolerance.
/// - [`AggregateError::DimensionMismatch`] if `lats`/`lons` do not match the
///   stack's grid shape.
pub fn sample_locations(
    locations: &[NamedLocation],
    lats: &[f64],
    lons: &[f64],
    stack: &OnsetStack,
    tolerance: f64,
) -> Result<LocationSampling, AggregateError> {
    validate_tolerance(tolerance)?;
    let (n_lat, n_lon) = stack.grid_shape();
    if lats.len() != n_lat {
        return Err(AggregateError::DimensionMismatch {
            name: "lat".into(),
            expected: n_lat,
            got: lats.len(),
        });
    }
    if lons.len() != n_lon {
        return Err(AggregateError::DimensionMismatch {
            name: "lon".into(),
            expected: n_lon,
            got: lons.len(),
        });
    }

    let mut sampling = LocationSampling::default();
    for location in locations {
        match LocationWindow::resolve(location, lats, lons, tolerance) {
            Ok(window) => {
                let values = window.sample(stack)?;
                debug!(
                    name = location.name(),
                    n_cells = window.lat_indices.len() * window.lon_indices.len(),
                    "location sampled"
                );
                sampling.series.push(LocationSeries {
                    location: location.clone(),
                    window,
                    values,
                });
            }
            Err(error) => {
                warn!(name = location.name(), %error, "location not resolved");
                sampling.unresolved.push(UnresolvedLocation {
                    name: location.name.clone(),
                    error,
                });
            }
        }
    }
    Ok(sampling)
}
