//! The decoded precipitation field and the decoder seam.

use chrono::NaiveDate;
use ndarray::{Array3, ArrayView3};

use crate::error::IoError;
use crate::validate::{validate_axis, validate_dates};

/// Latitude and longitude axes of a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    lats: Vec<f64>,
    lons: Vec<f64>,
}

impl Grid {
    /// Creates a grid from its two coordinate axes.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if either axis is empty, holds a
    /// non-finite value or is not strictly monotonic.
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Result<Self, IoError> {
        let mut c = validate_axis("latitude", &lats);
        c.extend(validate_axis("longitude", &lons));
        c.finish()?;
        Ok(Self { lats, lons })
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// `(n_lat, n_lon)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }
}

/// Daily precipitation in millimetres on `[time, lat, lon]`, missing data
/// as NaN.
///
/// Read-only once built: all accessors borrow.
#[derive(Debug, Clone)]
pub struct PrecipField {
    values: Array3<f64>,
    grid: Grid,
    dates: Vec<NaiveDate>,
}

impl PrecipField {
    /// Assembles a field and checks that every axis agrees.
    ///
    /// # Errors
    ///
    /// - [`IoError::DimensionMismatch`] if the array shape disagrees with
    ///   `dates` or `grid`.
    /// - [`IoError::Validation`] if `dates` is not strictly increasing.
    pub fn new(values: Array3<f64>, grid: Grid, dates: Vec<NaiveDate>) -> Result<Self, IoError> {
        let (n_time, n_lat, n_lon) = values.dim();
        let (grid_lat, grid_lon) = grid.shape();
        for (name, expected, got) in [
            ("time", dates.len(), n_time),
            ("lat", grid_lat, n_lat),
            ("lon", grid_lon, n_lon),
        ] {
            if expected != got {
                return Err(IoError::DimensionMismatch {
                    name: name.into(),
                    expected,
                    got,
                });
            }
        }
        validate_dates(&dates).finish()?;
        Ok(Self {
            values,
            grid,
            dates,
        })
    }

    /// The `[time, lat, lon]` values.
    pub fn values(&self) -> ArrayView3<'_, f64> {
        self.values.view()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// One date per time step.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn n_days(&self) -> usize {
        self.dates.len()
    }

    /// Share of values that are NaN, in `[0, 1]`.
    pub fn missing_fraction(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let n_missing = self.values.iter().filter(|v| v.is_nan()).count();
        n_missing as f64 / self.values.len() as f64
    }
}

/// Source of precipitation fields.
pub trait FieldDecoder {
    /// Decodes the named variable into a millimetre field.
    ///
    /// # Errors
    ///
    /// Implementations return [`IoError`] for any unreadable, missing or
    /// inconsistent input.
    fn decode(&self, field: &str) -> Result<PrecipField, IoError>;
}
