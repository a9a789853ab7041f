//! High-level NetCDF reader configuration and orchestration.

use std::path::{Path, PathBuf};

use ndarray::Array3;
use tracing::{debug, info};

use crate::error::IoError;
use crate::field::{FieldDecoder, Grid, PrecipField};
use crate::netcdf_read;
use crate::validate::ValidationCollector;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for decoding a precipitation field from NetCDF.
///
/// Use the builder methods (`with_*`) to customise coordinate aliases, the
/// time variable and the time shift. The [`Default`] implementation matches
/// ERA5-style files with CF time units.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Aliases to try when looking up latitude coordinates.
    lat_aliases: Vec<String>,
    /// Aliases to try when looking up longitude coordinates.
    lon_aliases: Vec<String>,
    /// NetCDF variable name for the time axis.
    time_var: String,
    /// Hours added to every time stamp before taking its date.
    time_shift_hours: f64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            lat_aliases: vec!["latitude".into(), "lat".into(), "y".into()],
            lon_aliases: vec!["longitude".into(), "lon".into(), "x".into()],
            time_var: "time".into(),
            time_shift_hours: 0.0,
        }
    }
}

impl ReaderConfig {
    /// Replace the latitude aliases.
    pub fn with_lat_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lat_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the longitude aliases.
    pub fn with_lon_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lon_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the time variable name.
    pub fn with_time_var(mut self, name: impl Into<String>) -> Self {
        self.time_var = name.into();
        self
    }

    /// Set the shift in hours applied to time stamps (`-24` for ERA5 daily
    /// accumulations stamped at the next midnight).
    pub fn with_time_shift_hours(mut self, hours: f64) -> Self {
        self.time_shift_hours = hours;
        self
    }

    pub fn time_shift_hours(&self) -> f64 {
        self.time_shift_hours
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every problem found.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut c = ValidationCollector::new();
        if self.lat_aliases.is_empty() {
            c.push("lat_aliases must not be empty");
        }
        if self.lon_aliases.is_empty() {
            c.push("lon_aliases must not be empty");
        }
        if self.time_var.is_empty() {
            c.push("time_var must not be empty");
        }
        if !self.time_shift_hours.is_finite() {
            c.push(format!(
                "time_shift_hours must be finite, got {}",
                self.time_shift_hours
            ));
        }
        c.finish()
    }
}

// ---------------------------------------------------------------------------
// NetcdfDecoder
// ---------------------------------------------------------------------------

/// [`FieldDecoder`] over one NetCDF file.
#[derive(Debug, Clone)]
pub struct NetcdfDecoder {
    path: PathBuf,
    config: ReaderConfig,
}

impl NetcdfDecoder {
    pub fn new(path: impl Into<PathBuf>, config: ReaderConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FieldDecoder for NetcdfDecoder {
    fn decode(&self, field: &str) -> Result<PrecipField, IoError> {
        read_netcdf(&self.path, field, &self.config)
    }
}

// ---------------------------------------------------------------------------
// read_netcdf
// ---------------------------------------------------------------------------

/// Read a daily precipitation field from a NetCDF file.
///
/// The variable must be 3-D `(time, lat, lon)`. Values are unpacked
/// (`scale_factor`, `add_offset`), fill and missing values become NaN, and
/// the result is converted to millimetres from its `units` attribute.
///
/// # Errors
///
/// Returns [`IoError`] on a missing file or variable, dimension mismatches,
/// unsupported units or calendars, or invalid coordinates.
pub fn read_netcdf(path: &Path, field: &str, config: &ReaderConfig) -> Result<PrecipField, IoError> {
    config.validate()?;

    let file = netcdf_read::open_file(path)?;

    // -- Coordinates --------------------------------------------------------

    let lat_alias_refs: Vec<&str> = config.lat_aliases.iter().map(String::as_str).collect();
    let lon_alias_refs: Vec<&str> = config.lon_aliases.iter().map(String::as_str).collect();

    let lats = netcdf_read::read_1d_f64(&file, &lat_alias_refs, path)?;
    let lons = netcdf_read::read_1d_f64(&file, &lon_alias_refs, path)?;

    // -- Time ---------------------------------------------------------------

    let time_offsets = netcdf_read::read_1d_f64(&file, &[&config.time_var], path)?;
    let units = netcdf_read::read_time_units(&file, &config.time_var, path)?;
    let dates =
        netcdf_read::time_offsets_to_dates(&units, &time_offsets, config.time_shift_hours)?;

    // -- 3-D data -----------------------------------------------------------

    let mut raw = netcdf_read::read_3d_unpacked(&file, field, path)?;
    let [nt, ny, nx] = raw.shape;
    for (name, expected, got) in [
        ("time", dates.len(), nt),
        ("lat", lats.len(), ny),
        ("lon", lons.len(), nx),
    ] {
        if expected != got {
            return Err(IoError::DimensionMismatch {
                name: format!("{field} {name}"),
                expected,
                got,
            });
        }
    }
    netcdf_read::convert_to_mm(&mut raw.data, raw.units.as_deref(), field)?;

    let values = Array3::from_shape_vec((nt, ny, nx), raw.data).map_err(|e| {
        IoError::Validation {
            count: 1,
            details: format!("cannot shape '{field}' as ({nt}, {ny}, {nx}): {e}"),
        }
    })?;

    let grid = Grid::new(lats, lons)?;
    let decoded = PrecipField::new(values, grid, dates)?;

    debug!(
        missing_fraction = decoded.missing_fraction(),
        "decoded field values"
    );
    if let (Some(first), Some(last)) = (decoded.dates().first(), decoded.dates().last()) {
        info!(
            variable = field,
            n_days = nt,
            n_lat = ny,
            n_lon = nx,
            %first,
            %last,
            "read precipitation field"
        );
    }
    Ok(decoded)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
