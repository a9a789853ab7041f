//! Low-level NetCDF extraction helpers.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use netcdf::AttributeValue;
use tracing::warn;

use crate::error::IoError;

/// Calendars whose dates map one-to-one onto chrono's proleptic Gregorian
/// calendar (for dates after 1582).
const GREGORIAN_CALENDARS: [&str; 3] = ["standard", "gregorian", "proleptic_gregorian"];

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable, trying each alias in order.
///
/// Returns the data from the first alias that matches. If none match,
/// returns [`IoError::MissingVariable`] with the first alias as the name.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<f64>, IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return Ok(var.get_values::<f64, _>(..)?);
        }
    }

    let name = aliases.first().copied().unwrap_or("unknown");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// A 3-D variable after unpacking, still in its source units.
pub(crate) struct RawField {
    pub(crate) data: Vec<f64>,
    pub(crate) shape: [usize; 3],
    pub(crate) units: Option<String>,
}

/// Read a 3-D variable, unpack it and return the flattened `[nt, ny, nx]`
/// data with its `units` attribute.
pub(crate) fn read_3d_unpacked(
    file: &netcdf::File,
    var_name: &str,
    path: &Path,
) -> Result<RawField, IoError> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| IoError::MissingVariable {
            name: var_name.to_string(),
            path: path.to_path_buf(),
        })?;

    let dims = var.dimensions();
    if dims.len() != 3 {
        return Err(IoError::DimensionMismatch {
            name: format!("{var_name} dimensions"),
            expected: 3,
            got: dims.len(),
        });
    }
    let shape = [dims[0].len(), dims[1].len(), dims[2].len()];

    let packing = Packing::from_variable(&var);
    let mut data = var.get_values::<f64, _>(..)?;
    packing.unpack_in_place(&mut data);

    Ok(RawField {
        data,
        shape,
        units: attr_string(&var, "units"),
    })
}

/// CF packing attributes of one variable.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Packing {
    /// Raw values treated as missing (`_FillValue`, `missing_value`).
    missing: Vec<f64>,
    scale_factor: f64,
    add_offset: f64,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            missing: Vec::new(),
            scale_factor: 1.0,
            add_offset: 0.0,
        }
    }
}

impl Packing {
    fn from_variable(var: &netcdf::Variable<'_>) -> Self {
        let missing = ["_FillValue", "missing_value"]
            .into_iter()
            .filter_map(|name| attr_f64(var, name))
            .collect();
        Self {
            missing,
            scale_factor: attr_f64(var, "scale_factor").unwrap_or(1.0),
            add_offset: attr_f64(var, "add_offset").unwrap_or(0.0),
        }
    }

    /// Missing or non-finite raw values become NaN; the rest are scaled.
    pub(crate) fn unpack(&self, raw: f64) -> f64 {
        if !raw.is_finite() || self.missing.contains(&raw) {
            f64::NAN
        } else {
            raw * self.scale_factor + self.add_offset
        }
    }

    fn unpack_in_place(&self, data: &mut [f64]) {
        for v in data.iter_mut() {
            *v = self.unpack(*v);
        }
    }
}

/// Numeric attribute as `f64`. Array attributes yield their first element.
fn attr_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    let value = var.attribute_value(name)?.ok()?;
    match value {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Ushort(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Uint(v) => Some(f64::from(v)),
        AttributeValue::Schar(v) => Some(f64::from(v)),
        AttributeValue::Uchar(v) => Some(f64::from(v)),
        AttributeValue::Longlong(v) => Some(v as f64),
        AttributeValue::Ulonglong(v) => Some(v as f64),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Shorts(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Ints(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

fn attr_string(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Convert unpacked precipitation values to millimetres in place.
///
/// Metres (ERA5 `tp`) are scaled by 1000. Depth units already in
/// millimetres are kept. A variable without `units` is assumed to be in
/// millimetres.
pub(crate) fn convert_to_mm(
    data: &mut [f64],
    units: Option<&str>,
    var_name: &str,
) -> Result<(), IoError> {
    let Some(units) = units else {
        warn!(variable = var_name, "no 'units' attribute, assuming mm");
        return Ok(());
    };
    match units.trim() {
        "m" => {
            for v in data.iter_mut() {
                *v *= 1000.0;
            }
            Ok(())
        }
        "mm" | "mm/day" | "mm d-1" | "kg m-2" | "kg m**-2" => Ok(()),
        other => Err(IoError::UnsupportedUnits {
            name: var_name.to_string(),
            units: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Parsed CF time units, e.g. `"hours since 1900-01-01 00:00:00.0"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimeUnits {
    /// Length of one time step in seconds.
    step_seconds: f64,
    epoch: NaiveDateTime,
}

impl TimeUnits {
    pub(crate) fn parse(units: &str) -> Result<Self, IoError> {
        let invalid = || IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        };

        let parts: Vec<&str> = units.trim().splitn(3, ' ').collect();
        if parts.len() < 3 || parts[1] != "since" {
            return Err(invalid());
        }
        let step_seconds = match parts[0] {
            "days" | "day" => 86_400.0,
            "hours" | "hour" => 3_600.0,
            "minutes" | "minute" => 60.0,
            "seconds" | "second" => 1.0,
            _ => return Err(invalid()),
        };
        let epoch = parse_epoch(parts[2].trim()).ok_or_else(|| IoError::InvalidTime {
            reason: format!("failed to parse reference date in '{units}'"),
        })?;
        Ok(Self {
            step_seconds,
            epoch,
        })
    }

    /// Date of `offset` steps after the epoch, shifted by `shift_hours`.
    pub(crate) fn to_date(&self, offset: f64, shift_hours: f64) -> Result<NaiveDate, IoError> {
        let seconds = offset * self.step_seconds + shift_hours * 3_600.0;
        if !seconds.is_finite() {
            return Err(IoError::InvalidTime {
                reason: format!("non-finite time offset {offset}"),
            });
        }
        // rounding to whole seconds absorbs float noise in hour offsets
        let delta = TimeDelta::try_seconds(seconds.round() as i64).ok_or_else(|| {
            IoError::InvalidTime {
                reason: format!("time offset {offset} out of range"),
            }
        })?;
        self.epoch
            .checked_add_signed(delta)
            .map(|dt| dt.date())
            .ok_or_else(|| IoError::InvalidTime {
                reason: format!("date overflow adding {offset} steps to {}", self.epoch),
            })
    }
}

fn parse_epoch(s: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    // drop a trailing zone designator; only UTC is meaningful here
    let s = s
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .trim_end_matches(" +00:00");
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Read the `units` and optional `calendar` attributes of a time variable.
///
/// The calendar defaults to `standard`; any non-Gregorian calendar is
/// rejected with [`IoError::InvalidTime`].
pub(crate) fn read_time_units(
    file: &netcdf::File,
    time_var: &str,
    path: &Path,
) -> Result<TimeUnits, IoError> {
    let var = file
        .variable(time_var)
        .ok_or_else(|| IoError::MissingVariable {
            name: time_var.to_string(),
            path: path.to_path_buf(),
        })?;

    let units = attr_string(&var, "units").ok_or_else(|| IoError::InvalidTime {
        reason: format!("time variable '{time_var}' has no string 'units' attribute"),
    })?;

    let calendar = attr_string(&var, "calendar").unwrap_or_else(|| "standard".to_string());
    if !GREGORIAN_CALENDARS.contains(&calendar.to_lowercase().as_str()) {
        return Err(IoError::InvalidTime {
            reason: format!("unsupported calendar '{calendar}'"),
        });
    }

    TimeUnits::parse(&units)
}

/// Convert time offsets into calendar dates.
pub(crate) fn time_offsets_to_dates(
    units: &TimeUnits,
    offsets: &[f64],
    shift_hours: f64,
) -> Result<Vec<NaiveDate>, IoError> {
    offsets
        .iter()
        .map(|&offset| units.to_date(offset, shift_hours))
        .collect()
}
