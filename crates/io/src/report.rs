//! JSON report of an onset run.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IoError;

/// Everything a renderer needs to draw onset maps and location series.
///
/// Missing cells and values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnsetReport {
    pub config: ConfigSummary,
    /// `"first-last"` processed year labels.
    pub period: Option<String>,
    pub grid: GridReport,
    /// Hydrological-year labels, in stack order.
    pub years: Vec<i32>,
    /// Onset day per year, `[year][lat][lon]`.
    pub onsets: Vec<Vec<Vec<Option<u16>>>>,
    /// Statistic maps `[lat][lon]` keyed `mean`, `min`, `max`, `p{low}`, `p{high}`.
    pub statistics: BTreeMap<String, Vec<Vec<Option<f64>>>>,
    pub locations: Vec<LocationReport>,
    pub skipped_years: Vec<SkippedYear>,
    pub unresolved_locations: Vec<UnresolvedReport>,
}

/// Settings the report was produced with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub input: String,
    pub variable: String,
    pub start_month: u8,
    pub tolerance: f64,
    pub percentiles: [f64; 2],
    pub time_shift_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridReport {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

/// Per-year onset series of one named location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Grid indices averaged for this location.
    pub lat_indices: Vec<usize>,
    pub lon_indices: Vec<usize>,
    /// One value per entry of [`OnsetReport::years`].
    pub values: Vec<Option<u16>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedYear {
    pub year: i32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedReport {
    pub name: String,
    pub reason: String,
}

/// Rows of a 2-D array as nested vectors, the layout used by the report.
pub fn array2_rows<T: Clone>(array: ArrayView2<'_, T>) -> Vec<Vec<T>> {
    array.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// Write `report` to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`IoError::Write`] if the file cannot be created or flushed, or
/// [`IoError::Serialization`] if serialization fails.
pub fn write_report(path: &Path, report: &OnsetReport) -> Result<(), IoError> {
    let write_err = |e: std::io::Error| IoError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n").map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    info!(
        path = %path.display(),
        n_years = report.years.len(),
        n_locations = report.locations.len(),
        "wrote onset report"
    );
    Ok(())
}

/// Read a report previously written by [`write_report`].
///
/// # Errors
///
/// - [`IoError::FileNotFound`] if `path` does not exist.
/// - [`IoError::Read`] if it exists but cannot be read.
/// - [`IoError::Serialization`] if it is not a valid report.
pub fn read_report(path: &Path) -> Result<OnsetReport, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(serde_json::from_str(&text)?)
}
