//! # onset-io
//!
//! Decode daily precipitation fields from NetCDF files into millimetre
//! arrays and write onset reports as JSON. Bridges external file formats
//! into the `ndarray`-based field consumed by onset detection.

mod error;
mod field;
mod netcdf_read;
mod reader;
mod report;
mod validate;

pub use error::IoError;
pub use field::{FieldDecoder, Grid, PrecipField};
pub use reader::{NetcdfDecoder, ReaderConfig, read_netcdf};
pub use report::{
    ConfigSummary, GridReport, LocationReport, OnsetReport, SkippedYear, UnresolvedReport,
    array2_rows, read_report, write_report,
};
