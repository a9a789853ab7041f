//! Error types for onset-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the onset-io crate.
///
/// Covers missing files and variables, NetCDF library failures, malformed
/// time or unit metadata, field validation problems, and report output.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a time value or its metadata cannot be interpreted.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time parsing issue.
        reason: String,
    },

    /// Returned when a precipitation variable carries units that cannot be
    /// converted to millimetres.
    #[error("variable '{name}' has unsupported units '{units}'")]
    UnsupportedUnits {
        /// Name of the variable.
        name: String,
        /// Value of its `units` attribute.
        units: String,
    },

    /// Returned when the report cannot be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serde failure.
        reason: String,
    },

    /// Returned when an existing file cannot be read.
    #[error("cannot read {}: {reason}", path.display())]
    Read {
        /// Input path.
        path: PathBuf,
        /// Description of the OS failure.
        reason: String,
    },

    /// Returned when an output file cannot be created or written.
    #[error("cannot write {}: {reason}", path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Description of the OS failure.
        reason: String,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Serialization {
            reason: e.to_string(),
        }
    }
}
