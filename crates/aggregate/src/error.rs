//! Error types for the onset-aggregate crate.

use onset_accumulation::AccumulationError;
use onset_calendar::CalendarError;

/// Error type for all fallible operations in the onset-aggregate crate.
///
/// Variants scoped to a single year or location are collected by the
/// pipeline as warnings; the rest abort the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    /// Calendar error (invalid start month, unordered dates).
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Accumulation error (empty window).
    #[error(transparent)]
    Accumulation(#[from] AccumulationError),

    /// Returned when two axes that must agree have different lengths.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a window references a time step past the field.
    #[error("window {year} references time index {index} but the field has {n_steps} steps")]
    WindowOutOfRange {
        /// Year label of the offending window.
        year: i32,
        /// First out-of-range index.
        index: usize,
        /// Number of time steps in the field.
        n_steps: usize,
    },

    /// Returned when statistics are requested over a stack with no year.
    #[error("onset stack holds no year")]
    EmptyStack,

    /// Returned when the location tolerance is negative or non-finite.
    #[error("invalid tolerance: {tolerance} (must be finite and >= 0)")]
    InvalidTolerance {
        /// The rejected tolerance in degrees.
        tolerance: f64,
    },

    /// Returned when the percentile pair is out of range, inverted or equal.
    #[error("invalid percentiles: low {low}, high {high} (need 0 <= low < high <= 100)")]
    InvalidPercentiles {
        /// Requested low percentile.
        low: f64,
        /// Requested high percentile.
        high: f64,
    },

    /// Returned when no grid row or no grid column lies within tolerance.
    #[error("location '{name}' ({lat}, {lon}) matches no grid cell within {tolerance} degrees")]
    UnresolvableLocation {
        /// Location name.
        name: String,
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lon: f64,
        /// Tolerance used for the lookup.
        tolerance: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_dimension_mismatch() {
        let err = AggregateError::DimensionMismatch {
            name: "time".into(),
            expected: 730,
            got: 729,
        };
        assert_eq!(
            err.to_string(),
            "dimension 'time' mismatch: expected 730, got 729"
        );
    }

    #[test]
    fn display_window_out_of_range() {
        let err = AggregateError::WindowOutOfRange {
            year: 1990,
            index: 800,
            n_steps: 730,
        };
        assert_eq!(
            err.to_string(),
            "window 1990 references time index 800 but the field has 730 steps"
        );
    }

    #[test]
    fn display_empty_stack() {
        assert_eq!(AggregateError::EmptyStack.to_string(), "onset stack holds no year");
    }

    #[test]
    fn display_invalid_percentiles() {
        let err = AggregateError::InvalidPercentiles {
            low: 90.0,
            high: 10.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid percentiles: low 90, high 10 (need 0 <= low < high <= 100)"
        );
    }

    #[test]
    fn display_unresolvable_location() {
        let err = AggregateError::UnresolvableLocation {
            name: "Huambo".into(),
            lat: -12.77,
            lon: 15.73,
            tolerance: 0.2,
        };
        assert_eq!(
            err.to_string(),
            "location 'Huambo' (-12.77, 15.73) matches no grid cell within 0.2 degrees"
        );
    }

    #[test]
    fn calendar_error_transparent() {
        let err = AggregateError::from(CalendarError::InvalidMonth { month: 13 });
        assert_eq!(err.to_string(), "invalid month: 13 (must be 1..=12)");
    }

    #[test]
    fn accumulation_error_transparent() {
        let err = AggregateError::from(AccumulationError::EmptyWindow { n_lat: 1, n_lon: 2 });
        assert!(matches!(err, AggregateError::Accumulation(_)));
        assert!(err.to_string().starts_with("empty window"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<AggregateError>();
    }
}
