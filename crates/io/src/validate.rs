//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering multiple validation errors
//! into a single [`IoError::Validation`], plus helpers that check the
//! invariants of a decoded precipitation field.

use chrono::NaiveDate;

use crate::error::IoError;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Moves every message of `other` into `self`.
    pub(crate) fn extend(&mut self, other: ValidationCollector) {
        self.errors.extend(other.errors);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(IoError::Validation { count, details })` otherwise.
    ///
    /// The `details` string joins all messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Check that a coordinate axis is non-empty, finite and strictly monotonic
/// (ascending or descending).
pub(crate) fn validate_axis(name: &str, coords: &[f64]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    if coords.is_empty() {
        c.push(format!("{name} is empty"));
        return c;
    }
    if let Some(i) = coords.iter().position(|v| !v.is_finite()) {
        c.push(format!("{name} has a non-finite value at index {i}"));
        return c;
    }
    let ascending = coords.windows(2).all(|w| w[1] > w[0]);
    let descending = coords.windows(2).all(|w| w[1] < w[0]);
    if !ascending && !descending {
        c.push(format!("{name} is not strictly monotonic"));
    }

    c
}

/// Check that a date axis is strictly increasing.
pub(crate) fn validate_dates(dates: &[NaiveDate]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    if let Some(i) = dates.windows(2).position(|w| w[1] <= w[0]) {
        c.push(format!(
            "dates not strictly increasing at index {}: {} after {}",
            i + 1,
            dates[i + 1],
            dates[i]
        ));
    }

    c
}
