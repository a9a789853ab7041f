//! Error types for the onset-calendar crate.

/// Error type for all fallible operations in the onset-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a date axis is not strictly increasing.
    #[error("dates not strictly increasing at index {index}")]
    UnorderedDates {
        /// Index of the first date that is not after its predecessor.
        index: usize,
    },
}
