//! Error types for the onset-accumulation crate.

/// Error type for all fallible operations in the onset-accumulation crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccumulationError {
    /// Returned when a hydrological-year window resolves to zero days.
    #[error("empty window: no day to accumulate over a {n_lat}x{n_lon} grid")]
    EmptyWindow {
        /// Latitude extent of the window.
        n_lat: usize,
        /// Longitude extent of the window.
        n_lon: usize,
    },

    /// Returned when a window is too long for its onset days to fit in `u16`.
    #[error("window of {n_days} days exceeds the {max}-day limit")]
    WindowTooLong {
        /// Length of the window.
        n_days: usize,
        /// Longest supported window.
        max: u16,
    },
}
