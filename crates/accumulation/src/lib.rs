//! # onset-accumulation
//!
//! Liebmann's anomalous accumulation (AA) and wet-season onset detection for
//! one hydrological-year window of a gridded daily precipitation field.
//!
//! ```text
//! window [day, lat, lon] (mm, NaN = missing)
//!   ├─ anomalous_accumulation()   (anomaly.rs)  -> AA [day, lat, lon]
//!   └─ onset_days()               (detect.rs)   -> OnsetMap [lat, lon]
//! ```
//!
//! # Quick start
//!
//! ```
//! use ndarray::Array3;
//! use onset_accumulation::detect_onset;
//!
//! let mut window = Array3::<f64>::zeros((365, 2, 2));
//! window[[120, 0, 0]] = 40.0;
//! window[[120, 1, 1]] = 40.0;
//! window[[30, 0, 1]] = 40.0;
//! window[[30, 1, 0]] = 40.0;
//!
//! let onset = detect_onset(window.view()).unwrap();
//! assert_eq!(onset[[0, 0]], Some(121));
//! assert_eq!(onset[[0, 1]], Some(31));
//! ```

mod anomaly;
mod detect;
mod error;

use ndarray::ArrayView3;

pub use anomaly::anomalous_accumulation;
pub use detect::{OnsetMap, onset_days};
pub use error::AccumulationError;

/// Runs [`anomalous_accumulation`] then [`onset_days`] on one window.
///
/// # Errors
///
/// - [`AccumulationError::EmptyWindow`] if the window has no day.
/// - [`AccumulationError::WindowTooLong`] if the window has more than
///   `u16::MAX` days.
pub fn detect_onset(window: ArrayView3<'_, f64>) -> Result<OnsetMap, AccumulationError> {
    let aa = anomalous_accumulation(window)?;
    onset_days(aa.view())
}
