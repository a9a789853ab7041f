//! # onset-calendar
//!
//! Hydrological-year arithmetic on the Gregorian calendar.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["(year, month)"] -->|"hydro_year()"| B["year label Y"]
//!     C["&[NaiveDate]"] -->|"segment_water_years()"| D["Vec of HydroYearWindow"]
//!     E["NaiveDate"] -->|"daily_sequence()"| C
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use onset_calendar::{daily_sequence, hydro_year, segment_water_years};
//!
//! // July-start hydrological year: Jan 2001 belongs to year 2000/2001.
//! assert_eq!(hydro_year(2001, 1, 7).unwrap(), 2000);
//!
//! let start = NaiveDate::from_ymd_opt(2000, 7, 1).unwrap();
//! let dates = daily_sequence(start, 730);
//! let windows = segment_water_years(&dates, 7).unwrap();
//! assert_eq!(windows.len(), 2);
//! assert_eq!(windows[0].year(), 2000);
//! assert_eq!(windows[0].len(), 365);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `water_year` | Year labels and window segmentation |
//! | `sequence` | Daily date sequence generation |
//! | `error` | Error types |

mod error;
mod sequence;
mod water_year;

pub use error::CalendarError;
pub use sequence::daily_sequence;
pub use water_year::{HydroYearWindow, hydro_year, segment_water_years};
