//! # onset-aggregate
//!
//! Turns a gridded daily precipitation field into a stack of per-year
//! wet-season onset maps, then reduces that stack to multi-year statistic
//! maps and per-location time series.
//!
//! # Architecture
//!
//! ```text
//! detect_onsets()                         (pipeline.rs)
//!   ├─ segment_water_years()              (onset-calendar)
//!   └─ build_onset_stack()                (stack.rs, rayon over years)
//!        └─ detect_onset()                (onset-accumulation)
//! compute_statistics()                    (statistics.rs)
//! sample_locations()                      (location.rs)
//! ```
//!
//! # Quick start
//!
//! ```
//! use chrono::NaiveDate;
//! use ndarray::Array3;
//! use onset_aggregate::{OnsetConfig, compute_statistics, detect_onsets};
//! use onset_calendar::daily_sequence;
//!
//! let dates = daily_sequence(NaiveDate::from_ymd_opt(2000, 7, 1).unwrap(), 730);
//! let mut precip = Array3::<f64>::zeros((730, 3, 3));
//! precip.index_axis_mut(ndarray::Axis(0), 200).fill(50.0);
//! precip.index_axis_mut(ndarray::Axis(0), 365 + 100).fill(50.0);
//!
//! let config = OnsetConfig::default();
//! let run = detect_onsets(precip.view(), &dates, &config).unwrap();
//! assert_eq!(run.stack().years(), &[2000, 2001]);
//!
//! let maps = compute_statistics(run.stack(), &config).unwrap();
//! assert!(maps.mean().values().iter().all(|&v| v == Some(151.0)));
//! ```

pub mod config;
pub mod error;
pub mod location;
pub mod pipeline;
pub mod stack;
pub mod statistics;

pub use config::OnsetConfig;
pub use error::AggregateError;
pub use location::{
    LocationSampling, LocationSeries, LocationWindow, NamedLocation, UnresolvedLocation,
    sample_locations,
};
pub use pipeline::detect_onsets;
pub use stack::{OnsetRun, OnsetStack, YearFailure, build_onset_stack};
pub use statistics::{Statistic, StatisticMap, StatisticMaps, compute_statistics};
