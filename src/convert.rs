//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result};

use onset_aggregate::{NamedLocation, OnsetConfig};
use onset_io::ReaderConfig;

use crate::config::{DetectToml, IoConfig, LocationToml};

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoConfig) -> Result<ReaderConfig> {
    let cfg = ReaderConfig::default().with_time_shift_hours(io.time_shift_hours);
    cfg.validate().context("invalid [io] section")?;
    Ok(cfg)
}

/// Builds an [`OnsetConfig`] from the TOML onset section.
///
/// `start_month` overrides the configured month when given (CLI flag).
pub fn build_onset_config(onset: &DetectToml, start_month: Option<u8>) -> Result<OnsetConfig> {
    let [low, high] = onset.percentiles;
    let cfg = OnsetConfig::default()
        .with_start_month(start_month.unwrap_or(onset.start_month))
        .with_tolerance(onset.tolerance)
        .with_percentiles(low, high)
        .with_parallel(onset.parallel);
    cfg.validate().context("invalid [onset] section")?;
    Ok(cfg)
}

/// Converts the `[[locations]]` tables into [`NamedLocation`]s.
pub fn build_locations(locations: &[LocationToml]) -> Vec<NamedLocation> {
    locations
        .iter()
        .map(|l| NamedLocation::new(&l.name, l.lat, l.lon))
        .collect()
}
