use std::path::PathBuf;

use serde::Deserialize;

/// Top-level onset configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OnsetToml {
    /// I/O settings.
    #[serde(default)]
    pub io: IoConfig,

    /// Detection and aggregation settings.
    #[serde(default)]
    pub onset: DetectToml,

    /// Named locations to sample.
    #[serde(default)]
    pub locations: Vec<LocationToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    #[serde(default = "default_precip_var")]
    pub precip_var: String,
    #[serde(default)]
    pub time_shift_hours: f64,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            precip_var: default_precip_var(),
            time_shift_hours: 0.0,
        }
    }
}

fn default_precip_var() -> String {
    "tp".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectToml {
    #[serde(default = "default_start_month")]
    pub start_month: u8,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_percentiles")]
    pub percentiles: [f64; 2],
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for DetectToml {
    fn default() -> Self {
        Self {
            start_month: default_start_month(),
            tolerance: default_tolerance(),
            percentiles: default_percentiles(),
            parallel: true,
        }
    }
}

fn default_start_month() -> u8 {
    7
}
fn default_tolerance() -> f64 {
    0.2
}
fn default_percentiles() -> [f64; 2] {
    [10.0, 90.0]
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationToml {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}
