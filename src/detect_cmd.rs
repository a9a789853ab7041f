//! Detect command: decode the field, build the onset stack, aggregate and
//! write the JSON report.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use onset_aggregate::{
    LocationSampling, OnsetConfig, OnsetRun, StatisticMaps, compute_statistics, detect_onsets,
    sample_locations,
};
use onset_io::{
    ConfigSummary, FieldDecoder, GridReport, LocationReport, NetcdfDecoder, OnsetReport,
    PrecipField, SkippedYear, UnresolvedReport, array2_rows, write_report,
};

use crate::cli::DetectArgs;
use crate::config::OnsetToml;
use crate::convert;

/// Run the detection pipeline.
pub fn run(args: DetectArgs) -> Result<()> {
    let _cmd = info_span!("detect").entered();

    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: OnsetToml = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let input = config
        .io
        .input
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no input path: set [io].input in config"))?;
    let output = args
        .output
        .clone()
        .or_else(|| config.io.output.clone())
        .unwrap_or_else(|| input.with_extension("onset.json"));

    let reader_cfg = convert::build_reader_config(&config.io)?;
    let onset_cfg = convert::build_onset_config(&config.onset, args.start_month)?;
    let locations = convert::build_locations(&config.locations);

    // 2. Decode the precipitation field
    info!(path = %input.display(), variable = %config.io.precip_var, "reading precipitation");
    let field = NetcdfDecoder::new(input, reader_cfg)
        .decode(&config.io.precip_var)
        .with_context(|| format!("failed to decode NetCDF: {}", input.display()))?;

    // 3. Onset stack
    let run = detect_onsets(field.values(), field.dates(), &onset_cfg)
        .context("onset detection failed")?;
    if run.stack().is_empty() {
        bail!(
            "no complete hydrological year (start month {}) between {} and {}",
            onset_cfg.start_month(),
            field.dates().first().map_or("-".to_string(), ToString::to_string),
            field.dates().last().map_or("-".to_string(), ToString::to_string),
        );
    }
    // 4. Skipped years
    for failure in run.failures() {
        warn!(year = failure.year, error = %failure.error, "year excluded from statistics");
    }

    // 5. Statistics
    let maps = compute_statistics(run.stack(), &onset_cfg).context("statistics failed")?;

    // 6. Locations
    let grid = field.grid();
    let sampling = sample_locations(
        &locations,
        grid.lats(),
        grid.lons(),
        run.stack(),
        onset_cfg.tolerance(),
    )
    .context("location sampling failed")?;
    for unresolved in sampling.unresolved() {
        warn!(name = unresolved.name(), error = %unresolved.error(), "location skipped");
    }

    // 7. Report
    let summary = ConfigSummary {
        input: input.display().to_string(),
        variable: config.io.precip_var.clone(),
        start_month: onset_cfg.start_month(),
        tolerance: onset_cfg.tolerance(),
        percentiles: onset_cfg.percentiles().into(),
        time_shift_hours: config.io.time_shift_hours,
    };
    let report = build_report(summary, &field, &run, &maps, &sampling);
    write_report(&output, &report)
        .with_context(|| format!("failed to write report: {}", output.display()))?;

    // 8. Study period
    info!(
        period = report.period.as_deref().unwrap_or("-"),
        n_years = report.years.len(),
        n_skipped = report.skipped_years.len(),
        output = %output.display(),
        "onset detection complete"
    );
    Ok(())
}

/// Assembles the serializable report from the run products.
fn build_report(
    config: ConfigSummary,
    field: &PrecipField,
    run: &OnsetRun,
    maps: &StatisticMaps,
    sampling: &LocationSampling,
) -> OnsetReport {
    let stack = run.stack();
    let statistics: BTreeMap<String, Vec<Vec<Option<f64>>>> = maps
        .iter()
        .map(|map| (map.statistic().name(), array2_rows(map.values().view())))
        .collect();

    OnsetReport {
        config,
        period: stack.period_label(),
        grid: GridReport {
            lats: field.grid().lats().to_vec(),
            lons: field.grid().lons().to_vec(),
        },
        years: stack.years().to_vec(),
        onsets: stack.iter_years().map(|(_, map)| array2_rows(map)).collect(),
        statistics,
        locations: sampling
            .series()
            .iter()
            .map(|s| LocationReport {
                name: s.location().name().to_string(),
                lat: s.location().lat(),
                lon: s.location().lon(),
                lat_indices: s.window().lat_indices().to_vec(),
                lon_indices: s.window().lon_indices().to_vec(),
                values: s.values().to_vec(),
            })
            .collect(),
        skipped_years: run
            .failures()
            .iter()
            .map(|f| SkippedYear {
                year: f.year,
                reason: f.error.to_string(),
            })
            .collect(),
        unresolved_locations: sampling
            .unresolved()
            .iter()
            .map(|u| UnresolvedReport {
                name: u.name().to_string(),
                reason: u.error().to_string(),
            })
            .collect(),
    }
}
