//! Integration tests for the JSON onset report.

use std::collections::BTreeMap;

use ndarray::array;
use onset_io::{
    ConfigSummary, GridReport, IoError, LocationReport, OnsetReport, SkippedYear,
    UnresolvedReport, array2_rows, read_report, write_report,
};
use tempfile::tempdir;

fn sample_report() -> OnsetReport {
    let mean = array![[Some(151.0), None], [Some(150.0), Some(149.0)]];
    let mut statistics = BTreeMap::new();
    statistics.insert("mean".to_string(), array2_rows(mean.view()));
    OnsetReport {
        config: ConfigSummary {
            input: "era5_angola.nc".into(),
            variable: "tp".into(),
            start_month: 7,
            tolerance: 0.2,
            percentiles: [10.0, 90.0],
            time_shift_hours: -24.0,
        },
        period: Some("2000-2001".into()),
        grid: GridReport {
            lats: vec![-9.0, -9.1],
            lons: vec![16.3, 16.4],
        },
        years: vec![2000, 2001],
        onsets: vec![
            array2_rows(array![[Some(201_u16), None], [Some(200), Some(198)]].view()),
            array2_rows(array![[Some(101_u16), None], [Some(100), Some(100)]].view()),
        ],
        statistics,
        locations: vec![LocationReport {
            name: "Malanje".into(),
            lat: -9.05,
            lon: 16.35,
            lat_indices: vec![0, 1],
            lon_indices: vec![0, 1],
            values: vec![Some(200), Some(100)],
        }],
        skipped_years: vec![SkippedYear {
            year: 2002,
            reason: "empty window".into(),
        }],
        unresolved_locations: vec![UnresolvedReport {
            name: "Offshore".into(),
            reason: "no grid cell".into(),
        }],
    }
}

#[test]
fn write_then_read_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    let report = sample_report();

    write_report(&path, &report).unwrap();
    assert_eq!(read_report(&path).unwrap(), report);
}

#[test]
fn json_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    write_report(&path, &sample_report()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    // pretty-printed
    assert!(text.contains("\n  \"config\""));
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["period"], "2000-2001");
    assert_eq!(json["onsets"][0][0], serde_json::json!([201, null]));
    assert_eq!(json["statistics"]["mean"][0][1], serde_json::Value::Null);
    assert_eq!(json["config"]["percentiles"], serde_json::json!([10.0, 90.0]));
}

#[test]
fn unwritable_path_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing_dir").join("report.json");
    let err = write_report(&path, &sample_report()).unwrap_err();
    assert!(matches!(err, IoError::Write { .. }));
}

#[test]
fn read_missing_report() {
    let dir = tempdir().unwrap();
    let err = read_report(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}

#[test]
fn unreadable_report_keeps_os_reason() {
    // a directory exists but cannot be read as a file
    let dir = tempdir().unwrap();
    let err = read_report(dir.path()).unwrap_err();
    match err {
        IoError::Read { path, reason } => {
            assert_eq!(path, dir.path());
            assert!(!reason.is_empty());
        }
        other => panic!("expected Read error, got {other:?}"),
    }
}
