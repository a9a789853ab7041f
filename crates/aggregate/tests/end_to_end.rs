use approx::assert_relative_eq;
use chrono::NaiveDate;
use ndarray::{Array3, Axis, s};
use onset_aggregate::{
    NamedLocation, OnsetConfig, compute_statistics, detect_onsets, sample_locations,
};
use onset_calendar::daily_sequence;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 7, 1).unwrap()
}

/// 730 days over a 3x3 grid, zero except two 50 mm impulses.
fn two_impulse_field() -> Array3<f64> {
    let mut precip = Array3::<f64>::zeros((730, 3, 3));
    precip.index_axis_mut(Axis(0), 200).fill(50.0);
    precip.index_axis_mut(Axis(0), 365 + 100).fill(50.0);
    precip
}

#[test]
fn two_year_impulse_scenario() {
    let precip = two_impulse_field();
    let dates = daily_sequence(start(), 730);
    let config = OnsetConfig::default();

    let run = detect_onsets(precip.view(), &dates, &config).unwrap();
    assert!(run.failures().is_empty());
    let stack = run.stack();
    assert_eq!(stack.data().dim(), (2, 3, 3));
    assert_eq!(stack.years(), &[2000, 2001]);
    assert_eq!(stack.period_label().as_deref(), Some("2000-2001"));
    for lane in stack.data().lanes(Axis(0)) {
        assert_eq!(lane.to_vec(), vec![Some(201), Some(101)]);
    }

    let maps = compute_statistics(stack, &config).unwrap();
    assert!(maps.mean().values().iter().all(|&v| v == Some(151.0)));
    assert!(maps.min().values().iter().all(|&v| v == Some(101.0)));
    assert!(maps.max().values().iter().all(|&v| v == Some(201.0)));
    for &v in maps.low_percentile().values() {
        assert_relative_eq!(v.unwrap(), 111.0, epsilon = 1e-9);
    }
    for &v in maps.high_percentile().values() {
        assert_relative_eq!(v.unwrap(), 191.0, epsilon = 1e-9);
    }
}

#[test]
fn serial_run_matches_parallel() {
    let precip = two_impulse_field();
    let dates = daily_sequence(start(), 730);
    let par = detect_onsets(precip.view(), &dates, &OnsetConfig::default()).unwrap();
    let ser = detect_onsets(
        precip.view(),
        &dates,
        &OnsetConfig::default().with_parallel(false),
    )
    .unwrap();
    assert_eq!(par.stack(), ser.stack());
}

#[test]
fn single_year_statistics_collapse() {
    let mut precip = Array3::<f64>::zeros((365, 2, 2));
    precip.slice_mut(s![40, 0, ..]).fill(20.0);
    precip.slice_mut(s![300, 1, ..]).fill(20.0);
    let dates = daily_sequence(start(), 365);
    let config = OnsetConfig::default();

    let run = detect_onsets(precip.view(), &dates, &config).unwrap();
    assert_eq!(run.stack().years(), &[2000]);
    let maps = compute_statistics(run.stack(), &config).unwrap();
    for map in maps.iter() {
        assert_eq!(map.values()[[0, 0]], Some(41.0), "{}", map.statistic().name());
        assert_eq!(map.values()[[1, 1]], Some(301.0), "{}", map.statistic().name());
    }
}

#[test]
fn multi_year_ordering_holds_everywhere() {
    // three years with different impulse days per cell
    let n_days = 365 * 3;
    let dates = daily_sequence(start(), n_days);
    let mut precip = Array3::<f64>::zeros((n_days, 2, 3));
    let offsets = [0, 365, 730];
    for (k, &offset) in offsets.iter().enumerate() {
        for i in 0..2 {
            for j in 0..3 {
                let day = offset + 20 + 37 * (k + 1) * (i + j + 1) % 300;
                precip[[day, i, j]] = 25.0;
            }
        }
    }
    let config = OnsetConfig::default();
    let run = detect_onsets(precip.view(), &dates, &config).unwrap();
    assert_eq!(run.stack().years(), &[2000, 2001, 2002]);

    let maps = compute_statistics(run.stack(), &config).unwrap();
    let cells = maps.mean().values().indexed_iter().map(|(idx, _)| idx);
    for idx in cells {
        let mean = maps.mean().values()[idx].unwrap();
        let min = maps.min().values()[idx].unwrap();
        let max = maps.max().values()[idx].unwrap();
        let low = maps.low_percentile().values()[idx].unwrap();
        let high = maps.high_percentile().values()[idx].unwrap();
        assert!(min <= mean && mean <= max, "cell {idx:?}");
        assert!(min <= low && low <= high && high <= max, "cell {idx:?}");
    }
}

#[test]
fn missing_cell_propagates_to_statistics() {
    let mut precip = two_impulse_field();
    precip[[30, 1, 2]] = f64::NAN;
    let dates = daily_sequence(start(), 730);
    let config = OnsetConfig::default();

    let run = detect_onsets(precip.view(), &dates, &config).unwrap();
    let stack = run.stack();
    assert_eq!(stack.data()[[0, 1, 2]], None);
    assert_eq!(stack.data()[[1, 1, 2]], Some(101));
    assert_eq!(stack.data()[[0, 0, 0]], Some(201));

    let maps = compute_statistics(stack, &config).unwrap();
    assert_eq!(maps.mean().values()[[1, 2]], Some(101.0));
    assert_eq!(maps.mean().values()[[0, 0]], Some(151.0));
}

#[test]
fn no_complete_year_is_empty() {
    let precip = Array3::<f64>::zeros((300, 1, 1));
    let dates = daily_sequence(start(), 300);
    let config = OnsetConfig::default();
    let run = detect_onsets(precip.view(), &dates, &config).unwrap();
    assert!(run.stack().is_empty());
    assert!(compute_statistics(run.stack(), &config).is_err());
}

#[test]
fn locations_follow_stack() {
    let precip = two_impulse_field();
    let dates = daily_sequence(start(), 730);
    let config = OnsetConfig::default();
    let run = detect_onsets(precip.view(), &dates, &config).unwrap();

    let lats = [-9.0, -8.0, -7.0];
    let lons = [16.0, 17.0, 18.0];
    let locations = [
        NamedLocation::new("Malanje", -8.0, 17.0),
        NamedLocation::new("Offshore", 1000.0, 1000.0),
    ];
    let sampling =
        sample_locations(&locations, &lats, &lons, run.stack(), config.tolerance()).unwrap();
    assert_eq!(sampling.series().len(), 1);
    assert_eq!(sampling.series()[0].values(), &[Some(201), Some(101)]);
    assert_eq!(sampling.unresolved()[0].name(), "Offshore");
}
