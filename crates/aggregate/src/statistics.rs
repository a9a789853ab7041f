//! Multi-year statistic maps over the onset stack.

use ndarray::{Array2, ArrayView1, Axis, Zip};
use onset_stats::{mean, percentile, sorted_finite};

use crate::config::OnsetConfig;
use crate::error::AggregateError;
use crate::stack::OnsetStack;

/// One of the five reductions over the year axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    /// Arithmetic mean, truncated to a whole day.
    Mean,
    /// Earliest onset day.
    Min,
    /// Latest onset day.
    Max,
    /// Linear-interpolation percentile (`0.0..=100.0`).
    Percentile(f64),
}

impl Statistic {
    /// Short name used as a key in reports: `mean`, `min`, `max`, `p10`, ...
    pub fn name(&self) -> String {
        match self {
            Statistic::Mean => "mean".into(),
            Statistic::Min => "min".into(),
            Statistic::Max => "max".into(),
            Statistic::Percentile(p) => format!("p{p}"),
        }
    }
}

/// A statistic evaluated at every grid cell. `None` marks cells with no
/// valid onset in any year.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticMap {
    statistic: Statistic,
    values: Array2<Option<f64>>,
}

impl StatisticMap {
    /// Which reduction produced this map.
    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    /// Per-cell values `[lat, lon]`.
    pub fn values(&self) -> &Array2<Option<f64>> {
        &self.values
    }
}

/// The five statistic maps of one onset stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticMaps {
    mean: StatisticMap,
    min: StatisticMap,
    max: StatisticMap,
    low: StatisticMap,
    high: StatisticMap,
}

impl StatisticMaps {
    pub fn mean(&self) -> &StatisticMap {
        &self.mean
    }

    pub fn min(&self) -> &StatisticMap {
        &self.min
    }

    pub fn max(&self) -> &StatisticMap {
        &self.max
    }

    /// The low-percentile map (10th by default).
    pub fn low_percentile(&self) -> &StatisticMap {
        &self.low
    }

    /// The high-percentile map (90th by default).
    pub fn high_percentile(&self) -> &StatisticMap {
        &self.high
    }

    /// All five maps in report order: mean, min, max, low, high.
    pub fn iter(&self) -> impl Iterator<Item = &StatisticMap> {
        [&self.mean, &self.min, &self.max, &self.low, &self.high].into_iter()
    }
}

#[derive(Debug, Clone, Copy)]
struct CellSummary {
    mean: f64,
    min: f64,
    max: f64,
    low: f64,
    high: f64,
}

/// Reduces the onset stack to its five statistic maps.
///
/// Each cell is reduced over its valid years only; missing years of one cell
/// never affect another. The percentile pair comes from `config`.
///
/// # Errors
///
/// - [`AggregateError::EmptyStack`] if the stack holds no year.
/// - [`AggregateError::InvalidPercentiles`] if the configured pair is invalid.
pub fn compute_statistics(
    stack: &OnsetStack,
    config: &OnsetConfig,
) -> Result<StatisticMaps, AggregateError> {
    if stack.is_empty() {
        return Err(AggregateError::EmptyStack);
    }
    config.validate()?;
    let (low_pct, high_pct) = config.percentiles();

    let summaries: Array2<Option<CellSummary>> = Zip::from(stack.data().lanes(Axis(0)))
        .map_collect(|years| summarize(years, low_pct, high_pct));

    let project = |statistic: Statistic, pick: fn(&CellSummary) -> f64| StatisticMap {
        statistic,
        values: summaries.map(|cell| cell.as_ref().map(pick)),
    };

    Ok(StatisticMaps {
        mean: project(Statistic::Mean, |c| c.mean),
        min: project(Statistic::Min, |c| c.min),
        max: project(Statistic::Max, |c| c.max),
        low: project(Statistic::Percentile(low_pct), |c| c.low),
        high: project(Statistic::Percentile(high_pct), |c| c.high),
    })
}

fn summarize(years: ArrayView1<'_, Option<u16>>, low_pct: f64, high_pct: f64) -> Option<CellSummary> {
    let sorted = sorted_finite(years.iter().flatten().map(|&day| f64::from(day)));
    let (&min, &max) = (sorted.first()?, sorted.last()?);
    Some(CellSummary {
        mean: mean(&sorted)?.trunc(),
        min,
        max,
        low: percentile(&sorted, low_pct),
        high: percentile(&sorted, high_pct),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array3;

    fn stack_of(columns: &[&[Option<u16>]]) -> OnsetStack {
        // one cell per column, laid out along lon
        let n_years = columns[0].len();
        let data = Array3::from_shape_fn((n_years, 1, columns.len()), |(y, _, x)| columns[x][y]);
        let years = (0..n_years as i32).map(|y| 2000 + y).collect();
        OnsetStack::new(years, data).unwrap()
    }

    #[test]
    fn names() {
        assert_eq!(Statistic::Mean.name(), "mean");
        assert_eq!(Statistic::Min.name(), "min");
        assert_eq!(Statistic::Max.name(), "max");
        assert_eq!(Statistic::Percentile(10.0).name(), "p10");
        assert_eq!(Statistic::Percentile(12.5).name(), "p12.5");
    }

    #[test]
    fn empty_stack_is_error() {
        let stack = OnsetStack::new(Vec::new(), Array3::from_elem((0, 2, 2), None)).unwrap();
        assert_eq!(
            compute_statistics(&stack, &OnsetConfig::default()).unwrap_err(),
            AggregateError::EmptyStack
        );
    }

    #[test]
    fn mean_truncates() {
        // (100 + 101) / 2 = 100.5 -> 100
        let stack = stack_of(&[&[Some(100), Some(101)]]);
        let maps = compute_statistics(&stack, &OnsetConfig::default()).unwrap();
        assert_eq!(maps.mean().values()[[0, 0]], Some(100.0));
    }

    #[test]
    fn percentiles_interpolate() {
        let stack = stack_of(&[&[Some(10), Some(20), Some(30), Some(40), Some(50)]]);
        let maps = compute_statistics(&stack, &OnsetConfig::default()).unwrap();
        // h = 4 * 0.1 = 0.4 -> 10 + 0.4 * 10
        assert_relative_eq!(maps.low_percentile().values()[[0, 0]].unwrap(), 14.0, epsilon = 1e-9);
        assert_relative_eq!(maps.high_percentile().values()[[0, 0]].unwrap(), 46.0, epsilon = 1e-9);
        assert_eq!(maps.min().values()[[0, 0]], Some(10.0));
        assert_eq!(maps.max().values()[[0, 0]], Some(50.0));
        assert_eq!(maps.mean().values()[[0, 0]], Some(30.0));
    }

    #[test]
    fn missing_years_skipped_per_cell() {
        let stack = stack_of(&[
            &[Some(200), None, Some(100)],
            &[Some(50), Some(60), Some(70)],
        ]);
        let maps = compute_statistics(&stack, &OnsetConfig::default()).unwrap();
        assert_eq!(maps.mean().values()[[0, 0]], Some(150.0));
        assert_eq!(maps.min().values()[[0, 0]], Some(100.0));
        assert_eq!(maps.mean().values()[[0, 1]], Some(60.0));
    }

    #[test]
    fn all_missing_cell_is_none_everywhere() {
        let stack = stack_of(&[&[None, None], &[Some(3), Some(5)]]);
        let maps = compute_statistics(&stack, &OnsetConfig::default()).unwrap();
        for map in maps.iter() {
            assert_eq!(map.values()[[0, 0]], None, "{}", map.statistic().name());
            assert!(map.values()[[0, 1]].is_some());
        }
    }

    #[test]
    fn custom_percentiles_label_maps() {
        let stack = stack_of(&[&[Some(1), Some(2)]]);
        let config = OnsetConfig::default().with_percentiles(25.0, 75.0);
        let maps = compute_statistics(&stack, &config).unwrap();
        let names: Vec<String> = maps.iter().map(|m| m.statistic().name()).collect();
        assert_eq!(names, vec!["mean", "min", "max", "p25", "p75"]);
    }

    #[test]
    fn equal_percentiles_rejected() {
        let stack = stack_of(&[&[Some(1), Some(2)]]);
        let config = OnsetConfig::default().with_percentiles(50.0, 50.0);
        assert_eq!(
            compute_statistics(&stack, &config).unwrap_err(),
            AggregateError::InvalidPercentiles {
                low: 50.0,
                high: 50.0
            }
        );
    }

    #[test]
    fn map_names_are_distinct() {
        let stack = stack_of(&[&[Some(1), Some(2), Some(3)]]);
        for (low, high) in [(10.0, 90.0), (49.9, 50.0), (0.0, 100.0)] {
            let config = OnsetConfig::default().with_percentiles(low, high);
            let maps = compute_statistics(&stack, &config).unwrap();
            let names: std::collections::BTreeSet<String> =
                maps.iter().map(|m| m.statistic().name()).collect();
            assert_eq!(names.len(), 5, "{low}/{high}");
        }
    }
}
