//! Onset-day extraction from an AA curve.

use ndarray::{Array2, ArrayView1, ArrayView3, Axis, Zip};

use crate::error::AccumulationError;

/// Onset day per grid cell: 1-based day of the hydrological year, `None`
/// where the cell's AA is undefined.
pub type OnsetMap = Array2<Option<u16>>;

/// Returns the 1-based day at which each cell's AA first reaches its maximum.
///
/// Ties resolve to the earliest day. A column containing NaN yields `None`.
///
/// # Errors
///
/// Returns [`AccumulationError::WindowTooLong`] if a day index would not fit
/// in [`OnsetMap`]'s `u16`.
pub fn onset_days(aa: ArrayView3<'_, f64>) -> Result<OnsetMap, AccumulationError> {
    let n_days = aa.len_of(Axis(0));
    if n_days > usize::from(u16::MAX) {
        return Err(AccumulationError::WindowTooLong {
            n_days,
            max: u16::MAX,
        });
    }
    // idx + 1 <= n_days <= u16::MAX
    Ok(Zip::from(aa.lanes(Axis(0)))
        .map_collect(|column| leftmost_argmax(column).map(|idx| (idx + 1) as u16)))
}

fn leftmost_argmax(column: ArrayView1<'_, f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in column.iter().enumerate() {
        if v.is_nan() {
            return None;
        }
        match best {
            Some((_, max)) if v <= max => {}
            _ => best = Some((idx, v)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, array};

    #[test]
    fn argmax_plus_one() {
        let aa = array![[[0.0]], [[5.0]], [[2.0]]];
        assert_eq!(onset_days(aa.view()).unwrap()[[0, 0]], Some(2));
    }

    #[test]
    fn ties_take_first_day() {
        let aa = array![[[1.0]], [[3.0]], [[3.0]], [[0.0]]];
        assert_eq!(onset_days(aa.view()).unwrap()[[0, 0]], Some(2));
    }

    #[test]
    fn flat_curve_is_day_one() {
        let aa = Array3::<f64>::zeros((365, 2, 2));
        assert!(onset_days(aa.view()).unwrap().iter().all(|&d| d == Some(1)));
    }

    #[test]
    fn nan_column_is_none() {
        let mut aa = Array3::<f64>::zeros((5, 1, 2));
        aa[[2, 0, 0]] = f64::NAN;
        let onset = onset_days(aa.view()).unwrap();
        assert_eq!(onset[[0, 0]], None);
        assert_eq!(onset[[0, 1]], Some(1));
    }

    #[test]
    fn last_representable_day() {
        let n = usize::from(u16::MAX);
        let mut aa = Array3::<f64>::zeros((n, 1, 1));
        aa[[n - 1, 0, 0]] = 1.0;
        assert_eq!(onset_days(aa.view()).unwrap()[[0, 0]], Some(u16::MAX));
    }

    #[test]
    fn window_past_u16_rejected() {
        let aa = Array3::<f64>::zeros((70_000, 1, 1));
        assert_eq!(
            onset_days(aa.view()).unwrap_err(),
            AccumulationError::WindowTooLong {
                n_days: 70_000,
                max: u16::MAX
            }
        );
    }
}
