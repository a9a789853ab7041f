//! Anomalous accumulation curve.

use ndarray::{Array3, ArrayView3, Axis, Zip};

use crate::error::AccumulationError;

/// Computes the anomalous accumulation of one hydrological-year window.
///
/// For every cell, `AA[d] = sum_{i<=d} (P[i] - mean(P))` where the mean is
/// taken over the day axis (axis 0). The output has the shape of the input.
///
/// A cell with any non-finite value has an undefined mean; its whole AA
/// column is NaN.
///
/// # Errors
///
/// Returns [`AccumulationError::EmptyWindow`] if the window has no day.
pub fn anomalous_accumulation(
    window: ArrayView3<'_, f64>,
) -> Result<Array3<f64>, AccumulationError> {
    let (n_days, n_lat, n_lon) = window.dim();
    if n_days == 0 {
        return Err(AccumulationError::EmptyWindow { n_lat, n_lon });
    }

    let mut aa = Array3::<f64>::zeros(window.raw_dim());
    Zip::from(aa.lanes_mut(Axis(0)))
        .and(window.lanes(Axis(0)))
        .for_each(|mut out, daily| {
            if daily.iter().any(|v| !v.is_finite()) {
                out.fill(f64::NAN);
                return;
            }
            let mean = daily.sum() / n_days as f64;
            let mut running = 0.0;
            for (o, &p) in out.iter_mut().zip(daily.iter()) {
                running += p - mean;
                *o = running;
            }
        });
    Ok(aa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array3, array};

    #[test]
    fn empty_window_is_error() {
        let window = Array3::<f64>::zeros((0, 2, 3));
        assert_eq!(
            anomalous_accumulation(window.view()).unwrap_err(),
            AccumulationError::EmptyWindow { n_lat: 2, n_lon: 3 }
        );
    }

    #[test]
    fn constant_window_is_all_zero() {
        let window = Array3::<f64>::from_elem((366, 2, 2), 2.0);
        let aa = anomalous_accumulation(window.view()).unwrap();
        assert!(aa.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn known_series() {
        // P = [0, 3, 0, 1], mean = 1 -> anomaly = [-1, 2, -1, 0]
        let window = array![[[0.0]], [[3.0]], [[0.0]], [[1.0]]];
        let aa = anomalous_accumulation(window.view()).unwrap();
        let column: Vec<f64> = aa.iter().copied().collect();
        for (got, want) in column.iter().zip([-1.0, 1.0, 0.0, 0.0]) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn closes_at_zero() {
        let window = Array3::from_shape_fn((365, 1, 2), |(d, _, x)| ((d * 7 + x) % 11) as f64);
        let aa = anomalous_accumulation(window.view()).unwrap();
        assert_abs_diff_eq!(aa[[364, 0, 0]], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(aa[[364, 0, 1]], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn missing_value_poisons_only_its_cell() {
        let mut window = Array3::<f64>::from_elem((10, 1, 2), 1.0);
        window[[4, 0, 1]] = f64::NAN;
        let aa = anomalous_accumulation(window.view()).unwrap();
        assert!(aa.index_axis(ndarray::Axis(2), 1).iter().all(|v| v.is_nan()));
        assert!(aa.index_axis(ndarray::Axis(2), 0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn shape_preserved() {
        let window = Array3::<f64>::ones((31, 4, 5));
        let aa = anomalous_accumulation(window.view()).unwrap();
        assert_eq!(aa.dim(), (31, 4, 5));
    }
}
