//! Scalar statistics helpers for onset aggregation.
//!
//! Every reduction here works on plain `&[f64]` slices. Missing values are
//! filtered by the caller (see [`sorted_finite`]); none of these functions
//! skip NaN on their own.

/// Arithmetic mean of a slice. Returns `None` if empty.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let sum: f64 = data.iter().sum();
    Some(sum / data.len() as f64)
}

/// Collects the finite values of `data` in ascending order.
pub fn sorted_finite(data: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = data.into_iter().filter(|v| v.is_finite()).collect();
    values.sort_by(f64::total_cmp);
    values
}

/// Linear-interpolation quantile (R type 7, numpy's default `linear`).
///
/// **Expects pre-sorted input** (caller's responsibility). `p` is a
/// probability in `0.0..=1.0`.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Percentile (`0.0..=100.0`) of pre-sorted data, see [`quantile_type7`].
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    quantile_type7(sorted, pct / 100.0)
}
