use num_traits::Float;
use std::cmp::Ordering;

/// Compute the `q`-th quantile of a list of numbers using linear interpolation
/// between the closest ranks. The position of the quantile in the ascending
/// sorted list is `q * (n - 1)`; this matches the default method of numpy and
/// pandas.
///
/// # Inputs
/// - `items`: values, in any order. NaN values are ignored.
/// - `q`: the quantile in `[0, 1]`.
///
/// # Outputs
/// - `Option<T>`: `None` when there are no non-NaN items.
///
/// # Panics
/// - If `q` is outside `[0, 1]`.
///
/// # Example
/// ```rust
/// use qc_stats::quantile;
/// let items: [f64; 5] = [0.9, 0.5, 0.7, 0.6, 0.8];
/// assert!((quantile(&items, 0.2).unwrap() - 0.58).abs() < 1e-12);
/// assert_eq!(quantile(&items, 0.5), Some(0.7));
/// assert_eq!(quantile::<f64>(&[], 0.5), None);
/// ```
pub fn quantile<T: Float>(items: &[T], q: f64) -> Option<T> {
    assert!(
        (0.0..=1.0).contains(&q),
        "quantile must be within [0, 1], got {q}"
    );
    let sorted = sorted_finite(items);
    interpolate(&sorted, q)
}

/// Compute several quantiles at once, sorting the input only one time.
/// Returns `None` when there are no non-NaN items.
pub fn quantiles<T: Float>(items: &[T], qs: &[f64]) -> Option<Vec<T>> {
    let sorted = sorted_finite(items);
    qs.iter().map(|&q| interpolate(&sorted, q)).collect()
}

fn sorted_finite<T: Float>(items: &[T]) -> Vec<T> {
    let mut sorted: Vec<T> = items.iter().copied().filter(|x| !x.is_nan()).collect();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

fn interpolate<T: Float>(sorted: &[T], q: f64) -> Option<T> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = T::from(pos - lo as f64).unwrap_or_else(T::zero);
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
