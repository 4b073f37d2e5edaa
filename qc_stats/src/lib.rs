//! qc_stats
#![deny(missing_docs)]

mod quantile;
pub use quantile::{quantile, quantiles};

use num_traits::Float;

/// Compute the arithmetic mean. Returns NaN on an empty input, and NaN if any
/// of the values is NaN.
///
/// # Example
/// ```rust
/// use qc_stats::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert!(mean::<f64>(&[]).is_nan());
/// ```
pub fn mean<T: Float>(items: &[T]) -> T {
    if items.is_empty() {
        return T::nan();
    }
    let sum = items.iter().fold(T::zero(), |acc, &x| acc + x);
    sum / T::from(items.len()).unwrap_or_else(T::nan)
}

/// Compute the standard deviation with `ddof` delta degrees of freedom.
/// `ddof = 0` is the population standard deviation, `ddof = 1` the sample
/// standard deviation. Returns NaN when there are not more than `ddof` items.
///
/// # Example
/// ```rust
/// use qc_stats::std_dev;
/// let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert_eq!(std_dev(&xs, 0), 2.0);
/// assert!(std_dev(&[1.0_f64], 1).is_nan());
/// ```
pub fn std_dev<T: Float>(items: &[T], ddof: usize) -> T {
    if items.len() <= ddof {
        return T::nan();
    }
    let m = mean(items);
    let ss = items
        .iter()
        .fold(T::zero(), |acc, &x| acc + (x - m) * (x - m));
    (ss / T::from(items.len() - ddof).unwrap_or_else(T::nan)).sqrt()
}

/// Minimum and maximum of the non-NaN values, `None` if there are none.
pub fn min_max<T: Float>(items: &[T]) -> Option<(T, T)> {
    items
        .iter()
        .filter(|x| !x.is_nan())
        .fold(None, |acc, &x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert!((mean(&[0.5, 0.6, 0.7, 0.8, 0.9]) - 0.7).abs() < 1e-12);
        assert!(mean(&[1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_std_dev() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((std_dev(&xs, 0) - 1.118_033_988_749_895).abs() < 1e-12);
        assert!((std_dev(&xs, 1) - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert_eq!(std_dev(&[3.0], 0), 0.0);
        assert!(std_dev::<f64>(&[], 0).is_nan());
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[0.3, f64::NAN, 0.1, 0.9]), Some((0.1, 0.9)));
        assert_eq!(min_max::<f64>(&[f64::NAN]), None);
        assert_eq!(min_max::<f64>(&[]), None);
    }
}
