//! Mathematical utilities for case-by-case regression
//!
//! Normal distribution functions needed by bootstrap intervals, simple
//! moments, and interpolated order statistics.

/// Distribution-related mathematical functions
pub mod distributions {
    /// Standard normal distribution utilities
    pub mod normal {
        use statrs::function::erf::{erf, erf_inv};
        use std::f64::consts::SQRT_2;

        /// Cumulative distribution function of the standard normal distribution
        pub fn cdf(x: f64) -> f64 {
            if x == f64::NEG_INFINITY {
                return 0.0;
            }
            if x == f64::INFINITY {
                return 1.0;
            }
            0.5 * (1.0 + erf(x / SQRT_2))
        }

        /// Inverse cumulative distribution function (percent point function)
        /// of the standard normal distribution
        ///
        /// Returns `-inf` for `p <= 0` and `+inf` for `p >= 1`.
        pub fn ppf(p: f64) -> f64 {
            if p <= 0.0 {
                return f64::NEG_INFINITY;
            }
            if p >= 1.0 {
                return f64::INFINITY;
            }
            if (p - 0.5).abs() < 1e-15 {
                return 0.0;
            }
            SQRT_2 * erf_inv(2.0 * p - 1.0)
        }

        /// Alias for ppf that matches common naming
        #[inline]
        pub fn quantile(p: f64) -> f64 {
            ppf(p)
        }

    }
}

/// Sample moments
pub mod moments {
    /// Arithmetic mean, `None` for an empty slice
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Sample variance with the `n - 1` denominator, `None` below two values
    pub fn sample_variance(values: &[f64]) -> Option<f64> {
        if values.len() < 2 {
            return None;
        }
        let m = mean(values)?;
        let ss = values.iter().map(|&x| (x - m) * (x - m)).sum::<f64>();
        Some(ss / (values.len() - 1) as f64)
    }

    /// Sample standard deviation with the `n - 1` denominator
    pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
        sample_variance(values).map(f64::sqrt)
    }
}

/// Quantile of already sorted data by linear interpolation between order
/// statistics at rank `(n - 1) * p` (Hyndman-Fan type 7)
///
/// `p` is clamped to `[0, 1]`, so the result always lies within
/// `[sorted[0], sorted[n - 1]]`. Returns `None` for empty input or NaN `p`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || p.is_nan() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Sort a copy of the values, ordering NaN as equal
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

#[cfg(test)]
mod tests {
    use super::moments::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moments() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data).unwrap(), 5.0);
        assert_relative_eq!(sample_variance(&data).unwrap(), 32.0 / 7.0);
        assert_relative_eq!(sample_std_dev(&data).unwrap(), (32.0f64 / 7.0).sqrt());

        assert!(mean(&[]).is_none());
        assert!(sample_variance(&[1.0]).is_none());
    }

    #[test]
    fn test_quantile_sorted_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(5.0));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(3.0));
        assert_relative_eq!(quantile_sorted(&sorted, 0.1).unwrap(), 1.4);
        assert_relative_eq!(quantile_sorted(&sorted, 0.975).unwrap(), 4.9);

        // Out-of-range probabilities are clamped
        assert_eq!(quantile_sorted(&sorted, -0.2), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 1.3), Some(5.0));

        assert!(quantile_sorted(&[], 0.5).is_none());
        assert!(quantile_sorted(&sorted, f64::NAN).is_none());
        assert_eq!(quantile_sorted(&[7.5], 0.3), Some(7.5));
    }

    #[test]
    fn test_sorted_copy() {
        assert_eq!(sorted_copy(&[3.0, 1.0, 2.0]), vec![1.0, 2.0, 3.0]);
    }
}
