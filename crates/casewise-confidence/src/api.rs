//! High-level API for case bootstrap intervals
//!
//! Convenience functions for bootstrapping pooled means without building a
//! [`CaseBootstrap`] by hand.

use crate::{
    bootstrap::{BootstrapResult, CaseBootstrap},
    bootstrap_methods::IntervalMethod,
    ConfidenceLevel,
};
use casewise_core::{execution::auto_engine, Error, Result};

/// Default number of bootstrap resamples
pub const DEFAULT_RESAMPLES: usize = 4000;

/// Fewer resamples for quick looks
pub const FAST_RESAMPLES: usize = 1000;

/// Bootstrap the pooled mean of every term
///
/// `samples` pairs each term name with its per-case estimates. Uses the
/// best available execution engine. With `seed = None` a seed is drawn and
/// reported in the result. `n_resamples = 0` is rejected with
/// `InvalidInput`.
///
/// # Example
/// ```rust
/// use casewise_confidence::{api::bootstrap_pooled_means, ConfidenceLevel, IntervalMethod};
///
/// let intercepts = [0.9, 1.2, 1.0, 0.8, 1.1];
/// let slopes = [2.0, 2.3, 1.9, 2.1, 1.7];
/// let samples: Vec<(&str, &[f64])> = vec![("(Intercept)", &intercepts[..]), ("vals", &slopes[..])];
///
/// let result = bootstrap_pooled_means(
///     &samples,
///     IntervalMethod::BCa,
///     ConfidenceLevel::NINETY_FIVE,
///     500,
///     Some(42),
/// )
/// .unwrap();
/// assert_eq!(result.terms.len(), 2);
/// assert_eq!(result.seed, 42);
/// ```
pub fn bootstrap_pooled_means(
    samples: &[(&str, &[f64])],
    method: IntervalMethod,
    confidence_level: ConfidenceLevel,
    n_resamples: usize,
    seed: Option<u64>,
) -> Result<BootstrapResult> {
    if n_resamples == 0 {
        return Err(Error::InvalidInput(
            "n_resamples must be a positive integer".to_string(),
        ));
    }
    let mut bootstrap = CaseBootstrap::new(auto_engine(), method)
        .with_resamples(n_resamples)
        .with_confidence_level(confidence_level);
    if let Some(seed) = seed {
        bootstrap = bootstrap.with_seed(seed);
    }
    bootstrap.run(samples)
}
