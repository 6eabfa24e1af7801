//! Bootstrap method implementations
//!
//! This module provides the methods for constructing confidence intervals
//! from a bootstrap distribution of pooled means.

use crate::{bootstrap::BootstrapMethod, jackknife, ConfidenceInterval, ConfidenceLevel};
use casewise_core::{
    math::{distributions::normal, quantile_sorted, sorted_copy},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Read an interpolated order statistic, reporting NaN positions as degenerate
fn bound_at(sorted: &[f64], position: f64) -> Result<f64> {
    quantile_sorted(sorted, position).ok_or_else(|| {
        Error::degenerate_bootstrap(format!("percentile position {position} is undefined"))
    })
}

/// Percentile bootstrap method
///
/// Uses the empirical percentiles of the bootstrap distribution to construct
/// the confidence interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileBootstrap;

impl BootstrapMethod for PercentileBootstrap {
    fn calculate_interval(
        &self,
        replicates: &[f64],
        _sample: &[f64],
        original_estimate: f64,
        level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval> {
        if replicates.is_empty() {
            return Err(Error::InvalidInput("No bootstrap estimates".to_string()));
        }

        let sorted = sorted_copy(replicates);
        let tail = level.tail_probability();

        Ok(ConfidenceInterval::new(
            bound_at(&sorted, tail)?,
            bound_at(&sorted, 1.0 - tail)?,
            original_estimate,
            level.value(),
        ))
    }

    fn name(&self) -> &'static str {
        "Percentile Bootstrap"
    }
}

/// BCa (bias-corrected and accelerated) bootstrap method
///
/// Corrects the percentile positions for median bias of the bootstrap
/// distribution (`z0`) and for skewness through the jackknife acceleration
/// constant (`a`) of the original case values.
#[derive(Debug, Clone, Copy, Default)]
pub struct BCaBootstrap;

impl BCaBootstrap {
    /// Bias-correction constant `Φ⁻¹(#{t* < θ̂} / N)`
    ///
    /// A proportion of exactly 0 or 1 is moved half a replicate inwards,
    /// so a small bootstrap never yields an infinite correction. NaN for no
    /// replicates.
    pub fn bias_correction(replicates: &[f64], original_estimate: f64) -> f64 {
        if replicates.is_empty() {
            return f64::NAN;
        }
        let n = replicates.len() as f64;
        let count_less = replicates
            .iter()
            .filter(|&&x| x < original_estimate)
            .count() as f64;
        let half_step = 0.5 / n;
        let proportion = (count_less / n).clamp(half_step, 1.0 - half_step);

        debug!(
            "Bias correction: {} estimates < original (proportion: {:.4})",
            count_less, proportion
        );

        normal::quantile(proportion)
    }

    /// Adjusted percentile position for the normal quantile `z`
    fn adjusted_position(z0: f64, a: f64, z: f64) -> Result<f64> {
        let shifted = z0 + z;
        let denom = 1.0 - a * shifted;
        if denom <= 0.0 {
            return Err(Error::degenerate_bootstrap(format!(
                "acceleration {a:.4} folds the percentile transform (1 - a(z0 + z) = {denom:.4})"
            )));
        }
        Ok(normal::cdf(z0 + shifted / denom))
    }
}

impl BootstrapMethod for BCaBootstrap {
    #[instrument(skip(self, replicates, sample), fields(n_replicates = replicates.len(), n_cases = sample.len()))]
    fn calculate_interval(
        &self,
        replicates: &[f64],
        sample: &[f64],
        original_estimate: f64,
        level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval> {
        if replicates.is_empty() {
            return Err(Error::InvalidInput("No bootstrap estimates".to_string()));
        }

        let a = jackknife::acceleration(sample)?;
        let z0 = Self::bias_correction(replicates, original_estimate);

        debug!("BCa parameters: z0={:.4}, a={:.4}", z0, a);

        let tail = level.tail_probability();
        let alpha1 = Self::adjusted_position(z0, a, normal::quantile(tail))?;
        let alpha2 = Self::adjusted_position(z0, a, normal::quantile(1.0 - tail))?;

        debug!("Adjusted percentiles: α1={:.4}, α2={:.4}", alpha1, alpha2);

        if alpha1 > alpha2 {
            return Err(Error::degenerate_bootstrap(format!(
                "adjusted percentiles are inverted ({alpha1:.4} > {alpha2:.4})"
            )));
        }

        let sorted = sorted_copy(replicates);

        Ok(ConfidenceInterval::new(
            bound_at(&sorted, alpha1)?,
            bound_at(&sorted, alpha2)?,
            original_estimate,
            level.value(),
        ))
    }

    fn name(&self) -> &'static str {
        "BCa Bootstrap"
    }
}

/// Interval method selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntervalMethod {
    /// Bias-corrected and accelerated
    #[default]
    BCa,
    /// Plain percentile
    Percentile,
}

impl BootstrapMethod for IntervalMethod {
    fn calculate_interval(
        &self,
        replicates: &[f64],
        sample: &[f64],
        original_estimate: f64,
        level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval> {
        match self {
            IntervalMethod::BCa => {
                BCaBootstrap.calculate_interval(replicates, sample, original_estimate, level)
            }
            IntervalMethod::Percentile => {
                PercentileBootstrap.calculate_interval(replicates, sample, original_estimate, level)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            IntervalMethod::BCa => BCaBootstrap.name(),
            IntervalMethod::Percentile => PercentileBootstrap.name(),
        }
    }
}
