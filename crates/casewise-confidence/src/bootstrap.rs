//! Case-level bootstrap of pooled means
//!
//! This module resamples cases, not rows: each case contributes one
//! already-fitted estimate per term, and every replicate is the mean of M
//! estimates drawn with replacement from the M cases. Each term gets its
//! own random stream derived from one seed, so the replicates do not depend
//! on how terms are scheduled across threads.

use crate::{api::DEFAULT_RESAMPLES, ConfidenceInterval, ConfidenceLevel};
use casewise_core::{
    execution::ExecutionEngine,
    math::moments::{mean, sample_std_dev},
    CancellationToken, Error, Result,
};
use rand::distributions::{Distribution, Uniform};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// Bootstrap method for calculating confidence intervals
///
/// This trait defines how to construct a confidence interval from
/// bootstrap replicates. Different methods (percentile, BCa)
/// implement this trait.
pub trait BootstrapMethod: Clone + Send + Sync {
    /// Calculate confidence interval from bootstrap distribution
    ///
    /// * `replicates` - resample statistics
    /// * `sample` - the original case values the replicates were drawn from
    /// * `original_estimate` - the statistic on the original sample
    fn calculate_interval(
        &self,
        replicates: &[f64],
        sample: &[f64],
        original_estimate: f64,
        level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval>;

    /// Method name for documentation
    fn name(&self) -> &'static str;
}

/// Bootstrap summary of one term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermBootstrap {
    pub term: String,
    /// Resample statistics in draw order
    pub replicates: Vec<f64>,
    /// Mean of the replicates
    pub mean: f64,
    /// Sample standard deviation of the replicates (0 for a single replicate)
    pub std_error: f64,
    pub interval: ConfidenceInterval,
}

/// Result of bootstrapping every term
#[derive(Debug, Clone)]
pub struct BootstrapResult {
    pub terms: Vec<TermBootstrap>,
    /// Number of bootstrap resamples performed per term
    pub n_resamples: usize,
    /// Seed the per-term streams were derived from
    pub seed: u64,
    /// Time taken for bootstrap
    pub bootstrap_time_ms: Option<u64>,
}

/// Case bootstrap engine
///
/// Terms are independent and are fanned out over the execution engine.
#[derive(Clone)]
pub struct CaseBootstrap<E, M> {
    engine: E,
    method: M,
    n_resamples: usize,
    confidence_level: ConfidenceLevel,
    seed: Option<u64>,
    cancellation: CancellationToken,
}

impl<E, M> CaseBootstrap<E, M>
where
    E: ExecutionEngine,
    M: BootstrapMethod,
{
    /// Create a new bootstrap engine
    pub fn new(engine: E, method: M) -> Self {
        Self {
            engine,
            method,
            n_resamples: DEFAULT_RESAMPLES,
            confidence_level: ConfidenceLevel::NINETY_FIVE,
            seed: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Set the number of bootstrap resamples
    ///
    /// # Panics
    /// Panics if `n_resamples` is zero
    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        assert!(n_resamples > 0, "Number of resamples must be positive");
        self.n_resamples = n_resamples;
        self
    }

    /// Set the confidence level
    pub fn with_confidence_level(mut self, confidence_level: ConfidenceLevel) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check this token between replicates
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn n_resamples(&self) -> usize {
        self.n_resamples
    }

    pub fn method(&self) -> &M {
        &self.method
    }

    /// Random stream for the term at `term_index`
    ///
    /// Streams of one seed never overlap, so a term's replicates depend only
    /// on the seed and the term's position.
    pub fn term_rng(seed: u64, term_index: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(term_index as u64);
        rng
    }

    /// Draw `n_resamples` resample means from `values`
    ///
    /// Each replicate draws `values.len()` indices uniformly with
    /// replacement and records the mean of the selected values.
    /// Cancellation is checked before every replicate.
    pub fn resample_means<R: Rng + ?Sized>(&self, values: &[f64], rng: &mut R) -> Result<Vec<f64>> {
        if values.is_empty() {
            return Err(Error::degenerate_bootstrap("no case estimates to resample"));
        }

        let m = values.len();
        let dist = Uniform::new(0, m);
        let mut replicates = Vec::with_capacity(self.n_resamples);

        for _ in 0..self.n_resamples {
            self.cancellation.check()?;
            let sum: f64 = (0..m).map(|_| values[dist.sample(rng)]).sum();
            replicates.push(sum / m as f64);
        }

        Ok(replicates)
    }

    /// Bootstrap the mean of one term's case values
    ///
    /// Fails with `DegenerateBootstrap` naming `term` when fewer than two
    /// cases contribute or all case values are identical.
    pub fn bootstrap_term<R: Rng + ?Sized>(
        &self,
        term: &str,
        values: &[f64],
        rng: &mut R,
    ) -> Result<TermBootstrap> {
        if values.len() < 2 {
            return Err(Error::DegenerateBootstrap {
                term: term.to_string(),
                reason: format!("at least two case estimates are required, got {}", values.len()),
            });
        }
        if values.iter().all(|&v| v == values[0]) {
            return Err(Error::DegenerateBootstrap {
                term: term.to_string(),
                reason: format!("all {} case estimates equal {}", values.len(), values[0]),
            });
        }

        let estimate = mean(values).ok_or_else(|| Error::degenerate_bootstrap("empty sample"))?;
        let replicates = self.resample_means(values, rng).map_err(|e| e.with_term(term))?;

        let boot_mean = mean(&replicates).unwrap_or(estimate);
        let std_error = sample_std_dev(&replicates).unwrap_or(0.0);

        let interval = self
            .method
            .calculate_interval(&replicates, values, estimate, self.confidence_level)
            .map_err(|e| e.with_term(term))?;

        trace!(
            term,
            estimate,
            boot_mean,
            std_error,
            lower = interval.lower,
            upper = interval.upper,
            "term bootstrapped"
        );

        Ok(TermBootstrap {
            term: term.to_string(),
            replicates,
            mean: boot_mean,
            std_error,
            interval,
        })
    }

    /// Bootstrap every term
    ///
    /// `samples` pairs each term name with its case values. Any failing term
    /// fails the whole run; the first failure in term order is reported.
    #[instrument(skip(self, samples), fields(n_terms = samples.len(), n_resamples = self.n_resamples, method = self.method.name()))]
    pub fn run(&self, samples: &[(&str, &[f64])]) -> Result<BootstrapResult> {
        if samples.is_empty() {
            return Err(Error::InvalidInput("no terms to bootstrap".to_string()));
        }

        let start_time = std::time::Instant::now();
        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());

        debug!("Running case bootstrap with seed {}", seed);

        let results = self.engine.execute_batch(samples.len(), |i| {
            let (term, values) = samples[i];
            let mut rng = Self::term_rng(seed, i);
            self.bootstrap_term(term, values, &mut rng)
        });

        let terms = results.into_iter().collect::<Result<Vec<_>>>()?;

        debug!("Bootstrap completed for {} terms", terms.len());

        Ok(BootstrapResult {
            terms,
            n_resamples: self.n_resamples,
            seed,
            bootstrap_time_ms: Some(start_time.elapsed().as_millis() as u64),
        })
    }
}
