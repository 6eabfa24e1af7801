//! Result assembly
//!
//! Joins the case fits, pooled means and bootstrap summaries term by term
//! into the [`AggregateResult`] handed back to callers.

use crate::{driver::CaseFits, pooling::TermSample};
use casewise_confidence::{BootstrapResult, ConfidenceInterval};
use casewise_core::{CaseKey, Error, Result};
use serde::{Deserialize, Serialize};

/// Pooled estimate and bootstrap inference for one term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PooledTerm {
    pub term: String,
    /// Mean of the per-case estimates
    pub estimate: f64,
    /// Cases that contributed an estimate
    pub n_cases: usize,
    pub cases: Vec<CaseKey>,
    /// Mean of the bootstrap replicates
    pub bootstrap_mean: f64,
    /// Standard deviation of the bootstrap replicates
    pub std_error: f64,
    pub interval: ConfidenceInterval,
    /// Bootstrap replicates in draw order
    pub replicates: Vec<f64>,
}

/// Outcome of a case-by-case run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub formula: String,
    pub key_column: String,
    pub terms: Vec<PooledTerm>,
    pub fits: CaseFits,
    pub n_bootstrap: usize,
    pub confidence_level: f64,
    /// Seed the bootstrap streams were derived from
    pub seed: u64,
    pub interval_method: String,
}

impl AggregateResult {
    /// Pooled result of the named term
    pub fn term(&self, name: &str) -> Option<&PooledTerm> {
        self.terms.iter().find(|t| t.term == name)
    }

    /// Term names in model order
    pub fn term_names(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.term.as_str()).collect()
    }

    pub fn n_cases(&self) -> usize {
        self.fits.len()
    }
}

/// Join fits, pooled samples and bootstrap summaries
///
/// Every term of `fits` needs a pooled sample and a bootstrap summary with
/// exactly `bootstrap.n_resamples` replicates; anything else fails with
/// `IncompleteAggregation`.
pub fn assemble(
    formula: String,
    fits: CaseFits,
    samples: Vec<TermSample>,
    bootstrap: BootstrapResult,
    confidence_level: f64,
    interval_method: &str,
) -> Result<AggregateResult> {
    let mut terms = Vec::with_capacity(fits.terms.len());

    for name in &fits.terms {
        let sample = samples.iter().find(|s| &s.term == name).ok_or_else(|| {
            Error::IncompleteAggregation(format!("term '{name}' has no pooled estimate"))
        })?;
        let boot = bootstrap
            .terms
            .iter()
            .find(|b| &b.term == name)
            .ok_or_else(|| {
                Error::IncompleteAggregation(format!("term '{name}' has no bootstrap summary"))
            })?;
        if boot.replicates.len() != bootstrap.n_resamples {
            return Err(Error::IncompleteAggregation(format!(
                "term '{name}' has {} bootstrap replicates, expected {}",
                boot.replicates.len(),
                bootstrap.n_resamples
            )));
        }

        terms.push(PooledTerm {
            term: name.clone(),
            estimate: sample.mean,
            n_cases: sample.n_cases(),
            cases: sample.cases.clone(),
            bootstrap_mean: boot.mean,
            std_error: boot.std_error,
            interval: boot.interval,
            replicates: boot.replicates.clone(),
        });
    }

    Ok(AggregateResult {
        formula,
        key_column: fits.key_column.clone(),
        terms,
        fits,
        n_bootstrap: bootstrap.n_resamples,
        confidence_level,
        seed: bootstrap.seed,
        interval_method: interval_method.to_string(),
    })
}
