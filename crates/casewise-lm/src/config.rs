//! Run configuration

use crate::pooling::MissingPolicy;
use casewise_confidence::{ConfidenceLevel, IntervalMethod, DEFAULT_RESAMPLES};
use casewise_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Settings of one case-by-case run
///
/// Deserializes from partial documents; absent fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseByCaseConfig {
    /// Bootstrap replicates per term
    pub n_bootstrap: usize,
    /// Two-sided confidence level in (0, 1)
    pub confidence_level: f64,
    pub missing_policy: MissingPolicy,
    /// Seed of the bootstrap streams; drawn at random when `None`
    pub seed: Option<u64>,
    pub interval_method: IntervalMethod,
}

impl Default for CaseByCaseConfig {
    fn default() -> Self {
        Self {
            n_bootstrap: DEFAULT_RESAMPLES,
            confidence_level: 0.95,
            missing_policy: MissingPolicy::Fail,
            seed: None,
            interval_method: IntervalMethod::BCa,
        }
    }
}

impl CaseByCaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bootstrap(mut self, n_bootstrap: usize) -> Self {
        self.n_bootstrap = n_bootstrap;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    pub fn with_missing_policy(mut self, missing_policy: MissingPolicy) -> Self {
        self.missing_policy = missing_policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_interval_method(mut self, interval_method: IntervalMethod) -> Self {
        self.interval_method = interval_method;
        self
    }

    /// Check the settings, returning the validated confidence level
    pub fn validate(&self) -> Result<ConfidenceLevel> {
        if self.n_bootstrap == 0 {
            return Err(Error::InvalidInput(
                "n_bootstrap must be a positive integer".to_string(),
            ));
        }
        ConfidenceLevel::new(self.confidence_level)
    }
}
