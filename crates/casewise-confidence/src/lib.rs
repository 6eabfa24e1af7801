//! Case-level bootstrap confidence intervals
//!
//! This crate provides the inferential half of case-by-case regression:
//! given one estimate per case for each model term, it resamples cases with
//! replacement and builds an interval for the pooled mean.
//!
//! - **Case bootstrap**: independent, reproducible random streams per term
//! - **BCa intervals**: bias correction plus jackknife acceleration
//! - **Percentile intervals**: plain empirical percentiles
//!
//! # Example
//!
//! ```rust
//! use casewise_confidence::{BCaBootstrap, CaseBootstrap, ConfidenceLevel};
//! use casewise_core::execution::sequential;
//!
//! let slopes = [2.1, 1.8, 2.4, 2.0, 1.9, 2.2];
//! let samples: Vec<(&str, &[f64])> = vec![("vals", &slopes[..])];
//!
//! let result = CaseBootstrap::new(sequential(), BCaBootstrap)
//!     .with_resamples(1000)
//!     .with_confidence_level(ConfidenceLevel::NINETY_FIVE)
//!     .with_seed(42)
//!     .run(&samples)
//!     .unwrap();
//!
//! let vals = &result.terms[0];
//! assert!(vals.interval.lower <= vals.interval.upper);
//! ```

pub mod api;
mod bootstrap;
mod bootstrap_methods;
pub mod jackknife;
mod types;

// Re-exports
pub use api::{bootstrap_pooled_means, DEFAULT_RESAMPLES, FAST_RESAMPLES};
pub use bootstrap::{BootstrapMethod, BootstrapResult, CaseBootstrap, TermBootstrap};
pub use bootstrap_methods::{BCaBootstrap, IntervalMethod, PercentileBootstrap};
pub use types::{ConfidenceInterval, ConfidenceLevel};
