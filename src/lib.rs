//! Case-by-case regression toolkit
//!
//! Fits one ordinary least squares model per case of a longitudinal dataset,
//! pools each coefficient as the mean of its case estimates and attaches
//! case-level bootstrap standard errors and BCa confidence intervals.
//!
//! # Crates
//!
//! - [`core`]: errors, dataset and partitioning, numerics, execution engines
//! - [`confidence`]: case bootstrap, BCa and percentile intervals
//! - [`lm`]: formulas, OLS, per-case fitting, pooling, result assembly
//! - `polars` (feature `polars`): DataFrame integration
//!
//! # Example
//!
//! ```rust
//! use casewise::prelude::*;
//!
//! let ids: Vec<f64> = (1..=5).flat_map(|i| [i as f64; 5]).collect();
//! let vals: Vec<f64> = (0..25).map(|i| (i % 5) as f64).collect();
//! let outs: Vec<f64> = ids
//!     .iter()
//!     .zip(&vals)
//!     .map(|(id, v)| 2.0 + 0.2 * id + (0.5 + 0.05 * id) * v)
//!     .collect();
//! let data = Dataset::builder()
//!     .numeric("ids", ids)
//!     .numeric("vals", vals)
//!     .numeric("outs", outs)
//!     .build()
//!     .unwrap();
//!
//! let config = CaseByCaseConfig::new().with_bootstrap(1000).with_seed(42);
//! let result = fit_case_by_case(
//!     &data,
//!     &FormulaSpec::parse("outs ~ vals").unwrap(),
//!     "ids",
//!     &config,
//! )
//! .unwrap();
//!
//! for term in &result.terms {
//!     println!("{}: {:.3} ({})", term.term, term.estimate, term.interval);
//! }
//! ```

pub use casewise_confidence as confidence;
pub use casewise_core as core;
pub use casewise_lm as lm;
#[cfg(feature = "polars")]
pub use casewise_polars as polars;

pub use casewise_core::{Dataset, Error, Result};
pub use casewise_lm::{cbc_lm, fit_case_by_case, AggregateResult, CaseByCaseConfig, FormulaSpec};

/// Prelude module for convenient imports
pub mod prelude {
    pub use casewise_confidence::{ConfidenceInterval, ConfidenceLevel, IntervalMethod};
    pub use casewise_core::{
        CancellationToken, CaseKey, Dataset, Error, ExecutionEngine, Result,
    };
    pub use casewise_lm::{
        cbc_lm, fit_case_by_case, AggregateResult, CaseByCase, CaseByCaseConfig, FormulaSpec,
        MissingPolicy, PooledTerm, QrFitter,
    };
    #[cfg(feature = "polars")]
    pub use casewise_polars::CaseByCaseExt;
}
