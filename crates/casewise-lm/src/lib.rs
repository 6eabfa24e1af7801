//! Case-by-case linear regression
//!
//! Fits one ordinary least squares model per case of a longitudinal dataset
//! and summarizes each coefficient by the mean of its per-case estimates,
//! with a case-level bootstrap for standard errors and confidence intervals.
//!
//! The pipeline has four stages, each usable on its own:
//!
//! 1. [`fit_cases`]: partition by case key and fit every case
//! 2. [`pool_coefficients`]: mean of each term across cases
//! 3. [`casewise_confidence::CaseBootstrap`]: resample cases, BCa intervals
//! 4. [`assemble`]: join everything into an [`AggregateResult`]
//!
//! # Example
//!
//! ```rust
//! use casewise_core::Dataset;
//! use casewise_lm::{fit_case_by_case, CaseByCaseConfig, FormulaSpec};
//!
//! let ids: Vec<f64> = (1..=5).flat_map(|i| [i as f64; 5]).collect();
//! let vals: Vec<f64> = (0..25).map(|i| (i % 5) as f64).collect();
//! let outs: Vec<f64> = ids
//!     .iter()
//!     .zip(&vals)
//!     .map(|(id, v)| 0.5 * id + (1.0 + 0.1 * id) * v)
//!     .collect();
//!
//! let data = Dataset::builder()
//!     .numeric("ids", ids)
//!     .numeric("vals", vals)
//!     .numeric("outs", outs)
//!     .build()
//!     .unwrap();
//!
//! let spec = FormulaSpec::parse("outs ~ vals").unwrap();
//! let config = CaseByCaseConfig::new().with_bootstrap(1000).with_seed(42);
//! let result = fit_case_by_case(&data, &spec, "ids", &config).unwrap();
//!
//! let slope = result.term("vals").unwrap();
//! assert!((slope.estimate - 1.3).abs() < 1e-10);
//! assert!(slope.interval.lower <= slope.interval.upper);
//! ```

pub mod aggregate;
pub mod cbc;
pub mod config;
pub mod design;
pub mod driver;
pub mod formula;
pub mod ols;
pub mod pooling;

pub use aggregate::{assemble, AggregateResult, PooledTerm};
pub use cbc::{cbc_lm, fit_case_by_case, CaseByCase};
pub use config::CaseByCaseConfig;
pub use design::DesignMatrix;
pub use driver::{fit_cases, CaseFit, CaseFits};
pub use formula::{FormulaSpec, Term, INTERCEPT};
pub use ols::{FitError, LinearFitter, OlsFit, QrFitter};
pub use pooling::{pool_coefficients, CoefficientTable, MissingPolicy, TermSample};
