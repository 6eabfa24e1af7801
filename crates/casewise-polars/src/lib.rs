//! Polars integration for case-by-case regression
//!
//! This crate runs the casewise pipeline directly on Polars DataFrames
//! through an extension trait, and turns results back into tidy frames.
//!
//! # Example
//!
//! ```rust
//! use polars::prelude::*;
//! use casewise_polars::{pooled_frame, CaseByCaseConfig, CaseByCaseExt};
//!
//! let df = df![
//!     "ids" => [1, 1, 1, 2, 2, 2, 3, 3, 3],
//!     "vals" => [0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0],
//!     "outs" => [0.2, 1.1, 2.1, 0.4, 0.9, 2.6, -0.1, 1.3, 2.0],
//! ]
//! .unwrap();
//!
//! let config = CaseByCaseConfig::new().with_bootstrap(500).with_seed(42);
//! let result = df.case_by_case("outs ~ vals", "ids", &config).unwrap();
//! let summary = pooled_frame(&result).unwrap();
//! assert_eq!(summary.shape(), (2, 7));
//! ```

mod convert;
mod error;
mod traits;

pub use convert::{case_coefficients_frame, dataset_from_frame, pooled_frame};
pub use error::{Error, Result};
pub use traits::CaseByCaseExt;

// Re-export commonly used types from dependencies
pub use casewise_lm::{AggregateResult, CaseByCaseConfig, MissingPolicy};
