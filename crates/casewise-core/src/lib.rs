//! Core types for case-by-case regression
//!
//! This crate provides the pieces shared by every stage of the case-by-case
//! pipeline:
//!
//! - **Errors**: one taxonomy for invalid input, degenerate cases, degenerate
//!   bootstrap terms, and internal aggregation failures
//! - **Data**: a small column store and its partitioning into cases
//! - **Math**: standard normal CDF/quantile, moments, interpolated quantiles
//! - **Execution**: sequential and Rayon engines plus cooperative cancellation
//!
//! # Example
//!
//! ```rust
//! use casewise_core::{Dataset, execution::{sequential, ExecutionEngine}};
//!
//! let data = Dataset::builder()
//!     .numeric("ids", vec![1.0, 1.0, 2.0, 2.0])
//!     .numeric("outs", vec![0.1, 0.9, 0.2, 1.1])
//!     .build()
//!     .unwrap();
//!
//! let cases = data.partition("ids").unwrap();
//! let sizes = sequential().execute_batch(cases.len(), |i| cases[i].len());
//! assert_eq!(sizes, vec![2, 2]);
//! ```

pub mod data;
pub mod error;
pub mod execution;
pub mod math;

pub use data::{CaseKey, CasePartition, Column, Dataset, DatasetBuilder};
pub use error::{Error, Result};
pub use execution::{
    auto_engine, sequential, AutoEngine, CancellationToken, ExecutionEngine, ExecutionStrategy,
    SequentialEngine,
};
#[cfg(feature = "parallel")]
pub use execution::{parallel, ParallelEngine};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CancellationToken, CaseKey, Dataset, Error, ExecutionEngine, ExecutionStrategy, Result,
        SequentialEngine,
    };
    #[cfg(feature = "parallel")]
    pub use crate::ParallelEngine;
}
