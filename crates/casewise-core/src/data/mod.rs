//! Tabular observations and case partitioning
//!
//! A [`Dataset`] is a small column store: named numeric columns (non-finite
//! values mark missing observations) and named text columns. One column is
//! designated as the case key when the data is partitioned into cases.

mod dataset;
mod partition;

pub use dataset::{Column, Dataset, DatasetBuilder};
pub use partition::{CaseKey, CasePartition};
