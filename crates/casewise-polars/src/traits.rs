//! Extension trait for running case-by-case regression on DataFrames

use crate::{convert::dataset_from_frame, Result};
use casewise_core::Dataset;
use casewise_lm::{fit_case_by_case, AggregateResult, CaseByCaseConfig, FormulaSpec};
use polars::prelude::*;

/// Case-by-case regression on Polars DataFrames
pub trait CaseByCaseExt {
    /// Fit `formula` per case of `key_column` and pool the coefficients
    ///
    /// # Arguments
    /// * `formula` - Model formula, e.g. `"outs ~ vals"`
    /// * `key_column` - Column identifying the case of each row
    /// * `config` - Bootstrap and missing-value settings
    fn case_by_case(
        &self,
        formula: &str,
        key_column: &str,
        config: &CaseByCaseConfig,
    ) -> Result<AggregateResult>;

    /// Copy the columns `formula` reads, plus the key, into a [`Dataset`]
    fn to_dataset(&self, formula: &str, key_column: &str) -> Result<Dataset>;
}

impl CaseByCaseExt for DataFrame {
    fn case_by_case(
        &self,
        formula: &str,
        key_column: &str,
        config: &CaseByCaseConfig,
    ) -> Result<AggregateResult> {
        let spec = FormulaSpec::parse(formula)?;
        let data = dataset_from_frame(self, &spec.variables(), key_column)?;
        Ok(fit_case_by_case(&data, &spec, key_column, config)?)
    }

    fn to_dataset(&self, formula: &str, key_column: &str) -> Result<Dataset> {
        let spec = FormulaSpec::parse(formula)?;
        dataset_from_frame(self, &spec.variables(), key_column)
    }
}
