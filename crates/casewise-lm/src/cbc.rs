//! Case-by-case regression entry points
//!
//! The pipeline runs strictly in order: fit every case, pool each term's
//! case estimates, bootstrap the pooled means, assemble the result. The run
//! is all-or-nothing; the first error of any stage is returned and no
//! partial result is produced.

use crate::{
    aggregate::{assemble, AggregateResult},
    config::CaseByCaseConfig,
    driver::{fit_cases, CaseFits},
    formula::FormulaSpec,
    ols::{LinearFitter, QrFitter},
    pooling::{pool_coefficients, CoefficientTable},
};
use casewise_confidence::{BootstrapMethod, CaseBootstrap};
use casewise_core::{
    execution::{auto_engine, ExecutionEngine},
    CancellationToken, Dataset, Result,
};
use rand::prelude::*;
use tracing::{debug, info, instrument};

/// Case-by-case runner with an injectable engine and fitter
///
/// ```rust
/// use casewise_core::{execution::sequential, Dataset};
/// use casewise_lm::{CaseByCase, CaseByCaseConfig, FormulaSpec, QrFitter};
///
/// let data = Dataset::builder()
///     .numeric("ids", vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0])
///     .numeric("vals", vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0])
///     .numeric("outs", vec![0.1, 1.2, 1.9, 0.3, 0.8, 2.4, -0.2, 1.1, 2.2])
///     .build()
///     .unwrap();
/// let spec = FormulaSpec::parse("outs ~ vals").unwrap();
///
/// let result = CaseByCase::new(sequential(), QrFitter::new())
///     .with_config(CaseByCaseConfig::new().with_bootstrap(500).with_seed(1))
///     .fit(&data, &spec, "ids")
///     .unwrap();
/// assert_eq!(result.term_names(), vec!["(Intercept)", "vals"]);
/// ```
#[derive(Clone)]
pub struct CaseByCase<E, F> {
    engine: E,
    fitter: F,
    config: CaseByCaseConfig,
    cancellation: CancellationToken,
}

impl<E, F> CaseByCase<E, F>
where
    E: ExecutionEngine,
    F: LinearFitter,
{
    pub fn new(engine: E, fitter: F) -> Self {
        Self {
            engine,
            fitter,
            config: CaseByCaseConfig::default(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: CaseByCaseConfig) -> Self {
        self.config = config;
        self
    }

    /// Token checked between case fits and bootstrap replicates
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &CaseByCaseConfig {
        &self.config
    }

    /// Run the whole pipeline on `data`
    #[instrument(skip(self, data, spec), fields(formula = %spec))]
    pub fn fit(&self, data: &Dataset, spec: &FormulaSpec, key_column: &str) -> Result<AggregateResult> {
        self.config.validate()?;

        let fits = fit_cases(
            &self.engine,
            &self.fitter,
            data,
            spec,
            key_column,
            &self.cancellation,
        )?;
        let table = fits.coefficient_table();

        self.summarize(spec, fits, &table)
    }

    /// Pool, bootstrap and assemble from existing case fits
    ///
    /// `table` supplies the estimates that are pooled; it normally comes
    /// from [`CaseFits::coefficient_table`], possibly with estimates masked.
    pub fn summarize(
        &self,
        spec: &FormulaSpec,
        fits: CaseFits,
        table: &CoefficientTable,
    ) -> Result<AggregateResult> {
        let level = self.config.validate()?;
        let samples = pool_coefficients(table, self.config.missing_policy)?;

        let seed = self.config.seed.unwrap_or_else(|| thread_rng().gen());
        let method = self.config.interval_method;
        let bootstrap = CaseBootstrap::new(self.engine.clone(), method)
            .with_resamples(self.config.n_bootstrap)
            .with_confidence_level(level)
            .with_seed(seed)
            .with_cancellation(self.cancellation.clone());

        let inputs: Vec<(&str, &[f64])> = samples
            .iter()
            .map(|s| (s.term.as_str(), s.values.as_slice()))
            .collect();
        let boot = bootstrap.run(&inputs)?;

        debug!(
            "Bootstrapped {} terms in {:?} ms",
            boot.terms.len(),
            boot.bootstrap_time_ms
        );

        let result = assemble(
            spec.to_string(),
            fits,
            samples,
            boot,
            level.value(),
            method.name(),
        )?;

        info!(
            n_cases = result.n_cases(),
            n_terms = result.terms.len(),
            seed = result.seed,
            "case-by-case fit complete"
        );

        Ok(result)
    }
}

/// Fit `spec` per case of `data` and pool the coefficients with bootstrap
/// inference
///
/// Uses the best available execution engine and the QR fitter.
pub fn fit_case_by_case(
    data: &Dataset,
    spec: &FormulaSpec,
    key_column: &str,
    config: &CaseByCaseConfig,
) -> Result<AggregateResult> {
    CaseByCase::new(auto_engine(), QrFitter::new())
        .with_config(config.clone())
        .fit(data, spec, key_column)
}

/// Parse `formula` and run [`fit_case_by_case`] with default settings
pub fn cbc_lm(formula: &str, data: &Dataset, key_column: &str) -> Result<AggregateResult> {
    let spec = FormulaSpec::parse(formula)?;
    fit_case_by_case(data, &spec, key_column, &CaseByCaseConfig::default())
}
