//! Per-case fitting
//!
//! Partitions a dataset by its case key and fits the same formula to every
//! case independently. Cases are fanned out on the execution engine; any
//! failing case aborts the whole run.

use crate::{
    formula::FormulaSpec,
    ols::{LinearFitter, OlsFit},
    pooling::CoefficientTable,
};
use casewise_core::{
    CancellationToken, CaseKey, CasePartition, Dataset, Error, ExecutionEngine, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// Fit of one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFit {
    pub key: CaseKey,
    /// Rows used by the fit
    pub n_obs: usize,
    /// Rows of the case dropped for missing values
    pub n_dropped: usize,
    pub fit: OlsFit,
}

impl CaseFit {
    /// Estimate of the named coefficient for this case
    pub fn coefficient(&self, term: &str) -> Option<f64> {
        self.fit.coefficient(term)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.fit.coefficients
    }

    /// (fitted, residual) pairs in row order
    pub fn fitted_residuals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.fit
            .fitted
            .iter()
            .copied()
            .zip(self.fit.residuals.iter().copied())
    }
}

/// Fits of every case, in first-occurrence order of the case key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFits {
    pub key_column: String,
    /// Coefficient names shared by every fit
    pub terms: Vec<String>,
    pub fits: Vec<CaseFit>,
}

impl CaseFits {
    pub fn len(&self) -> usize {
        self.fits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseFit> {
        self.fits.iter()
    }

    /// Fit of the case with the given key
    pub fn get(&self, key: &str) -> Option<&CaseFit> {
        self.fits.iter().find(|f| f.key.as_str() == key)
    }

    /// Case keys in fit order
    pub fn keys(&self) -> Vec<CaseKey> {
        self.fits.iter().map(|f| f.key.clone()).collect()
    }

    /// Per-term, per-case estimates for pooling
    pub fn coefficient_table(&self) -> CoefficientTable {
        let estimates = self
            .terms
            .iter()
            .map(|term| {
                self.fits
                    .iter()
                    .map(|f| f.coefficient(term).filter(|v| v.is_finite()))
                    .collect()
            })
            .collect();
        CoefficientTable::from_parts_unchecked(self.terms.clone(), self.keys(), estimates)
    }
}

impl<'a> IntoIterator for &'a CaseFits {
    type Item = &'a CaseFit;
    type IntoIter = std::slice::Iter<'a, CaseFit>;

    fn into_iter(self) -> Self::IntoIter {
        self.fits.iter()
    }
}

/// Fit one case
fn fit_case<F: LinearFitter>(
    fitter: &F,
    data: &Dataset,
    spec: &FormulaSpec,
    terms: &[String],
    case: &CasePartition,
) -> Result<CaseFit> {
    let design = spec.design(data, &case.rows)?;
    let n_obs = design.n_obs();
    let n_params = spec.n_params();

    if n_obs < n_params {
        let mut reason = format!("{n_obs} observations cannot identify {n_params} parameters");
        if design.n_dropped() > 0 {
            reason.push_str(&format!(
                " ({} rows dropped for missing values)",
                design.n_dropped()
            ));
        }
        return Err(Error::degenerate_case(&case.key, reason));
    }

    let fit = fitter
        .fit(&design)
        .map_err(|e| Error::degenerate_case(&case.key, e.to_string()))?;

    if fit.terms != terms {
        return Err(Error::degenerate_case(
            &case.key,
            format!(
                "fitted terms [{}] differ from model terms [{}]",
                fit.terms.join(", "),
                terms.join(", ")
            ),
        ));
    }
    if fit.coefficients.len() != fit.terms.len() {
        return Err(Error::degenerate_case(
            &case.key,
            format!(
                "fit returned {} coefficients for {} terms",
                fit.coefficients.len(),
                fit.terms.len()
            ),
        ));
    }

    trace!(
        case = %case.key,
        n_obs,
        n_dropped = design.n_dropped(),
        "case fitted"
    );

    Ok(CaseFit {
        key: case.key.clone(),
        n_obs,
        n_dropped: design.n_dropped(),
        fit,
    })
}

/// Fit `spec` to every case of `data`
///
/// Fails with
/// - `InvalidInput` for an empty dataset, an unknown or incomplete key
///   column, or a formula that does not resolve to numeric columns
/// - `DegenerateCase` when there is only one case, or a case has fewer
///   usable rows than parameters, a rank-deficient model matrix, or a
///   term set different from the formula's
/// - `Cancelled` when `cancellation` fires
#[instrument(skip(engine, fitter, data, spec, cancellation), fields(formula = %spec, n_rows = data.n_rows(), fitter = fitter.name()))]
pub fn fit_cases<E, F>(
    engine: &E,
    fitter: &F,
    data: &Dataset,
    spec: &FormulaSpec,
    key_column: &str,
    cancellation: &CancellationToken,
) -> Result<CaseFits>
where
    E: ExecutionEngine,
    F: LinearFitter,
{
    if data.is_empty() {
        return Err(Error::InvalidInput("dataset has no rows".to_string()));
    }
    if !data.has_column(key_column) {
        return Err(Error::missing_column(key_column));
    }
    spec.validate(data)?;

    let cases = data.partition(key_column)?;
    if cases.len() < 2 {
        let key = cases
            .first()
            .map(|c| c.key.to_string())
            .unwrap_or_default();
        return Err(Error::degenerate_case(
            key,
            "a single case cannot support a case-level bootstrap",
        ));
    }

    debug!(
        "Fitting {} cases with {} parameters each",
        cases.len(),
        spec.n_params()
    );

    let terms = spec.term_names();
    let results = engine.execute_batch(cases.len(), |i| {
        cancellation.check()?;
        fit_case(fitter, data, spec, &terms, &cases[i])
    });
    let fits = results.into_iter().collect::<Result<Vec<_>>>()?;

    let dropped: usize = fits.iter().map(|f| f.n_dropped).sum();
    if dropped > 0 {
        debug!("{} rows dropped for missing values", dropped);
    }

    Ok(CaseFits {
        key_column: key_column.to_string(),
        terms,
        fits,
    })
}
