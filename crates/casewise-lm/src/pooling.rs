//! Coefficient pooling
//!
//! The pooled estimate of a term is the plain mean of its per-case
//! estimates. Cases are weighted equally whatever their number of rows.

use casewise_core::{math::moments::mean, CaseKey, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// What to do with a case whose estimate for a term is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Abort with `DegenerateCase` naming the case and term
    #[default]
    Fail,
    /// Leave the case out of that term's mean and bootstrap
    Skip,
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPolicy::Fail => write!(f, "fail"),
            MissingPolicy::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for MissingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(MissingPolicy::Fail),
            "skip" => Ok(MissingPolicy::Skip),
            other => Err(Error::InvalidInput(format!(
                "missing policy must be 'skip' or 'fail', got '{other}'"
            ))),
        }
    }
}

/// Per-term, per-case coefficient estimates
///
/// `None` marks an estimate that is undefined for a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientTable {
    terms: Vec<String>,
    cases: Vec<CaseKey>,
    /// `estimates[term][case]`
    estimates: Vec<Vec<Option<f64>>>,
}

impl CoefficientTable {
    /// Build a table from estimates laid out per term, then per case
    ///
    /// Fails with `InvalidInput` if the shape does not match `terms` and
    /// `cases`. Non-finite estimates are stored as missing.
    pub fn new(
        terms: Vec<String>,
        cases: Vec<CaseKey>,
        estimates: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        if estimates.len() != terms.len() {
            return Err(Error::size_mismatch(
                terms.len(),
                estimates.len(),
                "coefficient table terms",
            ));
        }
        if let Some(row) = estimates.iter().find(|row| row.len() != cases.len()) {
            return Err(Error::size_mismatch(
                cases.len(),
                row.len(),
                "coefficient table cases",
            ));
        }
        let estimates = estimates
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| v.filter(|x| x.is_finite()))
                    .collect()
            })
            .collect();
        Ok(Self::from_parts_unchecked(terms, cases, estimates))
    }

    pub(crate) fn from_parts_unchecked(
        terms: Vec<String>,
        cases: Vec<CaseKey>,
        estimates: Vec<Vec<Option<f64>>>,
    ) -> Self {
        Self {
            terms,
            cases,
            estimates,
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn cases(&self) -> &[CaseKey] {
        &self.cases
    }

    /// Estimates of one term in case order
    pub fn estimates(&self, term: &str) -> Option<&[Option<f64>]> {
        self.term_index(term).map(|i| self.estimates[i].as_slice())
    }

    /// Mark the estimate of `term` for `case` as missing
    pub fn remove_estimate(&mut self, term: &str, case: &str) -> Result<()> {
        let t = self
            .term_index(term)
            .ok_or_else(|| Error::InvalidInput(format!("unknown term '{term}'")))?;
        let c = self
            .cases
            .iter()
            .position(|k| k.as_str() == case)
            .ok_or_else(|| Error::InvalidInput(format!("unknown case '{case}'")))?;
        self.estimates[t][c] = None;
        Ok(())
    }

    /// Number of missing estimates across all terms
    pub fn n_missing(&self) -> usize {
        self.estimates.iter().flatten().filter(|v| v.is_none()).count()
    }

    fn term_index(&self, term: &str) -> Option<usize> {
        self.terms.iter().position(|t| t == term)
    }
}

/// Case estimates of one term, ready for bootstrapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSample {
    pub term: String,
    /// Cases contributing an estimate, in table order
    pub cases: Vec<CaseKey>,
    pub values: Vec<f64>,
    /// Mean of `values`
    pub mean: f64,
}

impl TermSample {
    pub fn n_cases(&self) -> usize {
        self.values.len()
    }
}

/// Pool each term's case estimates
///
/// Under [`MissingPolicy::Fail`] the first missing estimate (term order,
/// then case order) fails with `DegenerateCase`. Under
/// [`MissingPolicy::Skip`] missing estimates are left out; a term left with
/// no estimates fails with `DegenerateBootstrap`.
pub fn pool_coefficients(table: &CoefficientTable, policy: MissingPolicy) -> Result<Vec<TermSample>> {
    let mut samples = Vec::with_capacity(table.terms.len());

    for (term, row) in table.terms.iter().zip(&table.estimates) {
        let mut cases = Vec::with_capacity(row.len());
        let mut values = Vec::with_capacity(row.len());

        for (case, estimate) in table.cases.iter().zip(row) {
            match (estimate, policy) {
                (Some(v), _) => {
                    cases.push(case.clone());
                    values.push(*v);
                }
                (None, MissingPolicy::Fail) => {
                    return Err(Error::degenerate_case(
                        case,
                        format!("estimate for term '{term}' is missing"),
                    ));
                }
                (None, MissingPolicy::Skip) => {
                    warn!(term = %term, case = %case, "skipping missing estimate");
                }
            }
        }

        let mean = mean(&values).ok_or_else(|| Error::DegenerateBootstrap {
            term: term.clone(),
            reason: "no case estimates remain after skipping missing values".to_string(),
        })?;

        debug!(
            "Pooled '{}' over {} of {} cases: {:.6}",
            term,
            values.len(),
            row.len(),
            mean
        );

        samples.push(TermSample {
            term: term.clone(),
            cases,
            values,
            mean,
        });
    }

    Ok(samples)
}
