//! Design matrices for one case

use casewise_core::{Error, Result};
use nalgebra::{DMatrix, DVector};

/// Model matrix and response of one case after missing-value removal
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    terms: Vec<String>,
    intercept: bool,
    x: DMatrix<f64>,
    y: DVector<f64>,
    n_dropped: usize,
}

impl DesignMatrix {
    /// Build from a row-major buffer of `n_obs * terms.len()` values
    pub fn from_row_major(
        terms: Vec<String>,
        intercept: bool,
        n_obs: usize,
        x: Vec<f64>,
        y: Vec<f64>,
        n_dropped: usize,
    ) -> Result<Self> {
        let p = terms.len();
        if x.len() != n_obs * p {
            return Err(Error::size_mismatch(n_obs * p, x.len(), "design matrix"));
        }
        if y.len() != n_obs {
            return Err(Error::size_mismatch(n_obs, y.len(), "response vector"));
        }

        Ok(Self {
            terms,
            intercept,
            x: DMatrix::from_row_slice(n_obs, p, &x),
            y: DVector::from_vec(y),
            n_dropped,
        })
    }

    /// Coefficient names, one per column
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn has_intercept(&self) -> bool {
        self.intercept
    }

    /// Observations used in the fit
    pub fn n_obs(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_params(&self) -> usize {
        self.x.ncols()
    }

    /// Rows removed because a model variable was missing
    pub fn n_dropped(&self) -> usize {
        self.n_dropped
    }

    pub fn x(&self) -> &DMatrix<f64> {
        &self.x
    }

    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    pub fn response(&self) -> &[f64] {
        self.y.as_slice()
    }

    /// One row of the model matrix
    pub fn row(&self, i: usize) -> Vec<f64> {
        self.x.row(i).iter().copied().collect()
    }
}
