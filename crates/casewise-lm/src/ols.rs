//! Ordinary least squares for a single case
//!
//! [`QrFitter`] solves the least-squares problem through a Householder QR
//! decomposition of the model matrix, which avoids forming `XᵀX`.

use crate::design::DesignMatrix;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance on `|r_jj| / ||x_j||` below which column `j` is treated as
/// linearly dependent on the columns before it
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-7;

/// Why a single fit failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Fewer observations than coefficients
    #[error("{n_obs} observations cannot identify {n_params} parameters")]
    Underdetermined { n_obs: usize, n_params: usize },

    /// A column is zero or a linear combination of earlier columns
    #[error("model matrix is rank deficient: term '{term}' is not identifiable")]
    RankDeficient { term: String },

    /// The fit produced non-finite coefficients
    #[error("least squares solution is not finite: {0}")]
    NonFinite(String),
}

/// Result of one least-squares fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    pub terms: Vec<String>,
    pub coefficients: Vec<f64>,
    /// Coefficient standard errors, absent when no residual degrees of
    /// freedom remain
    pub std_errors: Option<Vec<f64>>,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    /// Residual standard error
    pub sigma: Option<f64>,
    pub r_squared: Option<f64>,
    pub adj_r_squared: Option<f64>,
    pub df_residual: usize,
}

impl OlsFit {
    /// Estimate of the named coefficient
    pub fn coefficient(&self, term: &str) -> Option<f64> {
        self.terms
            .iter()
            .position(|t| t == term)
            .map(|i| self.coefficients[i])
    }

    pub fn n_obs(&self) -> usize {
        self.fitted.len()
    }
}

/// A least-squares backend
///
/// Implementations must report coefficients under the names of the design
/// matrix columns. The per-case driver rejects a fit whose term set differs
/// from the model's.
pub trait LinearFitter: Clone + Send + Sync {
    fn fit(&self, design: &DesignMatrix) -> Result<OlsFit, FitError>;

    /// Fitter name for logging
    fn name(&self) -> &'static str {
        "ols"
    }
}

/// Householder QR least squares
#[derive(Debug, Clone, Copy)]
pub struct QrFitter {
    rank_tolerance: f64,
}

impl Default for QrFitter {
    fn default() -> Self {
        Self {
            rank_tolerance: DEFAULT_RANK_TOLERANCE,
        }
    }
}

impl QrFitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rank tolerance, relative to each column norm
    ///
    /// # Panics
    /// Panics if `tolerance` is negative or not finite
    pub fn with_rank_tolerance(mut self, tolerance: f64) -> Self {
        assert!(
            tolerance.is_finite() && tolerance >= 0.0,
            "Rank tolerance must be finite and non-negative"
        );
        self.rank_tolerance = tolerance;
        self
    }
}

impl LinearFitter for QrFitter {
    fn fit(&self, design: &DesignMatrix) -> Result<OlsFit, FitError> {
        let n = design.n_obs();
        let p = design.n_params();
        if n < p || p == 0 {
            return Err(FitError::Underdetermined {
                n_obs: n,
                n_params: p,
            });
        }

        let x = design.x();
        let y = design.y();
        let qr = x.clone().qr();
        let r = qr.r();

        // |r_jj| is the norm of column j orthogonal to the columns before it
        if let Some(col) = (0..p).find(|&j| {
            let norm = x.column(j).norm();
            norm == 0.0 || r[(j, j)].abs() <= self.rank_tolerance * norm
        }) {
            return Err(FitError::RankDeficient {
                term: design.terms()[col].clone(),
            });
        }

        let qty = qr.q().transpose() * y;
        let beta = r
            .solve_upper_triangular(&qty)
            .ok_or_else(|| FitError::RankDeficient {
                term: design.terms()[p - 1].clone(),
            })?;
        if beta.iter().any(|b| !b.is_finite()) {
            return Err(FitError::NonFinite(format!("{:?}", beta.as_slice())));
        }

        let fitted: DVector<f64> = x * &beta;
        let residuals: DVector<f64> = y - &fitted;
        let rss = residuals.norm_squared();
        let df_residual = n - p;

        let sigma = (df_residual > 0).then(|| (rss / df_residual as f64).sqrt());

        // se_j = sigma * ||row j of R⁻¹||, since (XᵀX)⁻¹ = R⁻¹R⁻ᵀ
        let std_errors = sigma.and_then(|s| {
            r.clone().try_inverse().map(|r_inv| {
                (0..p)
                    .map(|j| s * r_inv.row(j).norm())
                    .collect::<Vec<f64>>()
            })
        });

        let tss = if design.has_intercept() {
            let mean_y = y.mean();
            y.iter().map(|v| (v - mean_y).powi(2)).sum::<f64>()
        } else {
            y.norm_squared()
        };
        let r_squared = (tss > 0.0).then(|| 1.0 - rss / tss);
        let adj_r_squared = r_squared.filter(|_| df_residual > 0).map(|r2| {
            let k = usize::from(design.has_intercept());
            1.0 - (1.0 - r2) * (n - k) as f64 / df_residual as f64
        });

        Ok(OlsFit {
            terms: design.terms().to_vec(),
            coefficients: beta.iter().copied().collect(),
            std_errors,
            fitted: fitted.iter().copied().collect(),
            residuals: residuals.iter().copied().collect(),
            sigma,
            r_squared,
            adj_r_squared,
            df_residual,
        })
    }

    fn name(&self) -> &'static str {
        "householder-qr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn design(x: &[f64], y: &[f64]) -> DesignMatrix {
        let rows: Vec<f64> = x.iter().flat_map(|&v| [1.0, v]).collect();
        DesignMatrix::from_row_major(
            vec!["(Intercept)".into(), "x".into()],
            true,
            x.len(),
            rows,
            y.to_vec(),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_exact_line() {
        let fit = QrFitter::new()
            .fit(&design(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]))
            .unwrap();

        assert_relative_eq!(fit.coefficient("(Intercept)").unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficient("x").unwrap(), 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.sigma.unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared.unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(fit.df_residual, 2);
        assert!(fit.residuals.iter().all(|r| r.abs() < 1e-10));
    }

    #[test]
    fn test_matches_closed_form_simple_regression() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.1, 3.9, 6.2, 7.8, 10.1];
        let fit = QrFitter::new().fit(&design(&x, &y)).unwrap();

        let mx = x.iter().sum::<f64>() / 5.0;
        let my = y.iter().sum::<f64>() / 5.0;
        let sxy: f64 = x.iter().zip(&y).map(|(a, b)| (a - mx) * (b - my)).sum();
        let sxx: f64 = x.iter().map(|a| (a - mx).powi(2)).sum();
        let slope = sxy / sxx;
        let intercept = my - slope * mx;

        assert_relative_eq!(fit.coefficients[0], intercept, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], slope, epsilon = 1e-10);

        let rss: f64 = fit.residuals.iter().map(|r| r * r).sum();
        let sigma = (rss / 3.0).sqrt();
        let se_slope = sigma / sxx.sqrt();
        let se_intercept = sigma * (1.0 / 5.0 + mx * mx / sxx).sqrt();
        let se = fit.std_errors.as_ref().unwrap();
        assert_relative_eq!(se[0], se_intercept, epsilon = 1e-10);
        assert_relative_eq!(se[1], se_slope, epsilon = 1e-10);

        // residuals sum to zero with an intercept
        assert_relative_eq!(fit.residuals.iter().sum::<f64>(), 0.0, epsilon = 1e-10);
        for (f, r) in fit.fitted.iter().zip(&fit.residuals) {
            assert!(f.is_finite() && r.is_finite());
        }
    }

    #[test]
    fn test_saturated_fit_has_no_standard_errors() {
        let fit = QrFitter::new().fit(&design(&[1.0, 2.0], &[3.0, 5.0])).unwrap();
        assert_eq!(fit.df_residual, 0);
        assert!(fit.sigma.is_none());
        assert!(fit.std_errors.is_none());
        assert!(fit.adj_r_squared.is_none());
        assert_relative_eq!(fit.coefficients[1], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_underdetermined() {
        let err = QrFitter::new().fit(&design(&[1.0], &[3.0])).unwrap_err();
        assert_eq!(
            err,
            FitError::Underdetermined {
                n_obs: 1,
                n_params: 2
            }
        );
        assert_eq!(err.to_string(), "1 observations cannot identify 2 parameters");
    }

    #[test]
    fn test_constant_predictor_is_rank_deficient() {
        let err = QrFitter::new()
            .fit(&design(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]))
            .unwrap_err();
        assert_eq!(err, FitError::RankDeficient { term: "x".into() });
    }

    #[test]
    fn test_rank_check_ignores_column_scale() {
        let x: Vec<f64> = [0.0, 1.0, 2.0, 3.0, 4.0].iter().map(|v| v * 1e8).collect();
        let y = [0.3, 1.1, 2.4, 2.9, 4.2];
        let fit = QrFitter::new().fit(&design(&x, &y)).unwrap();

        let unscaled = QrFitter::new()
            .fit(&design(&[0.0, 1.0, 2.0, 3.0, 4.0], &y))
            .unwrap();
        assert_relative_eq!(fit.coefficients[0], unscaled.coefficients[0], epsilon = 1e-6);
        assert_relative_eq!(
            fit.coefficients[1] * 1e8,
            unscaled.coefficients[1],
            max_relative = 1e-6
        );

        let tiny: Vec<f64> = [0.0, 1.0, 2.0, 3.0, 4.0].iter().map(|v| v * 1e-9).collect();
        assert!(QrFitter::new().fit(&design(&tiny, &y)).is_ok());
    }

    #[test]
    fn test_zero_intercept_column_is_named() {
        let design = DesignMatrix::from_row_major(
            vec!["(Intercept)".into(), "x".into()],
            true,
            3,
            vec![0.0, 1.0, 0.0, 2.0, 0.0, 3.0],
            vec![1.0, 2.0, 3.0],
            0,
        )
        .unwrap();
        let err = QrFitter::new().fit(&design).unwrap_err();
        assert_eq!(
            err,
            FitError::RankDeficient {
                term: "(Intercept)".into()
            }
        );
        assert!(err.to_string().contains("'(Intercept)' is not identifiable"));
    }
}
