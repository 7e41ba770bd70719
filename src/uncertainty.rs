//! Covariance matrix calculations.
//!
//! For nonlinear least-squares problems, the covariance of the fitted
//! parameters is estimated at the solution as `covar = redchi * inv(J^T J)`,
//! where `J` is the Jacobian of the residuals with respect to the free
//! parameters and `redchi` is the reduced chi-square (chi^2 / dof).

use ndarray::{Array1, Array2};

use crate::utils::matrix_convert::{nalgebra_to_ndarray, ndarray_to_nalgebra};

/// Estimate the covariance matrix from the Jacobian at the solution.
///
/// A singular normal matrix (or an infinite `redchi` from zero degrees of
/// freedom) produces a matrix filled with infinity rather than an error:
/// the fit itself is still usable, only its uncertainties are not.
pub fn covariance_from_jacobian(jacobian: &Array2<f64>, redchi: f64) -> Array2<f64> {
    let jtj = jacobian.t().dot(jacobian);
    let n = jtj.nrows();

    match ndarray_to_nalgebra(&jtj).try_inverse() {
        Some(inv) if redchi.is_finite() => {
            let mut covar = nalgebra_to_ndarray(&inv);
            covar.mapv_inplace(|v| v * redchi);
            covar
        }
        _ => Array2::from_elem((n, n), f64::INFINITY),
    }
}

/// Calculate the correlation matrix from a covariance matrix.
///
/// `correl[i,j] = covar[i,j] / sqrt(covar[i,i] * covar[j,j])`, so diagonal
/// elements are 1 and off-diagonal elements lie in [-1, 1].
pub fn calculate_correlation(covar: &Array2<f64>) -> Array2<f64> {
    let n = covar.nrows();
    let mut correl = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..n {
            if i == j {
                correl[[i, j]] = 1.0;
            } else {
                let denom = (covar[[i, i]] * covar[[j, j]]).sqrt();
                if denom > 0.0 {
                    correl[[i, j]] = covar[[i, j]] / denom;
                }
            }
        }
    }

    correl
}

/// Extract standard errors (square roots of the covariance diagonal).
pub fn standard_errors_from_covariance(covar: &Array2<f64>) -> Array1<f64> {
    let n = covar.nrows();
    let mut errors = Array1::zeros(n);

    for i in 0..n {
        errors[i] = if covar[[i, i]] > 0.0 {
            covar[[i, i]].sqrt()
        } else {
            0.0
        };
    }

    errors
}
