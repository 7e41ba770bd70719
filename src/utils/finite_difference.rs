//! Finite difference methods for numerical differentiation.

use ndarray::{Array1, Array2};

use crate::error::Result;

/// Default step size for finite differences.
const DEFAULT_EPSILON: f64 = 1e-8;

/// Compute the Jacobian of a residual function using forward differences.
///
/// `J[i, j] = d residual[i] / d param[j]`, with the step for each parameter
/// scaled to the parameter's magnitude.
pub fn jacobian<F>(f: F, params: &Array1<f64>, epsilon: Option<f64>) -> Result<Array2<f64>>
where
    F: Fn(&Array1<f64>) -> Result<Array1<f64>>,
{
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    let n_params = params.len();

    let residuals = f(params)?;
    let n_residuals = residuals.len();

    let mut jac = Array2::zeros((n_residuals, n_params));

    for j in 0..n_params {
        let mut params_perturbed = params.clone();

        // Adapt epsilon to parameter scale
        let param_j = params[j];
        let eps_j = if param_j.abs() > eps {
            param_j.abs() * eps
        } else {
            eps
        };

        params_perturbed[j] += eps_j;

        let residuals_perturbed = f(&params_perturbed)?;

        for i in 0..n_residuals {
            jac[[i, j]] = (residuals_perturbed[i] - residuals[i]) / eps_j;
        }
    }

    Ok(jac)
}
