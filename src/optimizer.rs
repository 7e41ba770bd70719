//! The optimizer capability and its Levenberg-Marquardt realization.
//!
//! The fit core treats the solver as a black box: it hands over a reduced
//! objective, an initial guess and bounds, and gets back best-fit values
//! and a covariance matrix. [`Optimizer`] is that seam; the shipped
//! implementation adapts the `levenberg-marquardt` crate behind it.

use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::{storage::Owned, DVector, Dyn, Matrix, Vector};
use ndarray::{Array1, Array2};

use crate::context::{Bounds, BoundsTransform, FitContext};
use crate::dataset::Dataset;
use crate::error::{FlexiFitError, Result};
use crate::fit::assemble_full;
use crate::model::ModelFunction;
use crate::uncertainty::covariance_from_jacobian;
use crate::utils::{finite_difference, matrix_convert};

/// The reduced objective: the model with its fixed parameters baked in,
/// exposing only the free parameters to the optimizer.
pub struct Objective<'a> {
    model: &'a ModelFunction,
    context: &'a FitContext,
    dataset: &'a Dataset,
}

impl<'a> Objective<'a> {
    pub fn new(model: &'a ModelFunction, context: &'a FitContext, dataset: &'a Dataset) -> Self {
        Self {
            model,
            context,
            dataset,
        }
    }

    /// Residuals `ydata - f(xdata)` at the given free-parameter values
    /// (in `free` order).
    pub fn residuals(&self, free_values: &[f64]) -> Result<Array1<f64>> {
        let full = assemble_full(self.context, self.model.param_names(), free_values)?;
        let y_pred = self.model.eval(self.dataset.xdata(), &full)?;
        Ok(self.dataset.ydata() - &y_pred)
    }

    /// Number of residuals (data points).
    pub fn residual_count(&self) -> usize {
        self.dataset.len()
    }

    /// Number of free parameters.
    pub fn free_count(&self) -> usize {
        self.context.n_free()
    }
}

/// What an optimizer hands back: free-ordered best-fit values and their
/// covariance, plus bookkeeping for the fit report.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub values: Array1<f64>,
    pub covariance: Array2<f64>,
    /// Sum of squared residuals at the solution.
    pub cost: f64,
    /// Residual evaluations spent by the solver.
    pub nfev: usize,
    /// The solver's termination diagnostic.
    pub message: String,
}

/// A nonlinear least-squares optimizer capability.
pub trait Optimizer {
    /// Fit the reduced objective seeded at `p0` and constrained to
    /// `bounds` (one entry per free parameter, in `p0` order).
    ///
    /// Implementations fail with [`FlexiFitError::Convergence`] when the
    /// underlying solver gives up, preserving its diagnostic.
    fn curve_fit(
        &self,
        objective: &Objective<'_>,
        p0: &Array1<f64>,
        bounds: &[Bounds],
    ) -> Result<FitOutcome>;
}

/// Adapter presenting the reduced objective to the `levenberg-marquardt`
/// solver.
///
/// The solver iterates over unbounded internal coordinates; every
/// evaluation maps them through the per-parameter [`BoundsTransform`]
/// before the model sees them.
struct CurveFitProblem<'a> {
    objective: &'a Objective<'a>,
    transforms: Vec<BoundsTransform>,
    internal: DVector<f64>,
}

impl CurveFitProblem<'_> {
    fn external_at(&self, internal: impl Iterator<Item = f64>) -> Vec<f64> {
        internal
            .zip(&self.transforms)
            .map(|(v, t)| t.to_external(v))
            .collect()
    }
}

impl LeastSquaresProblem<f64, Dyn, Dyn> for CurveFitProblem<'_> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    fn set_params(&mut self, x: &Vector<f64, Dyn, Self::ParameterStorage>) {
        self.internal = x.clone_owned();
    }

    fn params(&self) -> Vector<f64, Dyn, Self::ParameterStorage> {
        self.internal.clone()
    }

    fn residuals(&self) -> Option<Vector<f64, Dyn, Self::ResidualStorage>> {
        let trial = self.external_at(self.internal.iter().copied());
        let r = self.objective.residuals(&trial).ok()?;
        Some(matrix_convert::ndarray_vec_to_nalgebra(&r))
    }

    fn jacobian(&self) -> Option<Matrix<f64, Dyn, Dyn, Self::JacobianStorage>> {
        let internal = matrix_convert::nalgebra_vec_to_ndarray(&self.internal);
        let jac = finite_difference::jacobian(
            |p| {
                let trial = self.external_at(p.iter().copied());
                self.objective.residuals(&trial)
            },
            &internal,
            None,
        )
        .ok()?;
        Some(matrix_convert::ndarray_to_nalgebra(&jac))
    }
}

/// Levenberg-Marquardt realization of [`Optimizer`], backed by the
/// `levenberg-marquardt` crate.
#[derive(Debug, Clone, Copy)]
pub struct LevenbergMarquardtOptimizer {
    /// Relative tolerance on the cost function.
    pub ftol: f64,
    /// Relative tolerance on the parameter step.
    pub xtol: f64,
    /// Orthogonality tolerance between residuals and Jacobian columns.
    pub gtol: f64,
    /// Factor for the maximal number of residual evaluations: the solver
    /// gives up after `patience * (n_free + 1)` of them.
    pub patience: usize,
}

impl Default for LevenbergMarquardtOptimizer {
    fn default() -> Self {
        Self {
            ftol: 1e-10,
            xtol: 1e-10,
            gtol: 1e-10,
            patience: 100,
        }
    }
}

impl Optimizer for LevenbergMarquardtOptimizer {
    fn curve_fit(
        &self,
        objective: &Objective<'_>,
        p0: &Array1<f64>,
        bounds: &[Bounds],
    ) -> Result<FitOutcome> {
        let n_free = p0.len();
        if bounds.len() != n_free {
            return Err(FlexiFitError::DimensionMismatch(format!(
                "Expected {} bounds, got {}",
                n_free,
                bounds.len()
            )));
        }

        let transforms: Vec<BoundsTransform> =
            bounds.iter().map(|b| BoundsTransform::new(*b)).collect();

        // Seed in internal coordinates; fails if p0 lies outside bounds.
        let mut internal0 = DVector::zeros(n_free);
        for (i, transform) in transforms.iter().enumerate() {
            internal0[i] = transform.to_internal(p0[i])?;
        }

        let problem = CurveFitProblem {
            objective,
            transforms,
            internal: internal0,
        };

        let lm = LevenbergMarquardt::new()
            .with_ftol(self.ftol)
            .with_xtol(self.xtol)
            .with_gtol(self.gtol)
            .with_patience(self.patience);
        let (solved, report) = lm.minimize(problem);

        if !report.termination.was_successful() {
            return Err(FlexiFitError::Convergence(format!(
                "{:?} after {} residual evaluations",
                report.termination, report.number_of_evaluations
            )));
        }

        let values = Array1::from_vec(solved.external_at(solved.internal.iter().copied()));

        // Cost and covariance are evaluated at the solution in external
        // coordinates, so the bound transforms drop out of the
        // uncertainties.
        let residuals = objective.residuals(&values.to_vec())?;
        let cost: f64 = residuals.iter().map(|r| r * r).sum();

        let dof = objective.residual_count().saturating_sub(n_free);
        let redchi = if dof > 0 {
            cost / dof as f64
        } else {
            f64::INFINITY
        };

        let jac = finite_difference::jacobian(
            |p| {
                let trial: Vec<f64> = p.iter().copied().collect();
                objective.residuals(&trial)
            },
            &values,
            None,
        )?;
        let covariance = covariance_from_jacobian(&jac, redchi);

        Ok(FitOutcome {
            values,
            covariance,
            cost,
            nfev: report.number_of_evaluations,
            message: format!("{:?}", report.termination),
        })
    }
}
