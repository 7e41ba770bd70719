//! Fit orchestration.
//!
//! [`FlexiFit`] performs the actual fit: it reduces the model function to a
//! function of only the free parameters (fixed parameters baked in as
//! constants), invokes the optimizer, and exposes results keyed by the
//! original free-parameter names and order.

use std::collections::HashMap;

use ndarray::{Array1, Array2};

use crate::context::{FitContext, FitContextBuilder};
use crate::dataset::Dataset;
use crate::error::{FlexiFitError, Result};
use crate::model::ModelFunction;
use crate::optimizer::{FitOutcome, LevenbergMarquardtOptimizer, Objective, Optimizer};
use crate::uncertainty::standard_errors_from_covariance;

/// Assemble the full positional argument list for the model.
///
/// Walks `full_names` in declaration order, substituting the fixed value
/// for fixed names and the entry of `free_values` corresponding to the
/// name's position in `free` otherwise. `free_values` is thus consumed in
/// `free` order, exactly as the optimizer presents its trial vector.
pub fn assemble_full(
    context: &FitContext,
    full_names: &[String],
    free_values: &[f64],
) -> Result<Vec<f64>> {
    if free_values.len() != context.n_free() {
        return Err(FlexiFitError::DimensionMismatch(format!(
            "Expected {} free values, got {}",
            context.n_free(),
            free_values.len()
        )));
    }

    let mut full = Vec::with_capacity(full_names.len());
    for name in full_names {
        if let Some(value) = context.fixed_value(name) {
            full.push(value);
        } else if let Some(i) = context.free().iter().position(|n| n == name) {
            full.push(free_values[i]);
        } else {
            return Err(FlexiFitError::Other(format!(
                "Parameter '{name}' is neither free nor fixed in this context"
            )));
        }
    }

    Ok(full)
}

/// Summary of a completed fit, alongside `values` and `covariance`.
#[derive(Debug, Clone)]
pub struct FitReport {
    /// Whether the fit succeeded. Failures abort construction, so a
    /// report you can hold always says true; the field mirrors the
    /// optimizer outcome for serialization into larger result sets.
    pub success: bool,
    /// Sum of squared residuals at the solution.
    pub cost: f64,
    /// `cost / (ndata - nfree)`; infinite without degrees of freedom.
    pub reduced_chi_square: f64,
    /// Residual evaluations spent by the optimizer.
    pub nfev: usize,
    /// The optimizer's termination diagnostic.
    pub message: String,
    /// Standard error per free parameter, from the covariance diagonal.
    pub standard_errors: HashMap<String, f64>,
}

/// A completed fit of a model against a dataset under a free/fixed
/// parameter partition.
///
/// Construction is eager: validation, partition, reduced-objective
/// construction and the optimizer invocation all happen in the
/// constructor, which returns only after the fit converged or failed.
/// Instances are immutable; re-fitting means constructing a new one.
/// Independent instances share nothing, so constructing them concurrently
/// needs no locking.
#[derive(Debug)]
pub struct FlexiFit {
    model: ModelFunction,
    context: FitContext,
    dataset: Dataset,
    values: Array1<f64>,
    covariance: Array2<f64>,
    report: FitReport,
}

impl FlexiFit {
    /// Fit with the default Levenberg-Marquardt optimizer.
    pub fn new(
        model: ModelFunction,
        partition: FitContextBuilder,
        xdata: Array1<f64>,
        ydata: Array1<f64>,
    ) -> Result<Self> {
        Self::with_optimizer(
            model,
            partition,
            xdata,
            ydata,
            &LevenbergMarquardtOptimizer::default(),
        )
    }

    /// Fit with a caller-supplied optimizer capability.
    pub fn with_optimizer(
        model: ModelFunction,
        partition: FitContextBuilder,
        xdata: Array1<f64>,
        ydata: Array1<f64>,
        optimizer: &dyn Optimizer,
    ) -> Result<Self> {
        let context = partition.build(model.param_names())?;
        let dataset = Dataset::new(xdata, ydata)?;

        let outcome = if context.n_free() == 0 {
            // Degenerate fit: nothing to estimate. Evaluate the residual
            // at the fixed values and skip the optimizer.
            let objective = Objective::new(&model, &context, &dataset);
            let residuals = objective.residuals(&[])?;
            let cost: f64 = residuals.iter().map(|r| r * r).sum();
            FitOutcome {
                values: Array1::zeros(0),
                covariance: Array2::zeros((0, 0)),
                cost,
                nfev: 1,
                message: "all parameters fixed; optimizer skipped".to_string(),
            }
        } else {
            if dataset.len() < context.n_free() {
                return Err(FlexiFitError::DimensionMismatch(format!(
                    "{} data points cannot constrain {} free parameters",
                    dataset.len(),
                    context.n_free()
                )));
            }

            let objective = Objective::new(&model, &context, &dataset);
            optimizer.curve_fit(&objective, &context.p0(), &context.free_bounds())?
        };

        let dof = dataset.len().saturating_sub(context.n_free());
        let reduced_chi_square = if dof > 0 {
            outcome.cost / dof as f64
        } else {
            f64::INFINITY
        };

        let stderr = standard_errors_from_covariance(&outcome.covariance);
        let standard_errors = context
            .free()
            .iter()
            .cloned()
            .zip(stderr.iter().copied())
            .collect();

        let report = FitReport {
            success: true,
            cost: outcome.cost,
            reduced_chi_square,
            nfev: outcome.nfev,
            message: outcome.message,
            standard_errors,
        };

        Ok(Self {
            model,
            context,
            dataset,
            values: outcome.values,
            covariance: outcome.covariance,
            report,
        })
    }

    /// The validated parameter partition.
    pub fn context(&self) -> &FitContext {
        &self.context
    }

    /// The fitted dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The model function.
    pub fn model(&self) -> &ModelFunction {
        &self.model
    }

    /// Best-fit estimates for the free parameters, in `free` order.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Covariance of the free parameters, `free`-ordered on both axes.
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Summary of the completed fit.
    pub fn report(&self) -> &FitReport {
        &self.report
    }

    /// Best-fit value of a free parameter, by name.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.context
            .free()
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// Evaluate the fitted model (best-fit free values plus the fixed
    /// values) at `x`.
    pub fn predict(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        let full = assemble_full(&self.context, self.model.param_names(), &self.values.to_vec())?;
        self.model.eval(x, &full)
    }
}
