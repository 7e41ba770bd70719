//! The model-function contract.
//!
//! Rust closures carry no reflectable signature, so the full parameter list
//! is an explicit declaration attached to the callable: position `i` of the
//! declared name list corresponds to the `i`-th entry of the parameter
//! slice the function receives. The independent variable is passed
//! separately and is never part of the list.

use std::fmt;

use ndarray::Array1;

use crate::error::{FlexiFitError, Result};

type EvalFn = Box<dyn Fn(&Array1<f64>, &[f64]) -> Result<Array1<f64>> + Send + Sync>;

/// A model function together with its declared parameter names.
///
/// The callable takes the independent-variable samples and the full
/// parameter values (in declaration order) and returns the model's
/// predicted values, elementwise over `x`.
pub struct ModelFunction {
    param_names: Vec<String>,
    eval_fn: EvalFn,
}

impl ModelFunction {
    /// Create a model function.
    ///
    /// # Examples
    ///
    /// ```
    /// use flexifit::ModelFunction;
    /// use ndarray::array;
    ///
    /// let model = ModelFunction::new(["c0", "c1"], |x, p| {
    ///     let (c0, c1) = (p[0], p[1]);
    ///     Ok(x.mapv(|xv| c0 + xv * c1))
    /// });
    ///
    /// let y = model.eval(&array![0.0, 1.0], &[1.0, 2.0]).unwrap();
    /// assert_eq!(y.to_vec(), vec![1.0, 3.0]);
    /// ```
    pub fn new<I, S, F>(param_names: I, eval_fn: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Array1<f64>, &[f64]) -> Result<Array1<f64>> + Send + Sync + 'static,
    {
        Self {
            param_names: param_names.into_iter().map(Into::into).collect(),
            eval_fn: Box::new(eval_fn),
        }
    }

    /// The declared parameter names, independent variable excluded.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Number of declared parameters.
    pub fn param_count(&self) -> usize {
        self.param_names.len()
    }

    /// Evaluate the model at `x` with the full parameter values in
    /// declaration order.
    pub fn eval(&self, x: &Array1<f64>, params: &[f64]) -> Result<Array1<f64>> {
        if params.len() != self.param_names.len() {
            return Err(FlexiFitError::DimensionMismatch(format!(
                "Model declares {} parameters, got {} values",
                self.param_names.len(),
                params.len()
            )));
        }

        let y = (self.eval_fn)(x, params)?;

        if y.len() != x.len() {
            return Err(FlexiFitError::DimensionMismatch(format!(
                "Model returned {} values for {} samples",
                y.len(),
                x.len()
            )));
        }

        Ok(y)
    }
}

impl fmt::Debug for ModelFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelFunction")
            .field("param_names", &self.param_names)
            .finish()
    }
}
