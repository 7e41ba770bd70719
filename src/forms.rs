//! Analytic forms for experimenting with fits to 1-D data.
//!
//! Each form is a pure function of the independent variable and an ordered
//! coefficient sequence. The registry is an immutable mapping from
//! human-readable names to form functions: [`available`] lists the names,
//! [`load`] resolves one. Forms are plain functions too, so they can be
//! called directly without going through the registry.

use ndarray::Array1;
use thiserror::Error;

use crate::model::ModelFunction;

/// Errors raised by the forms registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Unknown form '{0}'")]
    UnknownForm(String),

    /// The form does not support this coefficient count; the payload is
    /// the offending coefficient sequence.
    #[error("Unsupported coefficient count for this form: {0:?}")]
    UnsupportedArity(Vec<f64>),
}

/// A form function: independent variable plus ordered coefficients.
pub type FormFn = fn(&Array1<f64>, &[f64]) -> Result<Array1<f64>, FormError>;

/// The registered form names, in registry order.
pub fn available() -> &'static [&'static str] {
    &["linear", "polynomial", "exponential", "single power law"]
}

/// Look up a form by its registered name.
pub fn load(name: &str) -> Result<FormFn, FormError> {
    match name {
        "linear" => Ok(linear as FormFn),
        "polynomial" => Ok(polynomial as FormFn),
        "exponential" => Ok(exponential as FormFn),
        "single power law" => Ok(single_power_law as FormFn),
        _ => Err(FormError::UnknownForm(name.to_string())),
    }
}

/// Wrap a registered form into a [`ModelFunction`] with the given
/// parameter names, ready for fitting.
pub fn model(name: &str, param_names: &[&str]) -> Result<ModelFunction, FormError> {
    let form = load(name)?;
    Ok(ModelFunction::new(param_names.iter().copied(), move |x, p| {
        form(x, p).map_err(Into::into)
    }))
}

/// Functional form of a straight line: `c0 + c1*x`.
pub fn linear(x: &Array1<f64>, c: &[f64]) -> Result<Array1<f64>, FormError> {
    match *c {
        [c0, c1] => Ok(x.mapv(|xv| c0 + xv * c1)),
        _ => Err(FormError::UnsupportedArity(c.to_vec())),
    }
}

/// Functional form of a polynomial: `sum(c[p] * x^p)`.
///
/// Any coefficient count is accepted; no coefficients yields zeros.
pub fn polynomial(x: &Array1<f64>, cs: &[f64]) -> Result<Array1<f64>, FormError> {
    let mut y = Array1::zeros(x.len());
    for (p, &c) in cs.iter().enumerate() {
        y = y + x.mapv(|xv| c * xv.powi(p as i32));
    }
    Ok(y)
}

/// Functional form of an exponential, dispatched on coefficient count:
/// 1: `c0*exp(x)`, 2: `c0*exp(c1*x)`, 3: `c0*exp(c1*x + c2)`,
/// 4: `c0*exp(c1*x + c2) + c3`. Other counts are unsupported.
pub fn exponential(x: &Array1<f64>, c: &[f64]) -> Result<Array1<f64>, FormError> {
    match *c {
        [c0] => Ok(x.mapv(|xv| c0 * xv.exp())),
        [c0, c1] => Ok(x.mapv(|xv| c0 * (c1 * xv).exp())),
        [c0, c1, c2] => Ok(x.mapv(|xv| c0 * (c1 * xv + c2).exp())),
        [c0, c1, c2, c3] => Ok(x.mapv(|xv| c0 * (c1 * xv + c2).exp() + c3)),
        _ => Err(FormError::UnsupportedArity(c.to_vec())),
    }
}

/// Functional form of a single power law: `c0 * x^c1`.
pub fn single_power_law(x: &Array1<f64>, c: &[f64]) -> Result<Array1<f64>, FormError> {
    match *c {
        [c0, c1] => Ok(x.mapv(|xv| c0 * xv.powf(c1))),
        _ => Err(FormError::UnsupportedArity(c.to_vec())),
    }
}
