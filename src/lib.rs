//! # flexifit
//!
//! `flexifit` fits a parametric model to 1-D data while selectively
//! holding some model parameters fixed at known values and letting others
//! vary, without rewriting the model function for each combination.
//!
//! The library provides:
//! - A [`FitContext`] declaring which parameters are free and which are
//!   fixed, with starting guesses and bounds for the free ones
//! - A [`FlexiFit`] that reduces the model to its free parameters, drives
//!   a nonlinear least-squares solver, and reports values and covariance
//!   in the original parameter namespace
//! - A small registry of analytic [`forms`] for quick experiments
//!
//! ## Basic Usage
//!
//! ```
//! use flexifit::{FitContext, FlexiFit, ModelFunction};
//! use ndarray::Array1;
//!
//! // y = c0 * x + c1, with the intercept pinned at zero.
//! let model = ModelFunction::new(["c0", "c1"], |x, p| {
//!     let (c0, c1) = (p[0], p[1]);
//!     Ok(x.mapv(|xv| c0 * xv + c1))
//! });
//!
//! let xdata = Array1::linspace(0.0, 1.0, 20);
//! let ydata = xdata.mapv(|xv| 2.0 * xv);
//!
//! let fit = FlexiFit::new(
//!     model,
//!     FitContext::builder().free(["c0"]).fix("c1", 0.0),
//!     xdata,
//!     ydata,
//! )?;
//!
//! assert!((fit.values()[0] - 2.0).abs() < 1e-6);
//! # Ok::<(), flexifit::FlexiFitError>(())
//! ```

// Public modules
pub mod error;

// Parameter partition
pub mod context;

pub mod dataset;

pub mod fit;

pub mod forms;

pub mod model;

pub mod optimizer;

pub mod uncertainty;

mod utils;

// Re-exports for convenience
pub use error::{FlexiFitError, Result};

pub use context::{Bounds, FitContext, FitContextBuilder, PartitionError};

pub use dataset::Dataset;

pub use fit::{FitReport, FlexiFit};

pub use forms::FormError;

pub use model::ModelFunction;

pub use optimizer::{FitOutcome, LevenbergMarquardtOptimizer, Objective, Optimizer};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
