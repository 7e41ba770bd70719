//! The free/fixed parameter partition.
//!
//! A [`FitContext`] translates a human-friendly declaration ("these
//! parameters are free, starting here, bounded here; these other parameters
//! are fixed at these values") into the strictly-ordered vectors a generic
//! least-squares optimizer requires, and guarantees the partition is
//! complete and non-overlapping. The `free` list's order is authoritative:
//! `p0`, `bounds`, the optimizer's trial vector and the fitted values all
//! share it.

use std::collections::HashMap;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::bounds::Bounds;

/// Starting guess used for free parameters without an explicit `initial`
/// entry.
pub const DEFAULT_INITIAL: f64 = 1.0;

/// Errors raised when a free/fixed declaration fails to partition the
/// model's parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartitionError {
    #[error("Parameter '{name}' is declared both free and fixed")]
    Overlap { name: String },

    #[error("Parameter '{name}' is neither free nor fixed")]
    Unassigned { name: String },

    #[error("'{name}' is not a parameter of the model")]
    UnknownParameter { name: String },

    #[error("Parameter '{name}' appears more than once in the free list")]
    DuplicateFree { name: String },

    #[error("{field} entry '{name}' does not name a free parameter")]
    NotFree { field: &'static str, name: String },

    #[error("Invalid bounds for parameter '{name}': lower ({lower}) must not exceed upper ({upper})")]
    InvalidBounds {
        name: String,
        lower: f64,
        upper: f64,
    },
}

/// An immutable free/fixed partition of a model's parameters.
///
/// Constructed once at fit setup time and never mutated; a new fit requires
/// a new context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitContext {
    free: Vec<String>,
    fixed: HashMap<String, f64>,
    initial: HashMap<String, f64>,
    lower: HashMap<String, f64>,
    upper: HashMap<String, f64>,
}

impl FitContext {
    /// Validate a declaration against the model's full parameter list and
    /// build the context.
    ///
    /// `full` is the complete, ordered parameter list of the model function,
    /// independent variable excluded. `free` and the keys of `fixed` must
    /// partition it exactly; `initial`, `lower` and `upper` may only
    /// reference free parameters.
    pub fn new<S: AsRef<str>>(
        full: &[S],
        free: Vec<String>,
        fixed: HashMap<String, f64>,
        initial: HashMap<String, f64>,
        lower: HashMap<String, f64>,
        upper: HashMap<String, f64>,
    ) -> Result<Self, PartitionError> {
        let is_full = |name: &str| full.iter().any(|n| n.as_ref() == name);

        for (i, name) in free.iter().enumerate() {
            if free[..i].contains(name) {
                return Err(PartitionError::DuplicateFree { name: name.clone() });
            }
            if !is_full(name) {
                return Err(PartitionError::UnknownParameter { name: name.clone() });
            }
        }

        for name in fixed.keys() {
            if !is_full(name) {
                return Err(PartitionError::UnknownParameter { name: name.clone() });
            }
            if free.contains(name) {
                return Err(PartitionError::Overlap { name: name.clone() });
            }
        }

        for name in full {
            let name = name.as_ref();
            if !free.iter().any(|n| n == name) && !fixed.contains_key(name) {
                return Err(PartitionError::Unassigned {
                    name: name.to_string(),
                });
            }
        }

        for (field, map) in [("initial", &initial), ("lower", &lower), ("upper", &upper)] {
            for name in map.keys() {
                if !free.contains(name) {
                    return Err(PartitionError::NotFree {
                        field,
                        name: name.clone(),
                    });
                }
            }
        }

        for name in &free {
            let lo = lower.get(name).copied().unwrap_or(f64::NEG_INFINITY);
            let up = upper.get(name).copied().unwrap_or(f64::INFINITY);
            if lo > up {
                return Err(PartitionError::InvalidBounds {
                    name: name.clone(),
                    lower: lo,
                    upper: up,
                });
            }
        }

        Ok(Self {
            free,
            fixed,
            initial,
            lower,
            upper,
        })
    }

    /// Start a chaining declaration, validated by
    /// [`FitContextBuilder::build`].
    pub fn builder() -> FitContextBuilder {
        FitContextBuilder::default()
    }

    /// The free parameter names, in the order the optimizer sees them.
    pub fn free(&self) -> &[String] {
        &self.free
    }

    /// The fixed parameter values.
    pub fn fixed(&self) -> &HashMap<String, f64> {
        &self.fixed
    }

    /// The explicit starting guesses.
    pub fn initial(&self) -> &HashMap<String, f64> {
        &self.initial
    }

    /// The explicit lower bounds.
    pub fn lower(&self) -> &HashMap<String, f64> {
        &self.lower
    }

    /// The explicit upper bounds.
    pub fn upper(&self) -> &HashMap<String, f64> {
        &self.upper
    }

    /// Number of free parameters.
    pub fn n_free(&self) -> usize {
        self.free.len()
    }

    /// The fixed value of `name`, if `name` is fixed.
    pub fn fixed_value(&self, name: &str) -> Option<f64> {
        self.fixed.get(name).copied()
    }

    /// The initial-guess vector, ordered to match [`FitContext::free`].
    ///
    /// Free parameters without an explicit guess start at
    /// [`DEFAULT_INITIAL`].
    pub fn p0(&self) -> Array1<f64> {
        Array1::from_iter(
            self.free
                .iter()
                .map(|name| self.initial.get(name).copied().unwrap_or(DEFAULT_INITIAL)),
        )
    }

    /// The `(lowers, uppers)` bound vectors, ordered to match
    /// [`FitContext::free`]. Missing entries are unbounded.
    pub fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
        let per_free = self.free_bounds();
        (
            Array1::from_iter(per_free.iter().map(|b| b.min)),
            Array1::from_iter(per_free.iter().map(|b| b.max)),
        )
    }

    /// Per-free-parameter [`Bounds`], in `free` order.
    pub fn free_bounds(&self) -> Vec<Bounds> {
        self.free
            .iter()
            .map(|name| Bounds {
                min: self.lower.get(name).copied().unwrap_or(f64::NEG_INFINITY),
                max: self.upper.get(name).copied().unwrap_or(f64::INFINITY),
            })
            .collect()
    }
}

/// Chaining declaration of a free/fixed partition.
///
/// All validation is deferred to [`FitContextBuilder::build`], which needs
/// the model's full parameter list.
#[derive(Debug, Clone, Default)]
pub struct FitContextBuilder {
    free: Vec<String>,
    fixed: HashMap<String, f64>,
    initial: HashMap<String, f64>,
    lower: HashMap<String, f64>,
    upper: HashMap<String, f64>,
}

impl FitContextBuilder {
    /// Append names to the free list, preserving their order.
    pub fn free<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.free.extend(names.into_iter().map(Into::into));
        self
    }

    /// Hold `name` constant at `value` during the fit.
    pub fn fix(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fixed.insert(name.into(), value);
        self
    }

    /// Set the starting guess for a free parameter.
    pub fn initial(mut self, name: impl Into<String>, value: f64) -> Self {
        self.initial.insert(name.into(), value);
        self
    }

    /// Set the lower bound for a free parameter.
    pub fn lower(mut self, name: impl Into<String>, value: f64) -> Self {
        self.lower.insert(name.into(), value);
        self
    }

    /// Set the upper bound for a free parameter.
    pub fn upper(mut self, name: impl Into<String>, value: f64) -> Self {
        self.upper.insert(name.into(), value);
        self
    }

    /// Validate the declaration against the model's full parameter list.
    pub fn build<S: AsRef<str>>(self, full: &[S]) -> Result<FitContext, PartitionError> {
        FitContext::new(
            full,
            self.free,
            self.fixed,
            self.initial,
            self.lower,
            self.upper,
        )
    }
}
