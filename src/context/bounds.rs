//! Parameter bounds and the Minuit-style transform.
//!
//! A free parameter may carry a lower and/or upper bound. The optimizer we
//! adapt is unbounded, so bounds are enforced by letting it iterate over an
//! unbounded internal coordinate and mapping each trial back to a bounded
//! external value before the model is evaluated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must be less than max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Parameter value {value} is outside bounds: [{min}, {max}]")]
    ValueOutsideBounds { value: f64, min: f64, max: f64 },

    #[error("Infinite parameter value is not allowed")]
    InfiniteValue,
}

/// The bounds constraint on a single free parameter.
///
/// Either endpoint may be infinite; the default is unbounded on both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum allowed value for the parameter
    pub min: f64,

    /// Maximum allowed value for the parameter
    pub max: f64,
}

impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Bounds", 2)?;

        // Infinite endpoints become null so the JSON stays valid
        if self.min.is_infinite() && self.min.is_sign_negative() {
            state.serialize_field("min", &serde_json::Value::Null)?;
        } else {
            state.serialize_field("min", &self.min)?;
        }

        if self.max.is_infinite() && self.max.is_sign_positive() {
            state.serialize_field("max", &serde_json::Value::Null)?;
        } else {
            state.serialize_field("max", &self.max)?;
        }

        state.end()
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BoundsHelper {
            #[serde(default)]
            min: Option<f64>,

            #[serde(default)]
            max: Option<f64>,
        }

        let helper = BoundsHelper::deserialize(deserializer)?;

        Ok(Bounds {
            min: helper.min.unwrap_or(f64::NEG_INFINITY),
            max: helper.max.unwrap_or(f64::INFINITY),
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }
}

impl Bounds {
    /// Create a bounds constraint. Fails if `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        if min > max {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    /// An unbounded constraint (negative infinity to positive infinity).
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A constraint with only a lower bound.
    pub fn min_only(min: f64) -> Self {
        Self {
            min,
            max: f64::INFINITY,
        }
    }

    /// A constraint with only an upper bound.
    pub fn max_only(max: f64) -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max,
        }
    }

    /// Check if a value is within the bounds.
    pub fn is_within_bounds(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check if the parameter is bounded from below.
    pub fn has_lower_bound(&self) -> bool {
        self.min.is_finite()
    }

    /// Check if the parameter is bounded from above.
    pub fn has_upper_bound(&self) -> bool {
        self.max.is_finite()
    }

    /// Clamp a value to be within the bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Minuit-style parameter transformation for handling bounds constraints.
///
/// The optimizer works with unbounded parameters internally, while the
/// external values are constrained to be within the specified bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsTransform {
    bounds: Bounds,
}

impl BoundsTransform {
    /// Create a new transform for the given bounds.
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    /// Map an internal parameter value to its external (bounded) value.
    pub fn to_external(&self, internal_value: f64) -> f64 {
        if !self.bounds.has_lower_bound() && !self.bounds.has_upper_bound() {
            return internal_value;
        }

        if self.bounds.has_lower_bound() && !self.bounds.has_upper_bound() {
            return self.bounds.min - 1.0 + (internal_value * internal_value + 1.0).sqrt();
        }

        if !self.bounds.has_lower_bound() && self.bounds.has_upper_bound() {
            return self.bounds.max + 1.0 - (internal_value * internal_value + 1.0).sqrt();
        }

        let bound_range = self.bounds.max - self.bounds.min;
        self.bounds.min + (internal_value.sin() + 1.0) * bound_range / 2.0
    }

    /// Map an external parameter value to an internal value.
    ///
    /// Fails if the external value is non-finite or outside the bounds.
    pub fn to_internal(&self, external_value: f64) -> Result<f64, BoundsError> {
        if !external_value.is_finite() {
            return Err(BoundsError::InfiniteValue);
        }

        if !self.bounds.is_within_bounds(external_value) {
            return Err(BoundsError::ValueOutsideBounds {
                value: external_value,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }

        if !self.bounds.has_lower_bound() && !self.bounds.has_upper_bound() {
            return Ok(external_value);
        }

        if self.bounds.has_lower_bound() && !self.bounds.has_upper_bound() {
            return Ok(((external_value - self.bounds.min + 1.0).powi(2) - 1.0).sqrt());
        }

        if !self.bounds.has_lower_bound() && self.bounds.has_upper_bound() {
            return Ok(((self.bounds.max - external_value + 1.0).powi(2) - 1.0).sqrt());
        }

        let bound_range = self.bounds.max - self.bounds.min;
        let scaled = 2.0 * (external_value - self.bounds.min) / bound_range - 1.0;

        // keep asin's argument in [-1, 1] against rounding
        Ok(scaled.clamp(-1.0, 1.0).asin())
    }
}
