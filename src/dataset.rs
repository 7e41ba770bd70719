//! The 1-D dataset a model is fit against.

use ndarray::Array1;

use crate::error::{FlexiFitError, Result};

/// Paired samples of the independent and dependent variables.
///
/// `xdata[i]` and `ydata[i]` belong together; the pairing is by index and
/// the arrays are immutable after construction. Non-finite samples are not
/// screened here — they reach the optimizer unmodified.
#[derive(Debug, Clone)]
pub struct Dataset {
    xdata: Array1<f64>,
    ydata: Array1<f64>,
}

impl Dataset {
    /// Create a dataset. Fails if the arrays differ in length.
    pub fn new(xdata: Array1<f64>, ydata: Array1<f64>) -> Result<Self> {
        if xdata.len() != ydata.len() {
            return Err(FlexiFitError::DimensionMismatch(format!(
                "Expected xdata and ydata to have the same length, got {} and {}",
                xdata.len(),
                ydata.len()
            )));
        }

        Ok(Self { xdata, ydata })
    }

    /// The independent-variable samples.
    pub fn xdata(&self) -> &Array1<f64> {
        &self.xdata
    }

    /// The observed dependent-variable samples.
    pub fn ydata(&self) -> &Array1<f64> {
        &self.ydata
    }

    /// Number of sample pairs.
    pub fn len(&self) -> usize {
        self.xdata.len()
    }

    /// Whether the dataset holds no samples.
    pub fn is_empty(&self) -> bool {
        self.xdata.is_empty()
    }
}
