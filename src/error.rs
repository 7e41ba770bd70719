use thiserror::Error;

/// Error types for the flexifit library.
#[derive(Error, Debug)]
pub enum FlexiFitError {
    /// The free/fixed declaration does not partition the model's parameters.
    #[error("Partition error: {0}")]
    Partition(#[from] crate::context::PartitionError),

    /// The underlying optimizer failed to converge or failed internally.
    /// The payload is the solver's own diagnostic.
    #[error("Fit failed to converge: {0}")]
    Convergence(String),

    /// Error raised by the analytic forms registry.
    #[error("Form error: {0}")]
    Form(#[from] crate::forms::FormError),

    /// Error for boundary constraint violations.
    #[error("Bounds error: {0}")]
    Bounds(#[from] crate::context::BoundsError),

    /// Error indicating a mismatch in vector or matrix dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error during model function evaluation.
    #[error("Function evaluation error: {0}")]
    FunctionEvaluation(String),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for flexifit operations.
pub type Result<T> = std::result::Result<T, FlexiFitError>;

/// Extensions for converting from other error types.
impl From<String> for FlexiFitError {
    fn from(s: String) -> Self {
        FlexiFitError::Other(s)
    }
}

impl From<&str> for FlexiFitError {
    fn from(s: &str) -> Self {
        FlexiFitError::Other(s.to_string())
    }
}
