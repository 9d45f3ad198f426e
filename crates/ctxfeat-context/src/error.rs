//! Error types for ctxfeat-context

use thiserror::Error;

/// Errors that can occur while extracting context features
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContextError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] ctxfeat_core::Error),

    /// Integral table error
    #[error("integral table error: {0}")]
    Integral(#[from] ctxfeat_integral::IntegralError),

    /// Radius list empty, unordered, or otherwise unusable
    #[error("invalid radii: {0}")]
    InvalidRadii(String),

    /// Prediction map with fewer classes than the extractor needs
    #[error("too few channels: need at least {required}, got {actual}")]
    TooFewChannels { required: usize, actual: usize },

    /// Caller-provided output or companion table has the wrong shape
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Star averaging box must have an odd side of at least 1
    #[error("invalid average size: {0} (must be odd and >= 1)")]
    InvalidAverageSize(usize),

    /// External solver failure or malformed solver output
    #[error("solver error: {0}")]
    Solver(String),
}

/// Result type for context feature operations
pub type ContextResult<T> = Result<T, ContextError>;
