//! Error types for ctxfeat-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Every variant is a caller error: the offending value or shape is carried
//! along so it can be reported, and nothing is ever clamped or coerced.

use thiserror::Error;

/// ctxfeat core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A grid axis (or the channel axis) has zero length
    #[error("invalid grid dimensions: {0:?}")]
    InvalidDimension(Vec<usize>),

    /// Two shapes that must agree do not
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A source value lies outside the range an operation requires
    #[error("value {value} at flat index {index} is outside [0, 1]")]
    OutOfRangeValue { value: f64, index: usize },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
