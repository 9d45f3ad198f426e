//! Error types for the test framework

use thiserror::Error;

/// Errors reported by [`RegParams::into_result`](crate::RegParams::into_result)
#[derive(Debug, Error)]
pub enum TestError {
    /// Value comparison failed
    #[error(
        "value comparison failed at index {index}: expected {expected}, got {actual}, delta {delta}"
    )]
    ValueMismatch {
        index: usize,
        expected: f64,
        actual: f64,
        delta: f64,
    },

    /// Two arrays differ in length or shape
    #[error("shape comparison failed at index {index}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        index: usize,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// One or more comparisons in a regression test failed
    #[error("{test_name}_reg failed with {count} failure(s)")]
    Failed { test_name: String, count: usize },
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
