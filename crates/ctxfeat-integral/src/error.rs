//! Error types for ctxfeat-integral

use thiserror::Error;

/// Errors that can occur while building or querying integral tables
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegralError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] ctxfeat_core::Error),

    /// Histogram needs at least one bin
    #[error("invalid bin count: {0} (must be >= 1)")]
    InvalidBins(usize),

    /// Overlap fraction outside `[0, 1)`
    #[error("invalid overlap fraction: {0} (must be in [0, 1))")]
    InvalidOverlap(f64),

    /// Gaussian width not strictly positive
    #[error("invalid sigma: {0} (must be > 0)")]
    InvalidSigma(f64),

    /// A source value the binning strategy cannot place
    #[error("value {value} at (y={y}, x={x}, c={c}) is out of range for binning")]
    OutOfRangeValue {
        value: f64,
        y: usize,
        x: usize,
        c: usize,
    },

    /// 3D counterpart of `OutOfRangeValue`
    #[error("value {value} at (y={y}, x={x}, z={z}, c={c}) is out of range for binning")]
    OutOfRangeVoxel {
        value: f64,
        y: usize,
        x: usize,
        z: usize,
        c: usize,
    },

    /// Plane index past the table's plane count
    #[error("plane {plane} out of range (table has {planes} planes)")]
    PlaneOutOfRange { plane: usize, planes: usize },
}

/// Result type for integral table operations
pub type IntegralResult<T> = Result<T, IntegralError>;
