//! ctxfeat-context - Context features for pixel-wise classification
//!
//! Given a class-probability map (`C` channels per pixel), this crate
//! derives per-pixel features describing the class distribution around
//! each pixel:
//!
//! - [`ring`] - means, variances and histograms over nested square shells
//! - [`star`] - point samples at 8 (2D) or 26 (3D) neighbor offsets
//! - [`pixel_histogram`] - bin weights of each pixel on its own
//! - [`solver`] - the exchange format with an external weight solver
//!
//! Windows or neighbors that leave the grid never fail; they read as the
//! uniform value `1 / C`. Invalid input fails before any output is
//! written.
//!
//! # Examples
//!
//! ```
//! use ctxfeat_core::ChannelImage;
//! use ctxfeat_context::ring_means_2d;
//!
//! let pred = ChannelImage::from_fn(9, 9, 2, |_, x, c| {
//!     let p = x as f64 / 8.0;
//!     if c == 0 { p } else { 1.0 - p }
//! })
//! .unwrap();
//! let feats = ring_means_2d(&pred, &[1, 3]).unwrap();
//! assert_eq!(feats.channels(), 4);
//! // Radius 3 does not fit at column 1
//! assert_eq!(feats.get(4, 1, 1).unwrap(), 0.5);
//! ```
//!
//! # Features
//!
//! - `rayon`: fill output rows in parallel once the tables are built

mod error;
pub mod options;
pub mod pixel_histogram;
pub mod ring;
mod scan;
pub mod solver;
pub mod star;

pub use ctxfeat_integral::{BinWeighting, HistogramOptions};
pub use error::{ContextError, ContextResult};
pub use options::{DEFAULT_STAR_AVERAGE_SIZE, MIN_CLASSES, StarOptions};
pub use pixel_histogram::pixel_histogram_2d;
pub use ring::{
    ring_histograms_2d, ring_histograms_2d_from_table, ring_histograms_2d_into, ring_means_2d,
    ring_means_2d_from_table, ring_means_2d_into, ring_means_3d, ring_means_3d_from_table,
    ring_means_3d_into, ring_means_variances_2d, ring_means_variances_2d_from_table,
    ring_means_variances_2d_into, ring_means_variances_3d, ring_means_variances_3d_from_table,
    ring_means_variances_3d_into,
};
pub use solver::{LinearWeights, QuadraticProgram, QuadraticSolver, solve_weights};
pub use star::{
    FeatureMatrix, STAR_OFFSETS_2D, STAR_OFFSETS_3D, star_features_2d, star_features_3d,
    star_features_3d_at,
};
