//! ctxfeat-integral - Summed-area tables and region-sum queries
//!
//! This crate provides the accelerator shared by every context feature:
//!
//! - [`IntegralImage`] / [`IntegralVolume`] - prefix sums (and prefix sums of
//!   squares) over 2D and 3D multi-channel grids
//! - [`IntegralHistogram`] / [`IntegralHistogram3d`] - prefix sums of per-bin
//!   weights, for any [`BinWeighting`]
//! - Window queries by corner inclusion-exclusion, returning
//!   [`Lookup::OutOfBounds`](ctxfeat_core::Lookup) when the window leaves
//!   the grid
//!
//! Tables are plain values: build one, then pass it to as many queries as
//! needed.
//!
//! # Examples
//!
//! ```
//! use ctxfeat_core::{ChannelImage, Lookup};
//! use ctxfeat_integral::IntegralImage;
//!
//! let img = ChannelImage::new_with_value(5, 5, 1, 1.0).unwrap();
//! let ii = IntegralImage::build(&img).unwrap();
//! assert_eq!(ii.window_sum((2, 2), 1, 0), Lookup::InBounds(9.0));
//! assert_eq!(ii.window_sum((0, 2), 1, 0), Lookup::OutOfBounds);
//! ```

pub mod binning;
mod error;
pub mod histogram;
pub mod query;
pub mod table;

pub use binning::{
    BinWeighting, DEFAULT_FRAC_OVERLAP, DEFAULT_NBINS, DEFAULT_SIGMA, HistogramOptions,
    hard_bin_index,
};
pub use error::{IntegralError, IntegralResult};
pub use histogram::{IntegralHistogram, IntegralHistogram3d, weight_planes};
pub use table::{IntegralImage, IntegralVolume};
