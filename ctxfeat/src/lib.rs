//! ctxfeat - Spatial context features for pixel-wise classification
//!
//! Turns a per-pixel class-probability map into features describing the
//! class distribution around every pixel, using summed-area tables so that
//! window statistics cost the same at any radius.
//!
//! # Overview
//!
//! - Multi-channel 2D and 3D grids (this crate's root)
//! - Summed-area tables and integral histograms ([`integral`])
//! - Ring, star and histogram context features ([`context`])
//!
//! # Example
//!
//! ```
//! use ctxfeat::ChannelImage;
//! use ctxfeat::context::{StarOptions, ring_means_2d, star_features_2d};
//!
//! let pred = ChannelImage::new_with_value(16, 16, 3, 1.0 / 3.0).unwrap();
//! let rings = ring_means_2d(&pred, &[1, 2, 4]).unwrap();
//! assert_eq!(rings.channels(), 9);
//!
//! let star = star_features_2d(&pred, &[2, 5], &StarOptions::averaged()).unwrap();
//! assert_eq!(star.channels(), 3 * 2 * 16);
//! ```

// Re-export core types (grids and lookups used everywhere)
pub use ctxfeat_core::*;

// Re-export the feature crates as modules
pub use ctxfeat_context as context;
pub use ctxfeat_integral as integral;
