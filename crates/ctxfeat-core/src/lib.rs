//! ctxfeat Core - Basic data structures for spatial context features
//!
//! This crate provides the fundamental data structures used throughout
//! the ctxfeat crates:
//!
//! - [`ChannelImage`] - 2D grid with several `f64` channels per pixel
//! - [`ChannelVolume`] - 3D grid with several `f64` channels per voxel
//! - [`Radius3`] - per-axis window radius for anisotropic 3D windows
//! - [`Lookup`] - tagged result of a lookup that may leave the grid
//!
//! Prediction maps, integral tables and feature outputs all share these
//! containers, so every stage hands the next one plain owned values.

pub mod error;
pub mod image;
pub mod lookup;
pub mod radius;
pub mod volume;

pub use error::{Error, Result};
pub use image::ChannelImage;
pub use lookup::{Lookup, offset_index, uniform_sentinel};
pub use radius::{Radius3, side, window_area};
pub use volume::ChannelVolume;
