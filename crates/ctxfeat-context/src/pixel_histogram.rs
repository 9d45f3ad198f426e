//! Per-pixel histograms
//!
//! The bin weights of each pixel on its own, without any window. Useful as
//! features directly and as the per-pixel input of the integral histogram.

use std::time::Instant;

use crate::error::ContextResult;
use crate::options::check_classes;
use ctxfeat_core::ChannelImage;
use ctxfeat_integral::{HistogramOptions, weight_planes};

/// Bin weights of every class at every pixel.
///
/// Returns an `(H, W, C * nbins)` image; plane `c * nbins + b` is the weight
/// of bin `b` for class `c`.
///
/// # Errors
///
/// - `TooFewChannels` for fewer than two classes
/// - invalid options, or a value the strategy cannot bin (see
///   [`BinWeighting`](ctxfeat_integral::BinWeighting))
pub fn pixel_histogram_2d(
    pred: &ChannelImage,
    options: &HistogramOptions,
) -> ContextResult<ChannelImage> {
    check_classes(pred.channels())?;
    let start = Instant::now();
    let out = weight_planes(pred, options)?;
    log::debug!(
        "pixel histograms on {}x{} ({} classes, {} bins, {:?}) in {:?}",
        pred.height(),
        pred.width(),
        pred.channels(),
        options.nbins,
        options.weighting,
        start.elapsed()
    );
    Ok(out)
}
