//! Integral histograms
//!
//! For a `C`-channel source and `nbins` bins, the table has `C * nbins`
//! planes; plane `c * nbins + j` is the prefix sum of bin `j`'s weight for
//! channel `c`. A window query on the table yields the window's histogram
//! in O(1) per plane.
//!
//! Every source value is checked against the strategy before anything is
//! accumulated, so a bad value never produces a half-built table.

use crate::binning::HistogramOptions;
use crate::error::{IntegralError, IntegralResult};
use crate::table::{IntegralImage, IntegralVolume};
use ctxfeat_core::{ChannelImage, ChannelVolume, Lookup, Radius3};

/// Check every value of `src` against the strategy.
fn check_values_2d(src: &ChannelImage, options: &HistogramOptions) -> IntegralResult<()> {
    options.validate()?;
    let channels = src.channels();
    match src
        .data()
        .iter()
        .position(|&v| !options.weighting.accepts(v))
    {
        Some(idx) => {
            let pixel = idx / channels;
            Err(IntegralError::OutOfRangeValue {
                value: src.data()[idx],
                y: pixel / src.width(),
                x: pixel % src.width(),
                c: idx % channels,
            })
        }
        None => Ok(()),
    }
}

fn check_values_3d(src: &ChannelVolume, options: &HistogramOptions) -> IntegralResult<()> {
    options.validate()?;
    let (_, w, d, channels) = src.shape();
    match src
        .data()
        .iter()
        .position(|&v| !options.weighting.accepts(v))
    {
        Some(idx) => {
            let voxel = idx / channels;
            Err(IntegralError::OutOfRangeVoxel {
                value: src.data()[idx],
                y: voxel / (w * d),
                x: (voxel / d) % w,
                z: voxel % d,
                c: idx % channels,
            })
        }
        None => Ok(()),
    }
}

/// Spread the channel values of one pixel over `out`, `nbins` per channel.
#[inline]
fn fill_bins(values: &[f64], options: &HistogramOptions, out: &mut [f64]) {
    for (v, bins) in values.iter().zip(out.chunks_exact_mut(options.nbins)) {
        options.weighting.weights(*v, bins);
    }
}

/// Per-pixel bin weights of every channel.
///
/// Returns an `(H, W, C * nbins)` image whose plane `c * nbins + j` holds
/// the weight of bin `j` for channel `c` at each pixel.
///
/// # Errors
///
/// Fails on invalid options, or with `OutOfRangeValue` for the first value
/// the strategy cannot bin.
pub fn weight_planes(
    src: &ChannelImage,
    options: &HistogramOptions,
) -> IntegralResult<ChannelImage> {
    check_values_2d(src, options)?;
    let (h, w, c) = src.shape();
    let mut out = ChannelImage::new(h, w, c * options.nbins)?;
    for y in 0..h {
        for x in 0..w {
            fill_bins(src.pixel(y, x), options, out.pixel_mut(y, x));
        }
    }
    Ok(out)
}

/// 2D integral histogram
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralHistogram {
    table: IntegralImage,
    channels: usize,
    nbins: usize,
}

impl IntegralHistogram {
    /// Build the integral histogram of every channel of `src`.
    ///
    /// # Errors
    ///
    /// See [`weight_planes`].
    pub fn build(src: &ChannelImage, options: &HistogramOptions) -> IntegralResult<Self> {
        check_values_2d(src, options)?;
        let (h, w, c) = src.shape();
        let table = IntegralImage::build_with(h, w, c * options.nbins, |y, x, out| {
            fill_bins(src.pixel(y, x), options, out)
        })?;
        log::trace!(
            "built {}x{}x{} integral histogram, {} bins, {:?}",
            h,
            w,
            c,
            options.nbins,
            options.weighting
        );
        Ok(IntegralHistogram {
            table,
            channels: c,
            nbins: options.nbins,
        })
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn nbins(&self) -> usize {
        self.nbins
    }

    /// Plane holding bin `bin` of channel `c`
    #[inline]
    pub fn plane(&self, c: usize, bin: usize) -> usize {
        c * self.nbins + bin
    }

    /// The underlying summed-area table
    #[inline]
    pub fn table(&self) -> &IntegralImage {
        &self.table
    }

    /// Unnormalized histogram of the window around `center`, all channels.
    pub fn window_histogram(&self, center: (usize, usize), radius: usize) -> Lookup<Vec<f64>> {
        self.table.window_sums(center, radius)
    }
}

/// 3D integral histogram
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralHistogram3d {
    table: IntegralVolume,
    channels: usize,
    nbins: usize,
}

impl IntegralHistogram3d {
    /// Build the integral histogram of every channel of `src`.
    pub fn build(src: &ChannelVolume, options: &HistogramOptions) -> IntegralResult<Self> {
        check_values_3d(src, options)?;
        let (h, w, d, c) = src.shape();
        let table = IntegralVolume::build_with(h, w, d, c * options.nbins, |y, x, z, out| {
            fill_bins(src.voxel(y, x, z), options, out)
        })?;
        log::trace!(
            "built {}x{}x{}x{} integral histogram, {} bins",
            h,
            w,
            d,
            c,
            options.nbins
        );
        Ok(IntegralHistogram3d {
            table,
            channels: c,
            nbins: options.nbins,
        })
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn nbins(&self) -> usize {
        self.nbins
    }

    #[inline]
    pub fn plane(&self, c: usize, bin: usize) -> usize {
        c * self.nbins + bin
    }

    #[inline]
    pub fn table(&self) -> &IntegralVolume {
        &self.table
    }

    /// Unnormalized histogram of the window around `center`, all channels.
    pub fn window_histogram(
        &self,
        center: (usize, usize, usize),
        radius: Radius3,
    ) -> Lookup<Vec<f64>> {
        self.table.window_sums(center, radius)
    }
}
