//! Ring features
//!
//! For ascending radii `r[0] < r[1] < ...`, shell `i` around a pixel is the
//! window of radius `r[i]` minus the window of radius `r[i-1]` (the whole
//! window for `i = 0`). Every shell statistic comes from window sums on a
//! summed-area table, so its cost does not depend on the radius.
//!
//! Border policy: when the window of `r[i]` leaves the grid, every value of
//! shell `i` is the uniform sentinel `1 / nclasses`, even if smaller shells
//! were computed.
//!
//! Output layouts, per pixel:
//!
//! | extractor      | value at                                   |
//! |----------------|--------------------------------------------|
//! | means          | `c * n + i`                                |
//! | means+variances| `c * 2n + i` (mean), `c * 2n + n + i` (var) |
//! | histograms     | `i * (C * nbins) + c * nbins + b`          |

use std::time::Instant;

use crate::error::{ContextError, ContextResult};
use crate::options::{check_classes, check_output_2d, check_output_3d, check_radii, check_radii_3d};
use crate::scan::for_each_row;
use ctxfeat_core::{ChannelImage, ChannelVolume, Lookup, Radius3, uniform_sentinel, window_area};
use ctxfeat_integral::{HistogramOptions, IntegralHistogram, IntegralImage, IntegralVolume};

/// Pixel count of each shell
fn shell_areas_2d(radii: &[usize]) -> Vec<f64> {
    let mut inner = 0;
    radii
        .iter()
        .map(|&r| {
            let area = window_area(r);
            let shell = area - inner;
            inner = area;
            shell as f64
        })
        .collect()
}

/// Voxel count of each shell
fn shell_volumes_3d(radii: &[Radius3]) -> Vec<f64> {
    let mut inner = 0;
    radii
        .iter()
        .map(|r| {
            let volume = r.window_volume();
            let shell = volume - inner;
            inner = volume;
            shell as f64
        })
        .collect()
}

fn check_same_shape_2d(sum: &IntegralImage, sq: &IntegralImage) -> ContextResult<()> {
    if sum.table().shape() != sq.table().shape() {
        let (h, w, c) = sum.table().shape();
        let (sh, sw, sc) = sq.table().shape();
        return Err(ContextError::ShapeMismatch {
            expected: vec![h, w, c],
            actual: vec![sh, sw, sc],
        });
    }
    Ok(())
}

fn check_same_shape_3d(sum: &IntegralVolume, sq: &IntegralVolume) -> ContextResult<()> {
    if sum.table().shape() != sq.table().shape() {
        let (h, w, d, c) = sum.table().shape();
        let (sh, sw, sd, sc) = sq.table().shape();
        return Err(ContextError::ShapeMismatch {
            expected: vec![h, w, d, c],
            actual: vec![sh, sw, sd, sc],
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shell means and variances
// ---------------------------------------------------------------------------

/// Fill shell means (and variances, if `sq` is given) of every pixel.
///
/// Expects validated inputs and an output of matching shape.
fn fill_shell_stats_2d(
    sum: &IntegralImage,
    sq: Option<&IntegralImage>,
    radii: &[usize],
    out: &mut ChannelImage,
) {
    let (w, nclasses, n) = (sum.width(), sum.planes(), radii.len());
    let per_class = if sq.is_some() { 2 * n } else { n };
    let nout = nclasses * per_class;
    let sentinel = uniform_sentinel(nclasses);
    let shells = shell_areas_2d(radii);

    for_each_row(out.data_mut(), w * nout, |y, row| {
        // Window sums of the previous radius
        let mut inner = vec![0.0; nclasses];
        let mut inner_sq = vec![0.0; nclasses];
        for x in 0..w {
            let px = &mut row[x * nout..(x + 1) * nout];
            inner.fill(0.0);
            inner_sq.fill(0.0);
            for (i, &r) in radii.iter().enumerate() {
                let bounds = sum.window_bounds((y, x), r);
                for c in 0..nclasses {
                    let base = c * per_class;
                    match bounds {
                        Lookup::InBounds((lo, hi)) => {
                            let s = sum.rect_sum_unchecked(lo, hi, c);
                            let mean = (s - inner[c]) / shells[i];
                            inner[c] = s;
                            px[base + i] = mean;
                            if let Some(sq) = sq {
                                let s2 = sq.rect_sum_unchecked(lo, hi, c);
                                let second = (s2 - inner_sq[c]) / shells[i];
                                inner_sq[c] = s2;
                                px[base + n + i] = (second - mean * mean).max(0.0);
                            }
                        }
                        Lookup::OutOfBounds => {
                            px[base + i] = sentinel;
                            if sq.is_some() {
                                px[base + n + i] = sentinel;
                            }
                        }
                    }
                }
            }
        }
    });
}

fn fill_shell_stats_3d(
    sum: &IntegralVolume,
    sq: Option<&IntegralVolume>,
    radii: &[Radius3],
    out: &mut ChannelVolume,
) {
    let (w, d, nclasses, n) = (sum.width(), sum.depth(), sum.planes(), radii.len());
    let per_class = if sq.is_some() { 2 * n } else { n };
    let nout = nclasses * per_class;
    let sentinel = uniform_sentinel(nclasses);
    let shells = shell_volumes_3d(radii);

    for_each_row(out.data_mut(), w * d * nout, |y, slab| {
        let mut inner = vec![0.0; nclasses];
        let mut inner_sq = vec![0.0; nclasses];
        for x in 0..w {
            for z in 0..d {
                let start = (x * d + z) * nout;
                let vx = &mut slab[start..start + nout];
                inner.fill(0.0);
                inner_sq.fill(0.0);
                for (i, &r) in radii.iter().enumerate() {
                    let bounds = sum.window_bounds((y, x, z), r);
                    for c in 0..nclasses {
                        let base = c * per_class;
                        match bounds {
                            Lookup::InBounds((lo, hi)) => {
                                let s = sum.rect_sum_unchecked(lo, hi, c);
                                let mean = (s - inner[c]) / shells[i];
                                inner[c] = s;
                                vx[base + i] = mean;
                                if let Some(sq) = sq {
                                    let s2 = sq.rect_sum_unchecked(lo, hi, c);
                                    let second = (s2 - inner_sq[c]) / shells[i];
                                    inner_sq[c] = s2;
                                    vx[base + n + i] = (second - mean * mean).max(0.0);
                                }
                            }
                            Lookup::OutOfBounds => {
                                vx[base + i] = sentinel;
                                if sq.is_some() {
                                    vx[base + n + i] = sentinel;
                                }
                            }
                        }
                    }
                }
            }
        }
    });
}

/// Shell means of every class around every pixel.
///
/// Returns an `(H, W, C * n)` image for `n` radii; see the module docs for
/// the layout.
///
/// # Errors
///
/// - `TooFewChannels` for fewer than two classes
/// - `InvalidRadii` unless `radii` is non-empty and strictly increasing
pub fn ring_means_2d(pred: &ChannelImage, radii: &[usize]) -> ContextResult<ChannelImage> {
    check_classes(pred.channels())?;
    check_radii(radii)?;
    let table = IntegralImage::build(pred)?;
    ring_means_2d_from_table(&table, radii)
}

/// [`ring_means_2d`] on a table the caller already built
pub fn ring_means_2d_from_table(
    table: &IntegralImage,
    radii: &[usize],
) -> ContextResult<ChannelImage> {
    check_classes(table.planes())?;
    check_radii(radii)?;
    let mut out = ChannelImage::new(table.height(), table.width(), table.planes() * radii.len())?;
    ring_means_2d_into(table, radii, &mut out)?;
    Ok(out)
}

/// [`ring_means_2d`] into a caller-provided output
///
/// # Errors
///
/// Also returns `ShapeMismatch` if `out` is not `(H, W, C * n)`; `out` is
/// untouched on any error.
pub fn ring_means_2d_into(
    table: &IntegralImage,
    radii: &[usize],
    out: &mut ChannelImage,
) -> ContextResult<()> {
    check_classes(table.planes())?;
    check_radii(radii)?;
    check_output_2d(out, table.height(), table.width(), table.planes() * radii.len())?;

    let start = Instant::now();
    fill_shell_stats_2d(table, None, radii, out);
    log::debug!(
        "ring means on {}x{} ({} classes), radii {:?}, in {:?}",
        table.height(),
        table.width(),
        table.planes(),
        radii,
        start.elapsed()
    );
    Ok(())
}

/// Shell means and variances of every class around every pixel.
///
/// Returns an `(H, W, C * 2n)` image: per class, `n` means followed by `n`
/// variances `E[X^2] - E[X]^2`.
pub fn ring_means_variances_2d(
    pred: &ChannelImage,
    radii: &[usize],
) -> ContextResult<ChannelImage> {
    check_classes(pred.channels())?;
    check_radii(radii)?;
    let sum = IntegralImage::build(pred)?;
    let sq = IntegralImage::build_squared(pred)?;
    ring_means_variances_2d_from_table(&sum, &sq, radii)
}

/// [`ring_means_variances_2d`] on a plain and a squared table
///
/// # Errors
///
/// Also returns `ShapeMismatch` if the two tables differ in shape.
pub fn ring_means_variances_2d_from_table(
    sum: &IntegralImage,
    sq: &IntegralImage,
    radii: &[usize],
) -> ContextResult<ChannelImage> {
    check_classes(sum.planes())?;
    check_radii(radii)?;
    check_same_shape_2d(sum, sq)?;
    let mut out = ChannelImage::new(sum.height(), sum.width(), sum.planes() * 2 * radii.len())?;
    ring_means_variances_2d_into(sum, sq, radii, &mut out)?;
    Ok(out)
}

/// [`ring_means_variances_2d`] into a caller-provided output
pub fn ring_means_variances_2d_into(
    sum: &IntegralImage,
    sq: &IntegralImage,
    radii: &[usize],
    out: &mut ChannelImage,
) -> ContextResult<()> {
    check_classes(sum.planes())?;
    check_radii(radii)?;
    check_same_shape_2d(sum, sq)?;
    check_output_2d(out, sum.height(), sum.width(), sum.planes() * 2 * radii.len())?;

    let start = Instant::now();
    fill_shell_stats_2d(sum, Some(sq), radii, out);
    log::debug!(
        "ring means/variances on {}x{} ({} classes), radii {:?}, in {:?}",
        sum.height(),
        sum.width(),
        sum.planes(),
        radii,
        start.elapsed()
    );
    Ok(())
}

/// Shell means in 3D with per-axis radii.
///
/// Returns an `(H, W, D, C * n)` volume. Isotropic radii are
/// [`Radius3::iso`].
///
/// # Errors
///
/// `InvalidRadii` unless every triplet covers the previous one on each axis
/// and differs from it.
pub fn ring_means_3d(pred: &ChannelVolume, radii: &[Radius3]) -> ContextResult<ChannelVolume> {
    check_classes(pred.channels())?;
    check_radii_3d(radii)?;
    let table = IntegralVolume::build(pred)?;
    ring_means_3d_from_table(&table, radii)
}

/// [`ring_means_3d`] on a table the caller already built
pub fn ring_means_3d_from_table(
    table: &IntegralVolume,
    radii: &[Radius3],
) -> ContextResult<ChannelVolume> {
    check_classes(table.planes())?;
    check_radii_3d(radii)?;
    let mut out = ChannelVolume::new(
        table.height(),
        table.width(),
        table.depth(),
        table.planes() * radii.len(),
    )?;
    ring_means_3d_into(table, radii, &mut out)?;
    Ok(out)
}

/// [`ring_means_3d`] into a caller-provided output
pub fn ring_means_3d_into(
    table: &IntegralVolume,
    radii: &[Radius3],
    out: &mut ChannelVolume,
) -> ContextResult<()> {
    check_classes(table.planes())?;
    check_radii_3d(radii)?;
    check_output_3d(
        out,
        table.height(),
        table.width(),
        table.depth(),
        table.planes() * radii.len(),
    )?;

    let start = Instant::now();
    fill_shell_stats_3d(table, None, radii, out);
    log::debug!(
        "ring means on {}x{}x{} ({} classes), radii {:?}, in {:?}",
        table.height(),
        table.width(),
        table.depth(),
        table.planes(),
        radii,
        start.elapsed()
    );
    Ok(())
}

/// Shell means and variances in 3D with per-axis radii.
pub fn ring_means_variances_3d(
    pred: &ChannelVolume,
    radii: &[Radius3],
) -> ContextResult<ChannelVolume> {
    check_classes(pred.channels())?;
    check_radii_3d(radii)?;
    let sum = IntegralVolume::build(pred)?;
    let sq = IntegralVolume::build_squared(pred)?;
    ring_means_variances_3d_from_table(&sum, &sq, radii)
}

/// [`ring_means_variances_3d`] on a plain and a squared table
pub fn ring_means_variances_3d_from_table(
    sum: &IntegralVolume,
    sq: &IntegralVolume,
    radii: &[Radius3],
) -> ContextResult<ChannelVolume> {
    check_classes(sum.planes())?;
    check_radii_3d(radii)?;
    check_same_shape_3d(sum, sq)?;
    let mut out = ChannelVolume::new(
        sum.height(),
        sum.width(),
        sum.depth(),
        sum.planes() * 2 * radii.len(),
    )?;
    ring_means_variances_3d_into(sum, sq, radii, &mut out)?;
    Ok(out)
}

/// [`ring_means_variances_3d`] into a caller-provided output
pub fn ring_means_variances_3d_into(
    sum: &IntegralVolume,
    sq: &IntegralVolume,
    radii: &[Radius3],
    out: &mut ChannelVolume,
) -> ContextResult<()> {
    check_classes(sum.planes())?;
    check_radii_3d(radii)?;
    check_same_shape_3d(sum, sq)?;
    check_output_3d(
        out,
        sum.height(),
        sum.width(),
        sum.depth(),
        sum.planes() * 2 * radii.len(),
    )?;

    let start = Instant::now();
    fill_shell_stats_3d(sum, Some(sq), radii, out);
    log::debug!(
        "ring means/variances on {}x{}x{} ({} classes), radii {:?}, in {:?}",
        sum.height(),
        sum.width(),
        sum.depth(),
        sum.planes(),
        radii,
        start.elapsed()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Shell histograms
// ---------------------------------------------------------------------------

/// Normalized shell histograms of every class around every pixel.
///
/// Returns an `(H, W, n * C * nbins)` image, radius-major, then class, then
/// bin. Each shell histogram is divided by the shell's pixel count.
///
/// # Errors
///
/// Besides the radius and class checks, fails like
/// [`IntegralHistogram::build`] on bad options or values.
pub fn ring_histograms_2d(
    pred: &ChannelImage,
    radii: &[usize],
    options: &HistogramOptions,
) -> ContextResult<ChannelImage> {
    check_classes(pred.channels())?;
    check_radii(radii)?;
    let hist = IntegralHistogram::build(pred, options)?;
    ring_histograms_2d_from_table(&hist, radii)
}

/// [`ring_histograms_2d`] on an integral histogram the caller already built
pub fn ring_histograms_2d_from_table(
    hist: &IntegralHistogram,
    radii: &[usize],
) -> ContextResult<ChannelImage> {
    check_classes(hist.channels())?;
    check_radii(radii)?;
    let table = hist.table();
    let mut out = ChannelImage::new(table.height(), table.width(), table.planes() * radii.len())?;
    ring_histograms_2d_into(hist, radii, &mut out)?;
    Ok(out)
}

/// [`ring_histograms_2d`] into a caller-provided output
pub fn ring_histograms_2d_into(
    hist: &IntegralHistogram,
    radii: &[usize],
    out: &mut ChannelImage,
) -> ContextResult<()> {
    check_classes(hist.channels())?;
    check_radii(radii)?;
    let table = hist.table();
    let (w, planes) = (table.width(), table.planes());
    let nout = planes * radii.len();
    check_output_2d(out, table.height(), w, nout)?;

    let start = Instant::now();
    let sentinel = uniform_sentinel(hist.channels());
    let shells = shell_areas_2d(radii);

    for_each_row(out.data_mut(), w * nout, |y, row| {
        let mut inner = vec![0.0; planes];
        for x in 0..w {
            let px = &mut row[x * nout..(x + 1) * nout];
            inner.fill(0.0);
            for (i, &r) in radii.iter().enumerate() {
                let block = &mut px[i * planes..(i + 1) * planes];
                match table.window_bounds((y, x), r) {
                    Lookup::InBounds((lo, hi)) => {
                        for p in 0..planes {
                            let s = table.rect_sum_unchecked(lo, hi, p);
                            block[p] = (s - inner[p]) / shells[i];
                            inner[p] = s;
                        }
                    }
                    Lookup::OutOfBounds => block.fill(sentinel),
                }
            }
        }
    });
    log::debug!(
        "ring histograms on {}x{} ({} classes, {} bins), radii {:?}, in {:?}",
        table.height(),
        w,
        hist.channels(),
        hist.nbins(),
        radii,
        start.elapsed()
    );
    Ok(())
}
