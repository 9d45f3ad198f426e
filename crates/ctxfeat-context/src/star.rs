//! Star features
//!
//! Point samples of the prediction map at fixed neighbor offsets, scaled by
//! each radius. Neighbors outside the grid read as the uniform sentinel
//! `1 / nclasses`.
//!
//! Per class `c`, feature `c * nfeat + f` with `nfeat` features per class:
//!
//! - 2D: for each radius, the 8 samples of [`STAR_OFFSETS_2D`], then (with
//!   [`StarOptions::average_size`]) the 8 box averages around those samples.
//! - 3D: for each radius, the 26 samples of [`STAR_OFFSETS_3D`].

use std::time::Instant;

use crate::error::{ContextError, ContextResult};
use crate::options::{StarOptions, check_classes, check_radii, check_radii_3d};
use crate::scan::for_each_row;
use ctxfeat_core::{
    ChannelImage, ChannelVolume, Error, Lookup, Radius3, offset_index, uniform_sentinel,
    window_area,
};
use ctxfeat_integral::IntegralImage;

/// 2D neighbor directions in `(dy, dx)` lexicographic order
pub const STAR_OFFSETS_2D: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 3D neighbor directions `(dy, dx, dz)`: 6 faces, 12 edges, 8 corners,
/// each group in lexicographic order
pub const STAR_OFFSETS_3D: [(isize, isize, isize); 26] = [
    // faces
    (-1, 0, 0),
    (0, -1, 0),
    (0, 0, -1),
    (0, 0, 1),
    (0, 1, 0),
    (1, 0, 0),
    // edges
    (-1, -1, 0),
    (-1, 0, -1),
    (-1, 0, 1),
    (-1, 1, 0),
    (0, -1, -1),
    (0, -1, 1),
    (0, 1, -1),
    (0, 1, 1),
    (1, -1, 0),
    (1, 0, -1),
    (1, 0, 1),
    (1, 1, 0),
    // corners
    (-1, -1, -1),
    (-1, -1, 1),
    (-1, 1, -1),
    (-1, 1, 1),
    (1, -1, -1),
    (1, -1, 1),
    (1, 1, -1),
    (1, 1, 1),
];

/// Row-major `rows x cols` feature matrix
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Create a zero-filled matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        FeatureMatrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Features of row `i`
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }
}

fn check_star_radii(radii: &[usize]) -> ContextResult<()> {
    check_radii(radii)?;
    if radii[0] == 0 {
        return Err(ContextError::InvalidRadii(
            "star radii must be positive".to_string(),
        ));
    }
    Ok(())
}

fn check_star_radii_3d(radii: &[Radius3]) -> ContextResult<()> {
    check_radii_3d(radii)?;
    if radii[0] == Radius3::default() {
        return Err(ContextError::InvalidRadii(
            "star radii must be non-zero on some axis".to_string(),
        ));
    }
    Ok(())
}

/// `pos + delta * r` if it lands in `0..len`
///
/// An offset too large for `isize` always leaves the grid.
#[inline]
fn step(pos: usize, delta: isize, r: usize, len: usize) -> Lookup<usize> {
    if delta == 0 {
        return offset_index(pos, 0, len);
    }
    match isize::try_from(r).ok().and_then(|r| delta.checked_mul(r)) {
        Some(offset) => offset_index(pos, offset, len),
        None => Lookup::OutOfBounds,
    }
}

/// Star features of every pixel.
///
/// Returns an `(H, W, C * nfeat)` image with `nfeat = n * 8` for raw
/// samples, or `n * 16` with box averages.
///
/// # Errors
///
/// - `TooFewChannels` for fewer than two classes
/// - `InvalidRadii` unless radii are positive and strictly increasing
/// - `InvalidAverageSize` for an even or zero averaging box
pub fn star_features_2d(
    pred: &ChannelImage,
    radii: &[usize],
    options: &StarOptions,
) -> ContextResult<ChannelImage> {
    check_classes(pred.channels())?;
    check_star_radii(radii)?;
    options.validate()?;

    let start = Instant::now();
    let (h, w, nclasses) = pred.shape();
    let per_radius = STAR_OFFSETS_2D.len() * options.samples_per_offset();
    let nfeat = radii.len() * per_radius;
    let nout = nclasses * nfeat;
    let sentinel = uniform_sentinel(nclasses);

    // Box averages come from a summed-area table of the predictions
    let averages = match options.average_size {
        Some(size) => Some((IntegralImage::build(pred)?, size / 2)),
        None => None,
    };

    let mut out = ChannelImage::new(h, w, nout)?;
    for_each_row(out.data_mut(), w * nout, |y, row| {
        for x in 0..w {
            let px = &mut row[x * nout..(x + 1) * nout];
            for (i, &r) in radii.iter().enumerate() {
                for (k, &(dy, dx)) in STAR_OFFSETS_2D.iter().enumerate() {
                    let nb = step(y, dy, r, h)
                        .and_then(|ny| step(x, dx, r, w).map(|nx| (ny, nx)));
                    let f = i * per_radius + k;
                    for c in 0..nclasses {
                        px[c * nfeat + f] = nb
                            .map(|(ny, nx)| pred.get_unchecked(ny, nx, c))
                            .resolve(sentinel);
                    }
                    if let Some((table, half)) = &averages {
                        let area = window_area(*half) as f64;
                        let bounds = nb.and_then(|p| table.window_bounds(p, *half));
                        let f = f + STAR_OFFSETS_2D.len();
                        for c in 0..nclasses {
                            px[c * nfeat + f] = bounds
                                .map(|(lo, hi)| table.rect_sum_unchecked(lo, hi, c) / area)
                                .resolve(sentinel);
                        }
                    }
                }
            }
        }
    });

    log::debug!(
        "star features on {}x{} ({} classes), radii {:?}, average {:?}, in {:?}",
        h,
        w,
        nclasses,
        radii,
        options.average_size,
        start.elapsed()
    );
    Ok(out)
}

/// Write the star features of the voxel at `pos` into `out`.
fn fill_star_3d(
    pred: &ChannelVolume,
    radii: &[Radius3],
    pos: (usize, usize, usize),
    out: &mut [f64],
) {
    let (h, w, d, nclasses) = pred.shape();
    let nfeat = radii.len() * STAR_OFFSETS_3D.len();
    let sentinel = uniform_sentinel(nclasses);
    for (i, r) in radii.iter().enumerate() {
        for (k, &(dy, dx, dz)) in STAR_OFFSETS_3D.iter().enumerate() {
            let nb: Lookup<(usize, usize, usize)> = step(pos.0, dy, r.ry, h).and_then(|ny| {
                step(pos.1, dx, r.rx, w)
                    .and_then(|nx| step(pos.2, dz, r.rz, d).map(|nz| (ny, nx, nz)))
            });
            let f = i * STAR_OFFSETS_3D.len() + k;
            for c in 0..nclasses {
                out[c * nfeat + f] = nb
                    .map(|(ny, nx, nz)| pred.get_unchecked(ny, nx, nz, c))
                    .resolve(sentinel);
            }
        }
    }
}

/// Star features of every voxel.
///
/// Returns an `(H, W, D, C * n * 26)` volume. Offsets are scaled per axis by
/// each radius triplet.
pub fn star_features_3d(pred: &ChannelVolume, radii: &[Radius3]) -> ContextResult<ChannelVolume> {
    check_classes(pred.channels())?;
    check_star_radii_3d(radii)?;

    let start = Instant::now();
    let (h, w, d, nclasses) = pred.shape();
    let nout = nclasses * radii.len() * STAR_OFFSETS_3D.len();
    let mut out = ChannelVolume::new(h, w, d, nout)?;
    for_each_row(out.data_mut(), w * d * nout, |y, slab| {
        for x in 0..w {
            for z in 0..d {
                let offset = (x * d + z) * nout;
                fill_star_3d(pred, radii, (y, x, z), &mut slab[offset..offset + nout]);
            }
        }
    });

    log::debug!(
        "star features on {}x{}x{} ({} classes), radii {:?}, in {:?}",
        h,
        w,
        d,
        nclasses,
        radii,
        start.elapsed()
    );
    Ok(out)
}

/// Star features at selected voxels only.
///
/// Row `j` of the result holds the same values [`star_features_3d`] gives
/// at `points[j]`.
///
/// # Errors
///
/// Besides the checks of [`star_features_3d`], returns a core
/// `InvalidParameter` if a point lies outside the grid.
pub fn star_features_3d_at(
    pred: &ChannelVolume,
    radii: &[Radius3],
    points: &[(usize, usize, usize)],
) -> ContextResult<FeatureMatrix> {
    check_classes(pred.channels())?;
    check_star_radii_3d(radii)?;
    let (h, w, d, nclasses) = pred.shape();
    if let Some(p) = points
        .iter()
        .find(|p| p.0 >= h || p.1 >= w || p.2 >= d)
    {
        return Err(Error::InvalidParameter(format!(
            "point {:?} outside {}x{}x{} grid",
            p, h, w, d
        ))
        .into());
    }

    let nout = nclasses * radii.len() * STAR_OFFSETS_3D.len();
    let mut out = FeatureMatrix::new(points.len(), nout);
    for (j, &p) in points.iter().enumerate() {
        fill_star_3d(pred, radii, p, &mut out.data[j * nout..(j + 1) * nout]);
    }
    log::debug!(
        "star features at {} points, radii {:?}",
        points.len(),
        radii
    );
    Ok(out)
}
