//! Summed-area tables
//!
//! An integral table has the spatial shape of its source and one plane per
//! source channel (or per channel and bin, for histograms). The entry at
//! `(y, x, p)` holds the sum of plane `p` over the closed box `[0, y] x [0, x]`,
//! so any axis-aligned box sum costs four lookups (eight in 3D).

use crate::error::IntegralResult;
use ctxfeat_core::{ChannelImage, ChannelVolume};

/// 2D summed-area table
///
/// Built once per input and then shared read-only by every window query.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralImage {
    table: ChannelImage,
}

impl IntegralImage {
    /// Build the integral image of every channel of `src`.
    ///
    /// The recursion is: `a(y,x) = v(y,x) + a(y-1,x) + a(y,x-1) - a(y-1,x-1)`
    pub fn build(src: &ChannelImage) -> IntegralResult<Self> {
        let (h, w, c) = src.shape();
        let table = accumulate_2d(h, w, c, |y, x, out| out.copy_from_slice(src.pixel(y, x)))?;
        log::trace!("built {}x{}x{} integral image", h, w, c);
        Ok(IntegralImage { table })
    }

    /// Build the integral image of the squared values of `src`.
    ///
    /// Together with [`build`](Self::build) this gives `E[X]` and `E[X^2]`
    /// over any window.
    pub fn build_squared(src: &ChannelImage) -> IntegralResult<Self> {
        let (h, w, c) = src.shape();
        let table = accumulate_2d(h, w, c, |y, x, out| {
            for (o, &v) in out.iter_mut().zip(src.pixel(y, x)) {
                *o = v * v;
            }
        })?;
        log::trace!("built {}x{}x{} squared integral image", h, w, c);
        Ok(IntegralImage { table })
    }

    /// Build a table whose per-pixel source values are produced by `source`.
    ///
    /// `source(y, x, out)` fills the `planes` values of pixel `(y, x)`.
    pub fn build_with<F>(
        height: usize,
        width: usize,
        planes: usize,
        source: F,
    ) -> IntegralResult<Self>
    where
        F: FnMut(usize, usize, &mut [f64]),
    {
        let table = accumulate_2d(height, width, planes, source)?;
        Ok(IntegralImage { table })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.table.height()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.table.width()
    }

    /// Number of planes (source channels, or channels times bins)
    #[inline]
    pub fn planes(&self) -> usize {
        self.table.channels()
    }

    /// The prefix sums, laid out like the source image
    #[inline]
    pub fn table(&self) -> &ChannelImage {
        &self.table
    }

    pub fn into_table(self) -> ChannelImage {
        self.table
    }
}

/// 3D summed-area table
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralVolume {
    table: ChannelVolume,
}

impl IntegralVolume {
    /// Build the integral volume of every channel of `src`.
    pub fn build(src: &ChannelVolume) -> IntegralResult<Self> {
        let (h, w, d, c) = src.shape();
        let table = accumulate_3d(h, w, d, c, |y, x, z, out| {
            out.copy_from_slice(src.voxel(y, x, z))
        })?;
        log::trace!("built {}x{}x{}x{} integral volume", h, w, d, c);
        Ok(IntegralVolume { table })
    }

    /// Build the integral volume of the squared values of `src`.
    pub fn build_squared(src: &ChannelVolume) -> IntegralResult<Self> {
        let (h, w, d, c) = src.shape();
        let table = accumulate_3d(h, w, d, c, |y, x, z, out| {
            for (o, &v) in out.iter_mut().zip(src.voxel(y, x, z)) {
                *o = v * v;
            }
        })?;
        log::trace!("built {}x{}x{}x{} squared integral volume", h, w, d, c);
        Ok(IntegralVolume { table })
    }

    /// Build a table whose per-voxel source values are produced by `source`.
    pub fn build_with<F>(
        height: usize,
        width: usize,
        depth: usize,
        planes: usize,
        source: F,
    ) -> IntegralResult<Self>
    where
        F: FnMut(usize, usize, usize, &mut [f64]),
    {
        let table = accumulate_3d(height, width, depth, planes, source)?;
        Ok(IntegralVolume { table })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.table.height()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.table.width()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.table.depth()
    }

    #[inline]
    pub fn planes(&self) -> usize {
        self.table.channels()
    }

    #[inline]
    pub fn table(&self) -> &ChannelVolume {
        &self.table
    }

    pub fn into_table(self) -> ChannelVolume {
        self.table
    }
}

/// Fill a 2D prefix-sum table.
///
/// Each pixel's slot is first written with its source values, then the
/// left, upper and diagonal neighbors are folded in.
fn accumulate_2d<F>(
    height: usize,
    width: usize,
    planes: usize,
    mut source: F,
) -> IntegralResult<ChannelImage>
where
    F: FnMut(usize, usize, &mut [f64]),
{
    let mut table = ChannelImage::new(height, width, planes)?;
    let row_len = width * planes;
    let acc = table.data_mut();

    // First pixel
    source(0, 0, &mut acc[..planes]);

    // First row: cumulative sum along x
    for x in 1..width {
        let idx = x * planes;
        source(0, x, &mut acc[idx..idx + planes]);
        for p in 0..planes {
            acc[idx + p] += acc[idx - planes + p];
        }
    }

    // First column: cumulative sum along y
    for y in 1..height {
        let idx = y * row_len;
        source(y, 0, &mut acc[idx..idx + planes]);
        for p in 0..planes {
            acc[idx + p] += acc[idx - row_len + p];
        }
    }

    // Interior
    for y in 1..height {
        for x in 1..width {
            let idx = y * row_len + x * planes;
            source(y, x, &mut acc[idx..idx + planes]);
            let idx_left = idx - planes;
            let idx_above = idx - row_len;
            let idx_diag = idx_above - planes;
            for p in 0..planes {
                acc[idx + p] += acc[idx_left + p] + acc[idx_above + p] - acc[idx_diag + p];
            }
        }
    }

    Ok(table)
}

/// Fill a 3D prefix-sum table.
///
/// The seven lower neighbors `(y - dy, x - dx, z - dz)` with `(dy, dx, dz)`
/// a non-zero bit pattern enter with sign `+` for an odd number of set bits
/// and `-` for an even number. Neighbors below index 0 contribute nothing.
fn accumulate_3d<F>(
    height: usize,
    width: usize,
    depth: usize,
    planes: usize,
    mut source: F,
) -> IntegralResult<ChannelVolume>
where
    F: FnMut(usize, usize, usize, &mut [f64]),
{
    let mut table = ChannelVolume::new(height, width, depth, planes)?;
    let strides = [width * depth * planes, depth * planes, planes];
    let acc = table.data_mut();

    for y in 0..height {
        for x in 0..width {
            for z in 0..depth {
                let pos = [y, x, z];
                let idx = y * strides[0] + x * strides[1] + z * strides[2];
                source(y, x, z, &mut acc[idx..idx + planes]);

                for mask in 1u32..8 {
                    let mut offset = 0;
                    let mut reachable = true;
                    for axis in 0..3 {
                        if mask & (4 >> axis) != 0 {
                            if pos[axis] == 0 {
                                reachable = false;
                                break;
                            }
                            offset += strides[axis];
                        }
                    }
                    if !reachable {
                        continue;
                    }
                    let sign = if mask.count_ones() % 2 == 1 { 1.0 } else { -1.0 };
                    let nbr = idx - offset;
                    for p in 0..planes {
                        acc[idx + p] += sign * acc[nbr + p];
                    }
                }
            }
        }
    }

    Ok(table)
}
