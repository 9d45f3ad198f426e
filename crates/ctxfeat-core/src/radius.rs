//! Window radii
//!
//! A radius `r` denotes a window spanning `[-r, r]` along an axis, i.e. a
//! side length of `2r + 1`. Isotropic 2D paths use a plain `usize`; the
//! anisotropic 3D paths use a per-axis [`Radius3`].
//!
//! Sizes saturate at `usize::MAX`. Such a window cannot fit any grid, so the
//! saturated value is never used as a divisor.

/// Side length of a window with radius `r`
#[inline]
pub fn side(r: usize) -> usize {
    r.saturating_mul(2).saturating_add(1)
}

/// Number of pixels in a square 2D window of radius `r`
#[inline]
pub fn window_area(r: usize) -> usize {
    side(r).saturating_mul(side(r))
}

/// Per-axis radius of a 3D window
///
/// Fields follow the grid's axis order: `ry` along height, `rx` along width,
/// `rz` along depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Radius3 {
    pub ry: usize,
    pub rx: usize,
    pub rz: usize,
}

impl Radius3 {
    /// Create a radius triplet in `(y, x, z)` order
    pub const fn new(ry: usize, rx: usize, rz: usize) -> Self {
        Radius3 { ry, rx, rz }
    }

    /// Same radius along every axis
    pub const fn iso(r: usize) -> Self {
        Radius3 { ry: r, rx: r, rz: r }
    }

    /// Number of voxels in the window: `(2ry+1)(2rx+1)(2rz+1)`
    #[inline]
    pub fn window_volume(&self) -> usize {
        side(self.ry)
            .saturating_mul(side(self.rx))
            .saturating_mul(side(self.rz))
    }

    /// True if this window contains `other` along every axis
    #[inline]
    pub fn covers(&self, other: &Radius3) -> bool {
        self.ry >= other.ry && self.rx >= other.rx && self.rz >= other.rz
    }

    /// Radii as an array in axis order
    #[inline]
    pub fn as_array(&self) -> [usize; 3] {
        [self.ry, self.rx, self.rz]
    }
}

impl From<(usize, usize, usize)> for Radius3 {
    fn from((ry, rx, rz): (usize, usize, usize)) -> Self {
        Radius3 { ry, rx, rz }
    }
}
