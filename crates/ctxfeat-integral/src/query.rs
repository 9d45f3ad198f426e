//! Region-sum queries
//!
//! Box sums by inclusion-exclusion over the corners of the box. Terms whose
//! "before" corner would sit at index -1 are dropped rather than looked up.
//!
//! Window queries return [`Lookup::OutOfBounds`] as soon as the window leaves
//! the grid on any axis; no partial sum is ever computed.

use crate::error::{IntegralError, IntegralResult};
use crate::table::{IntegralImage, IntegralVolume};
use ctxfeat_core::{Error, Lookup, Radius3};

/// Inclusive window `[c - r, c + r]` on one axis, if it fits in `0..len`.
#[inline]
fn axis_window(center: usize, radius: usize, len: usize) -> Lookup<(usize, usize)> {
    match (center.checked_sub(radius), center.checked_add(radius)) {
        (Some(lo), Some(hi)) if hi < len => Lookup::InBounds((lo, hi)),
        _ => Lookup::OutOfBounds,
    }
}

impl IntegralImage {
    /// Sum of `plane` over the inclusive box `lo..=hi`, given as `(y, x)`.
    ///
    /// # Errors
    ///
    /// Returns `IntegralError::PlaneOutOfRange` for a bad plane and a core
    /// `IndexOutOfBounds` if the box is inverted or leaves the grid.
    pub fn rect_sum(
        &self,
        lo: (usize, usize),
        hi: (usize, usize),
        plane: usize,
    ) -> IntegralResult<f64> {
        self.check_plane(plane)?;
        if lo.0 > hi.0 || lo.1 > hi.1 || hi.0 >= self.height() || hi.1 >= self.width() {
            return Err(Error::IndexOutOfBounds {
                index: hi.0 * self.width() + hi.1,
                len: self.height() * self.width(),
            }
            .into());
        }
        Ok(self.rect_sum_unchecked(lo, hi, plane))
    }

    /// [`rect_sum`](Self::rect_sum) without validation
    ///
    /// # Panics
    ///
    /// May panic or return garbage if the box or plane is out of range.
    #[inline]
    pub fn rect_sum_unchecked(&self, lo: (usize, usize), hi: (usize, usize), plane: usize) -> f64 {
        let t = self.table();
        let (y0, x0) = lo;
        let (y1, x1) = hi;
        let mut sum = t.get_unchecked(y1, x1, plane);
        if y0 > 0 {
            sum -= t.get_unchecked(y0 - 1, x1, plane);
        }
        if x0 > 0 {
            sum -= t.get_unchecked(y1, x0 - 1, plane);
        }
        if y0 > 0 && x0 > 0 {
            sum += t.get_unchecked(y0 - 1, x0 - 1, plane);
        }
        sum
    }

    /// The inclusive box of the window of `radius` around `center`, if it
    /// stays inside the grid.
    #[inline]
    pub fn window_bounds(
        &self,
        center: (usize, usize),
        radius: usize,
    ) -> Lookup<((usize, usize), (usize, usize))> {
        axis_window(center.0, radius, self.height()).and_then(|(y0, y1)| {
            axis_window(center.1, radius, self.width()).map(|(x0, x1)| ((y0, x0), (y1, x1)))
        })
    }

    /// Sum of `plane` over the `(2r+1) x (2r+1)` window around `center`.
    ///
    /// # Panics
    ///
    /// Panics if `plane >= self.planes()`.
    pub fn window_sum(&self, center: (usize, usize), radius: usize, plane: usize) -> Lookup<f64> {
        assert!(plane < self.planes(), "plane {} out of range", plane);
        self.window_bounds(center, radius)
            .map(|(lo, hi)| self.rect_sum_unchecked(lo, hi, plane))
    }

    /// Window sums of every plane around `center`.
    pub fn window_sums(&self, center: (usize, usize), radius: usize) -> Lookup<Vec<f64>> {
        self.window_bounds(center, radius).map(|(lo, hi)| {
            (0..self.planes())
                .map(|p| self.rect_sum_unchecked(lo, hi, p))
                .collect()
        })
    }

    /// Sum of every plane over the whole grid
    pub fn total(&self) -> Vec<f64> {
        let (h, w) = (self.height(), self.width());
        (0..self.planes())
            .map(|p| self.rect_sum_unchecked((0, 0), (h - 1, w - 1), p))
            .collect()
    }

    fn check_plane(&self, plane: usize) -> IntegralResult<()> {
        if plane >= self.planes() {
            return Err(IntegralError::PlaneOutOfRange {
                plane,
                planes: self.planes(),
            });
        }
        Ok(())
    }
}

impl IntegralVolume {
    /// Sum of `plane` over the inclusive box `lo..=hi`, given as `(y, x, z)`.
    ///
    /// # Errors
    ///
    /// Same as [`IntegralImage::rect_sum`].
    pub fn rect_sum(
        &self,
        lo: (usize, usize, usize),
        hi: (usize, usize, usize),
        plane: usize,
    ) -> IntegralResult<f64> {
        if plane >= self.planes() {
            return Err(IntegralError::PlaneOutOfRange {
                plane,
                planes: self.planes(),
            });
        }
        let inverted = lo.0 > hi.0 || lo.1 > hi.1 || lo.2 > hi.2;
        let outside = hi.0 >= self.height() || hi.1 >= self.width() || hi.2 >= self.depth();
        if inverted || outside {
            return Err(Error::IndexOutOfBounds {
                index: (hi.0 * self.width() + hi.1) * self.depth() + hi.2,
                len: self.height() * self.width() * self.depth(),
            }
            .into());
        }
        Ok(self.rect_sum_unchecked(lo, hi, plane))
    }

    /// [`rect_sum`](Self::rect_sum) without validation
    ///
    /// Corner `mask` picks, per axis, the far index `hi` (bit clear) or the
    /// index just before the box `lo - 1` (bit set). The term's sign is
    /// `(-1)^(number of near corners)`; terms needing index -1 vanish.
    pub fn rect_sum_unchecked(
        &self,
        lo: (usize, usize, usize),
        hi: (usize, usize, usize),
        plane: usize,
    ) -> f64 {
        let t = self.table();
        let lo = [lo.0, lo.1, lo.2];
        let hi = [hi.0, hi.1, hi.2];
        let mut sum = 0.0;
        'corners: for mask in 0u32..8 {
            let mut corner = hi;
            for axis in 0..3 {
                if mask & (4 >> axis) != 0 {
                    if lo[axis] == 0 {
                        continue 'corners;
                    }
                    corner[axis] = lo[axis] - 1;
                }
            }
            let v = t.get_unchecked(corner[0], corner[1], corner[2], plane);
            if mask.count_ones() % 2 == 0 {
                sum += v;
            } else {
                sum -= v;
            }
        }
        sum
    }

    /// The inclusive box of the window of `radius` around `center`, if it
    /// stays inside the grid.
    #[inline]
    pub fn window_bounds(
        &self,
        center: (usize, usize, usize),
        radius: Radius3,
    ) -> Lookup<((usize, usize, usize), (usize, usize, usize))> {
        axis_window(center.0, radius.ry, self.height()).and_then(|(y0, y1)| {
            axis_window(center.1, radius.rx, self.width()).and_then(|(x0, x1)| {
                axis_window(center.2, radius.rz, self.depth())
                    .map(|(z0, z1)| ((y0, x0, z0), (y1, x1, z1)))
            })
        })
    }

    /// Sum of `plane` over the window of `radius` around `center`.
    ///
    /// # Panics
    ///
    /// Panics if `plane >= self.planes()`.
    pub fn window_sum(
        &self,
        center: (usize, usize, usize),
        radius: Radius3,
        plane: usize,
    ) -> Lookup<f64> {
        assert!(plane < self.planes(), "plane {} out of range", plane);
        self.window_bounds(center, radius)
            .map(|(lo, hi)| self.rect_sum_unchecked(lo, hi, plane))
    }

    /// Window sums of every plane around `center`.
    pub fn window_sums(&self, center: (usize, usize, usize), radius: Radius3) -> Lookup<Vec<f64>> {
        self.window_bounds(center, radius).map(|(lo, hi)| {
            (0..self.planes())
                .map(|p| self.rect_sum_unchecked(lo, hi, p))
                .collect()
        })
    }

    /// Sum of every plane over the whole grid
    pub fn total(&self) -> Vec<f64> {
        let hi = (self.height() - 1, self.width() - 1, self.depth() - 1);
        (0..self.planes())
            .map(|p| self.rect_sum_unchecked((0, 0, 0), hi, p))
            .collect()
    }
}
