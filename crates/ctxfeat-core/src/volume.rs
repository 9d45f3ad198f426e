//! ChannelVolume - 3D multi-channel floating-point grid
//!
//! The 3D counterpart of [`ChannelImage`](crate::ChannelImage). Axes are
//! `(height, width, depth, channels)`, indexed as `(y, x, z, c)`.

use crate::error::{Error, Result};
use crate::image::check_unit_range;

/// Multi-channel 3D grid of `f64`
///
/// The value at `(y, x, z, c)` is at index
/// `((y * width + x) * depth + z) * channels + c`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelVolume {
    height: usize,
    width: usize,
    depth: usize,
    channels: usize,
    data: Vec<f64>,
}

impl ChannelVolume {
    /// Create a new volume with all values set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if any axis is 0.
    pub fn new(height: usize, width: usize, depth: usize, channels: usize) -> Result<Self> {
        Self::new_with_value(height, width, depth, channels, 0.0)
    }

    /// Create a new volume with every value set to `value`
    pub fn new_with_value(
        height: usize,
        width: usize,
        depth: usize,
        channels: usize,
        value: f64,
    ) -> Result<Self> {
        check_dims(height, width, depth, channels)?;
        Ok(ChannelVolume {
            height,
            width,
            depth,
            channels,
            data: vec![value; height * width * depth * channels],
        })
    }

    /// Create a volume from raw data in `(y, x, z, c)` order
    ///
    /// # Errors
    ///
    /// Returns an error if an axis is 0 or the data length doesn't match.
    pub fn from_data(
        height: usize,
        width: usize,
        depth: usize,
        channels: usize,
        data: Vec<f64>,
    ) -> Result<Self> {
        check_dims(height, width, depth, channels)?;
        let expected = height * width * depth * channels;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{}x{}x{} = {}",
                data.len(),
                height,
                width,
                depth,
                channels,
                expected
            )));
        }
        Ok(ChannelVolume {
            height,
            width,
            depth,
            channels,
            data,
        })
    }

    /// Build a volume by evaluating `f(y, x, z, c)` at every position
    pub fn from_fn<F>(
        height: usize,
        width: usize,
        depth: usize,
        channels: usize,
        mut f: F,
    ) -> Result<Self>
    where
        F: FnMut(usize, usize, usize, usize) -> f64,
    {
        check_dims(height, width, depth, channels)?;
        let mut data = Vec::with_capacity(height * width * depth * channels);
        for y in 0..height {
            for x in 0..width {
                for z in 0..depth {
                    for c in 0..channels {
                        data.push(f(y, x, z, c));
                    }
                }
            }
        }
        Ok(ChannelVolume {
            height,
            width,
            depth,
            channels,
            data,
        })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Shape as `(height, width, depth, channels)`
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (self.height, self.width, self.depth, self.channels)
    }

    /// Flat index of `(y, x, z, c)`
    #[inline]
    pub fn index(&self, y: usize, x: usize, z: usize, c: usize) -> usize {
        ((y * self.width + x) * self.depth + z) * self.channels + c
    }

    /// Get the value at `(y, x, z, c)`
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if any coordinate is out of range.
    pub fn get(&self, y: usize, x: usize, z: usize, c: usize) -> Result<f64> {
        self.check_coords(y, x, z, c)?;
        Ok(self.data[self.index(y, x, z, c)])
    }

    /// Set the value at `(y, x, z, c)`
    pub fn set(&mut self, y: usize, x: usize, z: usize, c: usize, value: f64) -> Result<()> {
        self.check_coords(y, x, z, c)?;
        let idx = self.index(y, x, z, c);
        self.data[idx] = value;
        Ok(())
    }

    #[inline]
    pub fn get_unchecked(&self, y: usize, x: usize, z: usize, c: usize) -> f64 {
        self.data[self.index(y, x, z, c)]
    }

    #[inline]
    pub fn set_unchecked(&mut self, y: usize, x: usize, z: usize, c: usize, value: f64) {
        let idx = self.index(y, x, z, c);
        self.data[idx] = value;
    }

    /// All channel values of the voxel at `(y, x, z)`
    #[inline]
    pub fn voxel(&self, y: usize, x: usize, z: usize) -> &[f64] {
        let start = self.index(y, x, z, 0);
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn voxel_mut(&mut self, y: usize, x: usize, z: usize) -> &mut [f64] {
        let start = self.index(y, x, z, 0);
        let channels = self.channels;
        &mut self.data[start..start + channels]
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Sum of one channel over all voxels
    pub fn channel_sum(&self, c: usize) -> f64 {
        self.data.iter().skip(c).step_by(self.channels).sum()
    }

    /// Check that every value lies in `[0, 1]`
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRangeValue` for the first offending value.
    pub fn check_unit_range(&self) -> Result<()> {
        check_unit_range(&self.data)
    }

    /// Check that this volume has exactly the given shape
    pub fn check_shape(
        &self,
        height: usize,
        width: usize,
        depth: usize,
        channels: usize,
    ) -> Result<()> {
        if self.shape() != (height, width, depth, channels) {
            return Err(Error::ShapeMismatch {
                expected: vec![height, width, depth, channels],
                actual: vec![self.height, self.width, self.depth, self.channels],
            });
        }
        Ok(())
    }

    fn check_coords(&self, y: usize, x: usize, z: usize, c: usize) -> Result<()> {
        if y >= self.height || x >= self.width || z >= self.depth || c >= self.channels {
            return Err(Error::IndexOutOfBounds {
                index: self.index(y, x, z, c),
                len: self.data.len(),
            });
        }
        Ok(())
    }
}

fn check_dims(height: usize, width: usize, depth: usize, channels: usize) -> Result<()> {
    if height == 0 || width == 0 || depth == 0 || channels == 0 {
        return Err(Error::InvalidDimension(vec![height, width, depth, channels]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_layout() {
        let vol = ChannelVolume::from_fn(2, 3, 4, 2, |y, x, z, c| {
            (y * 1000 + x * 100 + z * 10 + c) as f64
        })
        .unwrap();
        assert_eq!(vol.get(1, 2, 3, 1).unwrap(), 1231.0);
        assert_eq!(vol.voxel(0, 1, 2), &[120.0, 121.0]);
        assert_eq!(vol.data().len(), 2 * 3 * 4 * 2);
    }

    #[test]
    fn test_volume_rejects_zero_depth() {
        assert!(ChannelVolume::new(2, 2, 0, 1).is_err());
    }

    #[test]
    fn test_volume_bounds() {
        let mut vol = ChannelVolume::new(2, 2, 2, 1).unwrap();
        assert!(vol.set(0, 0, 2, 0, 1.0).is_err());
        vol.set(1, 1, 1, 0, 4.0).unwrap();
        assert_eq!(vol.channel_sum(0), 4.0);
        assert!(vol.check_shape(2, 2, 2, 1).is_ok());
        assert!(vol.check_shape(2, 2, 1, 1).is_err());
    }

    #[test]
    fn test_volume_unit_range() {
        let mut vol = ChannelVolume::new_with_value(1, 1, 3, 1, 0.5).unwrap();
        assert!(vol.check_unit_range().is_ok());
        vol.set(0, 0, 2, 0, -0.1).unwrap();
        assert!(matches!(
            vol.check_unit_range(),
            Err(Error::OutOfRangeValue { index: 2, .. })
        ));
    }
}
