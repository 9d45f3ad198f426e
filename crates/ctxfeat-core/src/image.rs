//! ChannelImage - 2D multi-channel floating-point grid
//!
//! `ChannelImage` holds `channels` values of `f64` per pixel. It is the
//! container for prediction maps, integral tables and feature outputs in 2D.
//!
//! # Examples
//!
//! ```
//! use ctxfeat_core::ChannelImage;
//!
//! // A 4x3 two-class probability map
//! let mut img = ChannelImage::new(4, 3, 2).unwrap();
//! img.set(1, 2, 0, 0.25).unwrap();
//! img.set(1, 2, 1, 0.75).unwrap();
//! assert_eq!(img.pixel(1, 2), &[0.25, 0.75]);
//! ```

use crate::error::{Error, Result};

/// Multi-channel 2D grid of `f64`
///
/// # Memory Layout
///
/// Data is stored row-major with the channel axis innermost and no padding.
/// The value at `(y, x, c)` is at index `(y * width + x) * channels + c`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelImage {
    /// Number of rows
    height: usize,
    /// Number of columns
    width: usize,
    /// Values per pixel
    channels: usize,
    /// Pixel data (row-major, channels innermost)
    data: Vec<f64>,
}

impl ChannelImage {
    /// Create a new image with all values set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if any axis is 0.
    pub fn new(height: usize, width: usize, channels: usize) -> Result<Self> {
        Self::new_with_value(height, width, channels, 0.0)
    }

    /// Create a new image with every value set to `value`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if any axis is 0.
    pub fn new_with_value(
        height: usize,
        width: usize,
        channels: usize,
        value: f64,
    ) -> Result<Self> {
        check_dims(height, width, channels)?;
        Ok(ChannelImage {
            height,
            width,
            channels,
            data: vec![value; height * width * channels],
        })
    }

    /// Create an image from raw data in `(y, x, c)` order
    ///
    /// # Errors
    ///
    /// Returns an error if an axis is 0 or the data length doesn't match.
    pub fn from_data(height: usize, width: usize, channels: usize, data: Vec<f64>) -> Result<Self> {
        check_dims(height, width, channels)?;
        let expected = height * width * channels;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{}x{} = {}",
                data.len(),
                height,
                width,
                channels,
                expected
            )));
        }
        Ok(ChannelImage {
            height,
            width,
            channels,
            data,
        })
    }

    /// Build an image by evaluating `f(y, x, c)` at every position
    pub fn from_fn<F>(height: usize, width: usize, channels: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        check_dims(height, width, channels)?;
        let mut data = Vec::with_capacity(height * width * channels);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    data.push(f(y, x, c));
                }
            }
        }
        Ok(ChannelImage {
            height,
            width,
            channels,
            data,
        })
    }

    /// Number of rows
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Values per pixel
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Shape as `(height, width, channels)`
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.channels)
    }

    /// Flat index of `(y, x, c)`
    #[inline]
    pub fn index(&self, y: usize, x: usize, c: usize) -> usize {
        (y * self.width + x) * self.channels + c
    }

    /// Get the value at `(y, x, c)`
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if any coordinate is out of range.
    #[inline]
    pub fn get(&self, y: usize, x: usize, c: usize) -> Result<f64> {
        self.check_coords(y, x, c)?;
        Ok(self.data[self.index(y, x, c)])
    }

    /// Set the value at `(y, x, c)`
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if any coordinate is out of range.
    #[inline]
    pub fn set(&mut self, y: usize, x: usize, c: usize, value: f64) -> Result<()> {
        self.check_coords(y, x, c)?;
        let idx = self.index(y, x, c);
        self.data[idx] = value;
        Ok(())
    }

    /// Get the value at `(y, x, c)` without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if the flat index is past the end of the data.
    #[inline]
    pub fn get_unchecked(&self, y: usize, x: usize, c: usize) -> f64 {
        self.data[self.index(y, x, c)]
    }

    /// Set the value at `(y, x, c)` without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if the flat index is past the end of the data.
    #[inline]
    pub fn set_unchecked(&mut self, y: usize, x: usize, c: usize, value: f64) {
        let idx = self.index(y, x, c);
        self.data[idx] = value;
    }

    /// All channel values of the pixel at `(y, x)`
    ///
    /// # Panics
    ///
    /// Panics if `(y, x)` is out of range.
    #[inline]
    pub fn pixel(&self, y: usize, x: usize) -> &[f64] {
        let start = self.index(y, x, 0);
        &self.data[start..start + self.channels]
    }

    /// Mutable channel values of the pixel at `(y, x)`
    #[inline]
    pub fn pixel_mut(&mut self, y: usize, x: usize) -> &mut [f64] {
        let start = self.index(y, x, 0);
        let channels = self.channels;
        &mut self.data[start..start + channels]
    }

    /// One row of data, `width * channels` values long
    #[inline]
    pub fn row(&self, y: usize) -> &[f64] {
        let len = self.width * self.channels;
        &self.data[y * len..(y + 1) * len]
    }

    /// Raw access to the data
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the image and return its data
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Set every value
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Copy one channel into a single-channel image
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `c >= channels`.
    pub fn extract_channel(&self, c: usize) -> Result<ChannelImage> {
        if c >= self.channels {
            return Err(Error::IndexOutOfBounds {
                index: c,
                len: self.channels,
            });
        }
        let data = self
            .data
            .iter()
            .skip(c)
            .step_by(self.channels)
            .copied()
            .collect();
        ChannelImage::from_data(self.height, self.width, 1, data)
    }

    /// Sum of one channel over all pixels
    pub fn channel_sum(&self, c: usize) -> f64 {
        self.data.iter().skip(c).step_by(self.channels).sum()
    }

    /// Check that every value lies in `[0, 1]`
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRangeValue` for the first offending value
    /// (NaN counts as out of range).
    pub fn check_unit_range(&self) -> Result<()> {
        check_unit_range(&self.data)
    }

    /// Check that this image has exactly the given shape
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` otherwise.
    pub fn check_shape(&self, height: usize, width: usize, channels: usize) -> Result<()> {
        if self.shape() != (height, width, channels) {
            return Err(Error::ShapeMismatch {
                expected: vec![height, width, channels],
                actual: vec![self.height, self.width, self.channels],
            });
        }
        Ok(())
    }

    fn check_coords(&self, y: usize, x: usize, c: usize) -> Result<()> {
        if y >= self.height || x >= self.width || c >= self.channels {
            return Err(Error::IndexOutOfBounds {
                index: self.index(y, x, c),
                len: self.data.len(),
            });
        }
        Ok(())
    }
}

fn check_dims(height: usize, width: usize, channels: usize) -> Result<()> {
    if height == 0 || width == 0 || channels == 0 {
        return Err(Error::InvalidDimension(vec![height, width, channels]));
    }
    Ok(())
}

/// Find the first value outside `[0, 1]` in a flat slice.
pub(crate) fn check_unit_range(data: &[f64]) -> Result<()> {
    match data
        .iter()
        .position(|v| !(0.0..=1.0).contains(v))
    {
        Some(index) => Err(Error::OutOfRangeValue {
            value: data[index],
            index,
        }),
        None => Ok(()),
    }
}
