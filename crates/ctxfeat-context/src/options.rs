//! Extractor options and shared validation

use crate::error::{ContextError, ContextResult};
use ctxfeat_core::{ChannelImage, ChannelVolume, Radius3};

/// Smallest class count a prediction map may have
pub const MIN_CLASSES: usize = 2;

/// Default side of the star averaging box
pub const DEFAULT_STAR_AVERAGE_SIZE: usize = 3;

/// Options for star features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StarOptions {
    /// Side of the box averaged around each neighbor sample, in addition
    /// to the raw sample. `None` gives raw samples only.
    pub average_size: Option<usize>,
}

impl StarOptions {
    /// Raw samples plus [`DEFAULT_STAR_AVERAGE_SIZE`] box averages
    pub fn averaged() -> Self {
        Self {
            average_size: Some(DEFAULT_STAR_AVERAGE_SIZE),
        }
    }

    /// Check the averaging box size.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::InvalidAverageSize` for an even or zero size.
    pub fn validate(&self) -> ContextResult<()> {
        match self.average_size {
            Some(size) if size == 0 || size % 2 == 0 => Err(ContextError::InvalidAverageSize(size)),
            _ => Ok(()),
        }
    }

    /// Features per neighbor offset: the sample, plus its box average
    pub fn samples_per_offset(&self) -> usize {
        if self.average_size.is_some() { 2 } else { 1 }
    }
}

pub(crate) fn check_classes(channels: usize) -> ContextResult<()> {
    if channels < MIN_CLASSES {
        return Err(ContextError::TooFewChannels {
            required: MIN_CLASSES,
            actual: channels,
        });
    }
    Ok(())
}

/// Radii must be non-empty and strictly increasing.
pub(crate) fn check_radii(radii: &[usize]) -> ContextResult<()> {
    if radii.is_empty() {
        return Err(ContextError::InvalidRadii("no radii given".to_string()));
    }
    if let Some(pair) = radii.windows(2).find(|p| p[1] <= p[0]) {
        return Err(ContextError::InvalidRadii(format!(
            "radii must be strictly increasing, got {} after {}",
            pair[1], pair[0]
        )));
    }
    Ok(())
}

/// Triplets must be non-empty, each one covering the previous and
/// differing from it.
pub(crate) fn check_radii_3d(radii: &[Radius3]) -> ContextResult<()> {
    if radii.is_empty() {
        return Err(ContextError::InvalidRadii("no radii given".to_string()));
    }
    if let Some(pair) = radii
        .windows(2)
        .find(|p| !p[1].covers(&p[0]) || p[1] == p[0])
    {
        return Err(ContextError::InvalidRadii(format!(
            "radii must be increasing per axis, got {:?} after {:?}",
            pair[1], pair[0]
        )));
    }
    Ok(())
}

pub(crate) fn check_output_2d(
    out: &ChannelImage,
    h: usize,
    w: usize,
    c: usize,
) -> ContextResult<()> {
    if out.shape() != (h, w, c) {
        let (oh, ow, oc) = out.shape();
        return Err(ContextError::ShapeMismatch {
            expected: vec![h, w, c],
            actual: vec![oh, ow, oc],
        });
    }
    Ok(())
}

pub(crate) fn check_output_3d(
    out: &ChannelVolume,
    h: usize,
    w: usize,
    d: usize,
    c: usize,
) -> ContextResult<()> {
    if out.shape() != (h, w, d, c) {
        let (oh, ow, od, oc) = out.shape();
        return Err(ContextError::ShapeMismatch {
            expected: vec![h, w, d, c],
            actual: vec![oh, ow, od, oc],
        });
    }
    Ok(())
}
