//! Histogram bin assignment
//!
//! Maps one value to a weight per bin. `[0, 1]` is split into `nbins` bins
//! of width `dt = 1 / nbins`; bin `j` covers `[j * dt, (j + 1) * dt)` and the
//! last bin also takes `1.0`.
//!
//! Four strategies share the same accumulation code:
//!
//! | strategy      | weights                        | accepted values |
//! |---------------|--------------------------------|-----------------|
//! | `Hard`        | one-hot                        | `[0, 1]`        |
//! | `Overlapping` | multi-hot, not normalized      | `[0, 1]`        |
//! | `Triangular`  | triangle kernel mass, sums to 1 | any finite     |
//! | `Gaussian`    | Gaussian over bin centres, sums to 1 | any finite |

use crate::error::{IntegralError, IntegralResult};

/// Default number of histogram bins
pub const DEFAULT_NBINS: usize = 4;

/// Default overlap fraction for `Overlapping` and `Triangular`
pub const DEFAULT_FRAC_OVERLAP: f64 = 0.2;

/// Default Gaussian width, in bin widths
pub const DEFAULT_SIGMA: f64 = 0.5;

/// How a value is spread over the histogram bins
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BinWeighting {
    /// Single bin `floor(v * nbins)`, with `1.0` in the last bin
    #[default]
    Hard,
    /// Hard bin plus every bin whose range widened by `frac_overlap * dt`
    /// on each side strictly contains the value
    Overlapping { frac_overlap: f64 },
    /// Mass of a triangle kernel of half-width `frac_overlap * dt` centred
    /// on the value; tails beyond `[0, 1]` fold into the edge bins
    Triangular { frac_overlap: f64 },
    /// `exp(-d^2 / (2 sigma^2))` for the distance `d` (in bin widths) from
    /// the value to each bin centre, normalized
    Gaussian { sigma: f64 },
}

impl BinWeighting {
    /// `Overlapping` with [`DEFAULT_FRAC_OVERLAP`]
    pub fn overlapping() -> Self {
        BinWeighting::Overlapping {
            frac_overlap: DEFAULT_FRAC_OVERLAP,
        }
    }

    /// `Triangular` with [`DEFAULT_FRAC_OVERLAP`]
    pub fn triangular() -> Self {
        BinWeighting::Triangular {
            frac_overlap: DEFAULT_FRAC_OVERLAP,
        }
    }

    /// `Gaussian` with [`DEFAULT_SIGMA`]
    pub fn gaussian() -> Self {
        BinWeighting::Gaussian {
            sigma: DEFAULT_SIGMA,
        }
    }

    /// Check the strategy's parameters.
    ///
    /// # Errors
    ///
    /// - `InvalidOverlap` if `frac_overlap` is not in `[0, 1)`
    /// - `InvalidSigma` if `sigma` is not a finite positive number
    pub fn validate(&self) -> IntegralResult<()> {
        match *self {
            BinWeighting::Hard => Ok(()),
            BinWeighting::Overlapping { frac_overlap }
            | BinWeighting::Triangular { frac_overlap } => {
                if (0.0..1.0).contains(&frac_overlap) {
                    Ok(())
                } else {
                    Err(IntegralError::InvalidOverlap(frac_overlap))
                }
            }
            BinWeighting::Gaussian { sigma } => {
                if sigma.is_finite() && sigma > 0.0 {
                    Ok(())
                } else {
                    Err(IntegralError::InvalidSigma(sigma))
                }
            }
        }
    }

    /// True for the indicator strategies, which only accept values in `[0, 1]`
    pub fn requires_unit_range(&self) -> bool {
        matches!(self, BinWeighting::Hard | BinWeighting::Overlapping { .. })
    }

    /// True if `value` can be binned by this strategy
    pub fn accepts(&self, value: f64) -> bool {
        if self.requires_unit_range() {
            (0.0..=1.0).contains(&value)
        } else {
            value.is_finite()
        }
    }

    /// Write the weight of every bin for `value` into `out`.
    ///
    /// `out.len()` is the bin count. The strategy must have passed
    /// [`validate`](Self::validate) and the value [`accepts`](Self::accepts).
    pub fn weights(&self, value: f64, out: &mut [f64]) {
        let nbins = out.len();
        debug_assert!(nbins > 0);
        match *self {
            BinWeighting::Hard => {
                out.fill(0.0);
                out[hard_bin_index(value, nbins)] = 1.0;
            }
            BinWeighting::Overlapping { frac_overlap } => {
                overlapping_weights(value, frac_overlap, out);
            }
            BinWeighting::Triangular { frac_overlap } => {
                triangular_weights(value, frac_overlap, out);
            }
            BinWeighting::Gaussian { sigma } => {
                gaussian_weights(value, sigma, out);
            }
        }
    }
}

/// Bin of `value` under the inclusive-low policy.
///
/// `floor(value * nbins)`, clamped into `0..nbins` so that `1.0` lands in
/// the last bin.
#[inline]
pub fn hard_bin_index(value: f64, nbins: usize) -> usize {
    let scaled = (value * nbins as f64).floor();
    if scaled <= 0.0 || scaled.is_nan() {
        0
    } else {
        (scaled as usize).min(nbins - 1)
    }
}

fn overlapping_weights(value: f64, frac_overlap: f64, out: &mut [f64]) {
    let nbins = out.len();
    let dt = 1.0 / nbins as f64;
    let hard = hard_bin_index(value, nbins);
    for (j, w) in out.iter_mut().enumerate() {
        let lo = (j as f64 - frac_overlap) * dt;
        let hi = (j as f64 + 1.0 + frac_overlap) * dt;
        *w = if j == hard || (lo < value && value < hi) {
            1.0
        } else {
            0.0
        };
    }
}

/// CDF of a symmetric triangle distribution on `[center - h, center + h]`.
fn triangle_cdf(t: f64, center: f64, h: f64) -> f64 {
    if t <= center - h {
        0.0
    } else if t >= center + h {
        1.0
    } else if t <= center {
        let u = t - (center - h);
        u * u / (2.0 * h * h)
    } else {
        let u = center + h - t;
        1.0 - u * u / (2.0 * h * h)
    }
}

fn triangular_weights(value: f64, frac_overlap: f64, out: &mut [f64]) {
    let nbins = out.len();
    let dt = 1.0 / nbins as f64;
    let h = frac_overlap * dt;
    if h == 0.0 {
        out.fill(0.0);
        out[hard_bin_index(value, nbins)] = 1.0;
        return;
    }
    // Edge bins extend to infinity
    let mut below = 0.0;
    for (j, w) in out.iter_mut().enumerate() {
        let above = if j + 1 == nbins {
            1.0
        } else {
            triangle_cdf((j + 1) as f64 * dt, value, h)
        };
        *w = above - below;
        below = above;
    }
}

fn gaussian_weights(value: f64, sigma: f64, out: &mut [f64]) {
    let nbins = out.len();
    let scaled = value * nbins as f64;
    let dist = |j: usize| scaled - (j as f64 + 0.5);
    let nearest = (0..nbins).map(|j| dist(j).abs()).fold(f64::INFINITY, f64::min);
    let two_var = 2.0 * sigma * sigma;
    let mut total = 0.0;
    for (j, w) in out.iter_mut().enumerate() {
        let d = dist(j);
        *w = (-(d * d - nearest * nearest) / two_var).exp();
        total += *w;
    }
    for w in out.iter_mut() {
        *w /= total;
    }
}

/// Histogram options shared by the per-pixel and integral histogram builders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramOptions {
    /// Number of bins over `[0, 1]`, at least 1
    pub nbins: usize,
    /// Bin assignment strategy
    pub weighting: BinWeighting,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            nbins: DEFAULT_NBINS,
            weighting: BinWeighting::Hard,
        }
    }
}

impl HistogramOptions {
    pub fn new(nbins: usize, weighting: BinWeighting) -> Self {
        Self { nbins, weighting }
    }

    /// Hard binning with `nbins` bins
    pub fn hard(nbins: usize) -> Self {
        Self::new(nbins, BinWeighting::Hard)
    }

    /// Check the bin count and the strategy's parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBins` for `nbins == 0`, otherwise whatever
    /// [`BinWeighting::validate`] reports.
    pub fn validate(&self) -> IntegralResult<()> {
        if self.nbins == 0 {
            return Err(IntegralError::InvalidBins(self.nbins));
        }
        self.weighting.validate()
    }
}
