//! Ring feature regression test
//!
//! Tests shell statistics against direct loops over the shell pixels:
//!   (1) 2D shell means and variances on a random probability map
//!   (2) border pixels read the uniform sentinel
//!   (3) 3D shells with anisotropic radii
//!   (4) shell histograms are normalized and match direct counts
//!   (5) the table and into variants agree with the one-shot call
//!   (6) radii far beyond the grid read as the sentinel

use ctxfeat_context::{
    ContextError, ring_histograms_2d, ring_histograms_2d_from_table, ring_means_2d,
    ring_means_2d_from_table, ring_means_2d_into, ring_means_3d, ring_means_variances_2d,
    ring_means_variances_3d,
};
use ctxfeat_core::{ChannelImage, ChannelVolume, Radius3};
use ctxfeat_integral::{HistogramOptions, IntegralHistogram, IntegralImage, hard_bin_index};
use ctxfeat_test::{RegParams, SUM_TOLERANCE};
use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;

/// Two-class probability map: class 1 is the complement of class 0
fn random_pred(seed: u64, h: usize, w: usize) -> ChannelImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Uniform::new_inclusive(0.0, 1.0).unwrap();
    let p: Vec<f64> = (0..h * w).map(|_| dist.sample(&mut rng)).collect();
    ChannelImage::from_fn(h, w, 2, |y, x, c| {
        if c == 0 { p[y * w + x] } else { 1.0 - p[y * w + x] }
    })
    .unwrap()
}

fn random_pred_3d(seed: u64, h: usize, w: usize, d: usize) -> ChannelVolume {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Uniform::new_inclusive(0.0, 1.0).unwrap();
    let p: Vec<f64> = (0..h * w * d).map(|_| dist.sample(&mut rng)).collect();
    ChannelVolume::from_fn(h, w, d, 2, |y, x, z, c| {
        let v = p[(y * w + x) * d + z];
        if c == 0 { v } else { 1.0 - v }
    })
    .unwrap()
}

/// Values of channel `c` in the shell between `inner` and `outer`, or
/// `None` if the outer window leaves the grid
fn shell_values_2d(
    src: &ChannelImage,
    (y, x): (usize, usize),
    inner: Option<usize>,
    outer: usize,
    c: usize,
) -> Option<Vec<f64>> {
    let (h, w, _) = src.shape();
    if y < outer || x < outer || y + outer >= h || x + outer >= w {
        return None;
    }
    let mut values = Vec::new();
    for yy in y - outer..=y + outer {
        for xx in x - outer..=x + outer {
            let in_inner = inner.is_some_and(|r| yy.abs_diff(y) <= r && xx.abs_diff(x) <= r);
            if !in_inner {
                values.push(src.get_unchecked(yy, xx, c));
            }
        }
    }
    Some(values)
}

fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var)
}

// ============================================================================
// Test 1-2: 2D shells against direct loops
// ============================================================================

#[test]
fn ring_reg_means_variances_2d() {
    let mut rp = RegParams::new("ring_means_variances_2d");

    let (h, w) = (12, 15);
    let pred = random_pred(21, h, w);
    let radii = [0usize, 1, 3, 5];
    let n = radii.len();
    let means = ring_means_2d(&pred, &radii).unwrap();
    let stats = ring_means_variances_2d(&pred, &radii).unwrap();
    rp.compare_values((2 * n) as f64, means.channels() as f64, 0.0);
    rp.compare_values((4 * n) as f64, stats.channels() as f64, 0.0);

    let mut in_bounds = 0;
    for y in 0..h {
        for x in 0..w {
            for c in 0..2 {
                for (i, &r) in radii.iter().enumerate() {
                    let inner = if i == 0 { None } else { Some(radii[i - 1]) };
                    let (mean, var) = match shell_values_2d(&pred, (y, x), inner, r, c) {
                        Some(values) => {
                            in_bounds += 1;
                            mean_and_variance(&values)
                        }
                        None => (0.5, 0.5),
                    };
                    let base = c * 2 * n;
                    rp.compare_values(mean, means.get_unchecked(y, x, c * n + i), SUM_TOLERANCE);
                    rp.compare_values(mean, stats.get_unchecked(y, x, base + i), SUM_TOLERANCE);
                    rp.compare_values(var, stats.get_unchecked(y, x, base + n + i), SUM_TOLERANCE);
                }
            }
        }
    }
    rp.check(in_bounds > 0);

    assert!(rp.cleanup(), "ring_means_variances_2d regression test failed");
}

#[test]
fn ring_reg_border_sentinel() {
    let mut rp = RegParams::new("ring_border_sentinel");

    // Four classes: the sentinel is 1/4
    let pred = ChannelImage::new_with_value(7, 9, 4, 0.25).unwrap();
    let radii = [1usize, 3];
    let out = ring_means_2d(&pred, &radii).unwrap();
    for y in 0..7 {
        for x in 0..9 {
            // In-bounds means of a uniform map equal the sentinel
            for c in 0..4 {
                rp.compare_values(0.25, out.get_unchecked(y, x, c * 2), SUM_TOLERANCE);
                rp.compare_values(0.25, out.get_unchecked(y, x, c * 2 + 1), SUM_TOLERANCE);
            }
        }
    }

    // Non-uniform input: the sentinel shows up where radius 3 does not fit
    let pred = ChannelImage::from_fn(7, 9, 2, |_, _, c| if c == 0 { 0.9 } else { 0.1 }).unwrap();
    let out = ring_means_2d(&pred, &radii).unwrap();
    rp.compare_values(0.9, out.get_unchecked(3, 4, 1), SUM_TOLERANCE);
    rp.compare_values(0.5, out.get_unchecked(2, 4, 1), 0.0);
    rp.compare_values(0.9, out.get_unchecked(2, 4, 0), SUM_TOLERANCE);
    rp.compare_values(0.5, out.get_unchecked(0, 0, 0), 0.0);
    rp.compare_values(0.5, out.get_unchecked(0, 0, 2), 0.0);

    assert!(rp.cleanup(), "ring_border_sentinel regression test failed");
}

// ============================================================================
// Test 3: 3D anisotropic shells
// ============================================================================

#[test]
fn ring_reg_anisotropic_3d() {
    let mut rp = RegParams::new("ring_anisotropic_3d");

    let (h, w, d) = (5, 6, 7);
    let pred = random_pred_3d(8, h, w, d);
    let radii = [Radius3::new(0, 1, 0), Radius3::new(1, 1, 2), Radius3::new(2, 2, 3)];
    let n = radii.len();
    let means = ring_means_3d(&pred, &radii).unwrap();
    let stats = ring_means_variances_3d(&pred, &radii).unwrap();

    for y in 0..h {
        for x in 0..w {
            for z in 0..d {
                for c in 0..2 {
                    for (i, r) in radii.iter().enumerate() {
                        let fits = y >= r.ry
                            && y + r.ry < h
                            && x >= r.rx
                            && x + r.rx < w
                            && z >= r.rz
                            && z + r.rz < d;
                        let (mean, var) = if fits {
                            let mut values = Vec::new();
                            for yy in y - r.ry..=y + r.ry {
                                for xx in x - r.rx..=x + r.rx {
                                    for zz in z - r.rz..=z + r.rz {
                                        let in_inner = i > 0 && {
                                            let q = radii[i - 1];
                                            yy.abs_diff(y) <= q.ry
                                                && xx.abs_diff(x) <= q.rx
                                                && zz.abs_diff(z) <= q.rz
                                        };
                                        if !in_inner {
                                            values.push(pred.get_unchecked(yy, xx, zz, c));
                                        }
                                    }
                                }
                            }
                            mean_and_variance(&values)
                        } else {
                            (0.5, 0.5)
                        };
                        let base = c * 2 * n;
                        let actual = means.get_unchecked(y, x, z, c * n + i);
                        rp.compare_values(mean, actual, SUM_TOLERANCE);
                        let actual = stats.get_unchecked(y, x, z, base + i);
                        rp.compare_values(mean, actual, SUM_TOLERANCE);
                        let actual = stats.get_unchecked(y, x, z, base + n + i);
                        rp.compare_values(var, actual, SUM_TOLERANCE);
                    }
                }
            }
        }
    }

    // A triplet that shrinks on one axis is rejected
    let bad = [Radius3::new(1, 1, 1), Radius3::new(2, 0, 2)];
    rp.check(matches!(ring_means_3d(&pred, &bad), Err(ContextError::InvalidRadii(_))));

    assert!(rp.cleanup(), "ring_anisotropic_3d regression test failed");
}

// ============================================================================
// Test 4: Shell histograms
// ============================================================================

#[test]
fn ring_reg_histograms() {
    let mut rp = RegParams::new("ring_histograms");

    let (h, w) = (9, 10);
    let pred = random_pred(4, h, w);
    let radii = [1usize, 2, 4];
    let nbins = 5;
    let options = HistogramOptions::hard(nbins);
    let out = ring_histograms_2d(&pred, &radii, &options).unwrap();
    let block = 2 * nbins;
    rp.compare_values((radii.len() * block) as f64, out.channels() as f64, 0.0);

    for y in 0..h {
        for x in 0..w {
            for (i, &r) in radii.iter().enumerate() {
                let inner = if i == 0 { None } else { Some(radii[i - 1]) };
                for c in 0..2 {
                    let base = i * block + c * nbins;
                    let hist = &out.pixel(y, x)[base..base + nbins];
                    match shell_values_2d(&pred, (y, x), inner, r, c) {
                        Some(values) => {
                            rp.compare_values(1.0, hist.iter().sum(), SUM_TOLERANCE);
                            for (b, &actual) in hist.iter().enumerate() {
                                let count = values
                                    .iter()
                                    .filter(|&&v| hard_bin_index(v, nbins) == b)
                                    .count();
                                let expected = count as f64 / values.len() as f64;
                                rp.compare_values(expected, actual, SUM_TOLERANCE);
                            }
                        }
                        None => {
                            rp.check(hist.iter().all(|&v| v == 0.5));
                        }
                    }
                }
            }
        }
    }

    assert!(rp.cleanup(), "ring_histograms regression test failed");
}

// ============================================================================
// Test 5: Table and into variants
// ============================================================================

#[test]
fn ring_reg_table_variants() {
    let mut rp = RegParams::new("ring_table_variants");

    let pred = random_pred(31, 8, 8);
    let radii = [0usize, 2];
    let direct = ring_means_2d(&pred, &radii).unwrap();

    let table = IntegralImage::build(&pred).unwrap();
    let from_table = ring_means_2d_from_table(&table, &radii).unwrap();
    rp.compare_images(&direct, &from_table, 0.0);

    let mut out = ChannelImage::new(8, 8, 4).unwrap();
    ring_means_2d_into(&table, &radii, &mut out).unwrap();
    rp.compare_images(&direct, &out, 0.0);

    // A wrong output shape fails and leaves the buffer alone
    let mut wrong = ChannelImage::new_with_value(8, 8, 3, 7.0).unwrap();
    rp.check(matches!(
        ring_means_2d_into(&table, &radii, &mut wrong),
        Err(ContextError::ShapeMismatch { .. })
    ));
    rp.check(wrong.data().iter().all(|&v| v == 7.0));

    let options = HistogramOptions::default();
    let hist = IntegralHistogram::build(&pred, &options).unwrap();
    rp.compare_images(
        &ring_histograms_2d(&pred, &radii, &options).unwrap(),
        &ring_histograms_2d_from_table(&hist, &radii).unwrap(),
        0.0,
    );

    assert!(rp.cleanup(), "ring_table_variants regression test failed");
}

// ============================================================================
// Test 6: Radii far beyond the grid
// ============================================================================

#[test]
fn ring_reg_huge_radii() {
    let mut rp = RegParams::new("ring_huge_radii");

    let pred = random_pred(2, 5, 5);
    for r in [1usize << 32, usize::MAX] {
        let radii = [0, r];
        let means = ring_means_2d(&pred, &radii).unwrap();
        let stats = ring_means_variances_2d(&pred, &radii).unwrap();
        let hist = ring_histograms_2d(&pred, &radii, &HistogramOptions::hard(3)).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                for c in 0..2 {
                    let v = pred.get_unchecked(y, x, c);
                    rp.compare_values(v, means.get_unchecked(y, x, c * 2), SUM_TOLERANCE);
                    rp.compare_values(0.5, means.get_unchecked(y, x, c * 2 + 1), 0.0);
                    rp.compare_values(0.5, stats.get_unchecked(y, x, c * 4 + 1), 0.0);
                    rp.compare_values(0.5, stats.get_unchecked(y, x, c * 4 + 3), 0.0);
                }
                rp.check(hist.pixel(y, x)[6..].iter().all(|&v| v == 0.5));
            }
        }
    }

    let vol = random_pred_3d(6, 3, 3, 3);
    for r in [Radius3::iso(1 << 22), Radius3::iso(usize::MAX), Radius3::new(0, 0, usize::MAX)] {
        let radii = [Radius3::iso(0), r];
        let means = ring_means_3d(&vol, &radii).unwrap();
        let stats = ring_means_variances_3d(&vol, &radii).unwrap();
        for c in 0..2 {
            let v = vol.get_unchecked(1, 1, 1, c);
            rp.compare_values(v, means.get_unchecked(1, 1, 1, c * 2), SUM_TOLERANCE);
            rp.compare_values(0.5, means.get_unchecked(1, 1, 1, c * 2 + 1), 0.0);
            rp.compare_values(0.5, stats.get_unchecked(1, 1, 1, c * 4 + 3), 0.0);
        }
    }

    assert!(rp.cleanup(), "ring_huge_radii regression test failed");
}
