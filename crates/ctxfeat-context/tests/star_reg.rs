//! Star feature regression test
//!
//! Tests star sampling against direct neighbor lookups:
//!   (1) 2D raw samples over the whole grid, sentinel outside
//!   (2) 2D box averages equal the direct box mean
//!   (3) 3D samples with anisotropic radii
//!   (4) selected-point extraction matches the full volume
//!   (5) radii far beyond the grid read as the sentinel

use ctxfeat_context::{
    ContextError, STAR_OFFSETS_2D, STAR_OFFSETS_3D, StarOptions, star_features_2d,
    star_features_3d, star_features_3d_at,
};
use ctxfeat_core::{ChannelImage, ChannelVolume, Radius3};
use ctxfeat_test::{RegParams, SUM_TOLERANCE};
use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;

fn random_pred(seed: u64, h: usize, w: usize, c: usize) -> ChannelImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Uniform::new_inclusive(0.0, 1.0).unwrap();
    ChannelImage::from_fn(h, w, c, |_, _, _| dist.sample(&mut rng)).unwrap()
}

fn random_pred_3d(seed: u64, h: usize, w: usize, d: usize) -> ChannelVolume {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Uniform::new_inclusive(0.0, 1.0).unwrap();
    ChannelVolume::from_fn(h, w, d, 2, |_, _, _, _| dist.sample(&mut rng)).unwrap()
}

/// `pos + delta` if it stays inside `[0, len)`
fn step(pos: usize, delta: isize, len: usize) -> Option<usize> {
    let p = pos as isize + delta;
    if p >= 0 && (p as usize) < len {
        Some(p as usize)
    } else {
        None
    }
}

// ============================================================================
// Test 1: 2D raw samples
// ============================================================================

#[test]
fn star_reg_raw_2d() {
    let mut rp = RegParams::new("star_raw_2d");

    let (h, w, nclasses) = (10, 13, 3);
    let pred = random_pred(12, h, w, nclasses);
    let radii = [1usize, 2, 5];
    let out = star_features_2d(&pred, &radii, &StarOptions::default()).unwrap();
    let nfeat = radii.len() * 8;
    rp.compare_values((nclasses * nfeat) as f64, out.channels() as f64, 0.0);

    let sentinel = 1.0 / nclasses as f64;
    for y in 0..h {
        for x in 0..w {
            for (i, &r) in radii.iter().enumerate() {
                for (k, &(dy, dx)) in STAR_OFFSETS_2D.iter().enumerate() {
                    let r = r as isize;
                    let nb = step(y, dy * r, h).zip(step(x, dx * r, w));
                    for c in 0..nclasses {
                        let expected =
                            nb.map_or(sentinel, |(ny, nx)| pred.get_unchecked(ny, nx, c));
                        let actual = out.get_unchecked(y, x, c * nfeat + i * 8 + k);
                        rp.compare_values(expected, actual, 0.0);
                    }
                }
            }
        }
    }

    // Radius 0 and decreasing radii are rejected
    rp.check(matches!(
        star_features_2d(&pred, &[0, 1], &StarOptions::default()),
        Err(ContextError::InvalidRadii(_))
    ));
    rp.check(matches!(
        star_features_2d(&pred, &[3, 2], &StarOptions::default()),
        Err(ContextError::InvalidRadii(_))
    ));

    assert!(rp.cleanup(), "star_raw_2d regression test failed");
}

// ============================================================================
// Test 2: 2D box averages
// ============================================================================

#[test]
fn star_reg_box_averages_2d() {
    let mut rp = RegParams::new("star_box_averages_2d");

    let (h, w) = (11, 12);
    let pred = random_pred(5, h, w, 2);
    let radii = [2usize, 4];
    let options = StarOptions {
        average_size: Some(5),
    };
    let out = star_features_2d(&pred, &radii, &options).unwrap();
    let per_radius = 16;
    let nfeat = radii.len() * per_radius;
    let raw = star_features_2d(&pred, &radii, &StarOptions::default()).unwrap();

    let half = 2isize;
    for y in 0..h {
        for x in 0..w {
            for (i, &r) in radii.iter().enumerate() {
                for (k, &(dy, dx)) in STAR_OFFSETS_2D.iter().enumerate() {
                    let r = r as isize;
                    let nb = step(y, dy * r, h).zip(step(x, dx * r, w));
                    // The box must fit around the neighbor
                    let boxed = nb.and_then(|(ny, nx)| {
                        step(ny, -half, h)?;
                        step(ny, half, h)?;
                        step(nx, -half, w)?;
                        step(nx, half, w)?;
                        Some((ny, nx))
                    });
                    for c in 0..2 {
                        let expected = boxed.map_or(0.5, |(ny, nx)| {
                            let mut sum = 0.0;
                            for yy in ny - 2..=ny + 2 {
                                for xx in nx - 2..=nx + 2 {
                                    sum += pred.get_unchecked(yy, xx, c);
                                }
                            }
                            sum / 25.0
                        });
                        let base = c * nfeat + i * per_radius;
                        let actual = out.get_unchecked(y, x, base + 8 + k);
                        rp.compare_values(expected, actual, SUM_TOLERANCE);
                        // Raw samples are unchanged by averaging
                        rp.compare_values(
                            raw.get_unchecked(y, x, c * radii.len() * 8 + i * 8 + k),
                            out.get_unchecked(y, x, base + k),
                            0.0,
                        );
                    }
                }
            }
        }
    }

    rp.check(matches!(
        star_features_2d(&pred, &radii, &StarOptions { average_size: Some(4) }),
        Err(ContextError::InvalidAverageSize(4))
    ));

    assert!(rp.cleanup(), "star_box_averages_2d regression test failed");
}

// ============================================================================
// Test 3-4: 3D samples and selected points
// ============================================================================

#[test]
fn star_reg_anisotropic_3d() {
    let mut rp = RegParams::new("star_anisotropic_3d");

    let (h, w, d) = (6, 5, 8);
    let pred = random_pred_3d(40, h, w, d);
    let radii = [Radius3::new(1, 1, 2), Radius3::new(2, 1, 3)];
    let out = star_features_3d(&pred, &radii).unwrap();
    let nfeat = radii.len() * 26;
    rp.compare_values((2 * nfeat) as f64, out.channels() as f64, 0.0);

    for y in 0..h {
        for x in 0..w {
            for z in 0..d {
                for (i, r) in radii.iter().enumerate() {
                    for (k, &(dy, dx, dz)) in STAR_OFFSETS_3D.iter().enumerate() {
                        let nb = step(y, dy * r.ry as isize, h)
                            .zip(step(x, dx * r.rx as isize, w))
                            .zip(step(z, dz * r.rz as isize, d));
                        for c in 0..2 {
                            let expected =
                                nb.map_or(0.5, |((ny, nx), nz)| pred.get_unchecked(ny, nx, nz, c));
                            rp.compare_values(
                                expected,
                                out.get_unchecked(y, x, z, c * nfeat + i * 26 + k),
                                0.0,
                            );
                        }
                    }
                }
            }
        }
    }

    assert!(rp.cleanup(), "star_anisotropic_3d regression test failed");
}

#[test]
fn star_reg_selected_points() {
    let mut rp = RegParams::new("star_selected_points");

    let (h, w, d) = (5, 6, 4);
    let pred = random_pred_3d(77, h, w, d);
    let radii = [Radius3::iso(1), Radius3::new(2, 2, 1)];
    let full = star_features_3d(&pred, &radii).unwrap();

    let points = [(0, 0, 0), (2, 3, 1), (4, 5, 3), (2, 3, 1), (1, 4, 2)];
    let selected = star_features_3d_at(&pred, &radii, &points).unwrap();
    rp.compare_values(points.len() as f64, selected.rows() as f64, 0.0);
    rp.compare_values(full.channels() as f64, selected.cols() as f64, 0.0);
    for (j, &(y, x, z)) in points.iter().enumerate() {
        rp.compare_slices(full.voxel(y, x, z), selected.row(j), 0.0);
    }

    // No points gives an empty matrix
    let empty = star_features_3d_at(&pred, &radii, &[]).unwrap();
    rp.compare_values(0.0, empty.rows() as f64, 0.0);

    // A point outside the grid is an error
    rp.check(star_features_3d_at(&pred, &radii, &[(1, 1, 4)]).is_err());

    assert!(rp.cleanup(), "star_selected_points regression test failed");
}

// ============================================================================
// Test 5: Radii far beyond the grid
// ============================================================================

#[test]
fn star_reg_huge_radii() {
    let mut rp = RegParams::new("star_huge_radii");

    let pred = random_pred(3, 3, 3, 2);
    for r in [1usize << 32, 1 << 63, usize::MAX] {
        let out = star_features_2d(&pred, &[1, r], &StarOptions::averaged()).unwrap();
        // Second radius block: 8 samples then 8 box averages, all sentinel
        for c in 0..2 {
            let base = c * 32 + 16;
            rp.compare_slices(&[0.5; 16], &out.pixel(1, 1)[base..base + 16], 0.0);
        }
    }

    // Only the huge axis leaves the grid; offsets with dy = 0 still sample
    let vol = random_pred_3d(9, 3, 3, 3);
    let radii = [Radius3::iso(1), Radius3::new(usize::MAX, 1, 1)];
    let out = star_features_3d(&vol, &radii).unwrap();
    let nfeat = 2 * 26;
    for (k, &(dy, dx, dz)) in STAR_OFFSETS_3D.iter().enumerate() {
        for c in 0..2 {
            let expected = if dy == 0 {
                vol.get_unchecked(1, (1 + dx) as usize, (1 + dz) as usize, c)
            } else {
                0.5
            };
            rp.compare_values(expected, out.get_unchecked(1, 1, 1, c * nfeat + 26 + k), 0.0);
        }
    }

    assert!(rp.cleanup(), "star_huge_radii regression test failed");
}
