//! Pixel histogram regression test
//!
//! Tests per-pixel bin weights on prediction maps:
//!   (1) the hard fixture, nbins = 2
//!   (2) the overlapping fixture, nbins = 5, overlap 0.5
//!   (3) soft strategies place their mass around the value

use ctxfeat_context::{BinWeighting, ContextError, HistogramOptions, pixel_histogram_2d};
use ctxfeat_core::ChannelImage;
use ctxfeat_test::RegParams;

fn fixture(ch0: [[f64; 5]; 2], ch1: [[f64; 5]; 2]) -> ChannelImage {
    ChannelImage::from_fn(2, 5, 2, |y, x, c| if c == 0 { ch0[y][x] } else { ch1[y][x] }).unwrap()
}

fn check_pattern(rp: &mut RegParams, out: &ChannelImage, expected: &[&str]) {
    for (k, rows) in expected.iter().enumerate() {
        for (y, row) in rows.split('/').enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let v = if ch == '1' { 1.0 } else { 0.0 };
                rp.compare_values(v, out.get_unchecked(y, x, k), 0.0);
            }
        }
    }
}

#[test]
fn histogram_reg_hard_pixels() {
    let mut rp = RegParams::new("pixel_histogram_hard");

    let pred = fixture(
        [[0.5, 0.3, 0.4, 0.6, 1.0], [0.33, 0.2, 0.6, 0.9, 0.0]],
        [[0.5, 0.7, 0.6, 0.4, 0.0], [0.77, 0.8, 0.4, 0.1, 1.0]],
    );
    let out = pixel_histogram_2d(&pred, &HistogramOptions::hard(2)).unwrap();
    rp.compare_values(4.0, out.channels() as f64, 0.0);
    check_pattern(&mut rp, &out, &["01100/11001", "10011/00110", "00011/00110", "11100/11001"]);

    assert!(rp.cleanup(), "pixel_histogram_hard regression test failed");
}

#[test]
fn histogram_reg_overlapping_pixels() {
    let mut rp = RegParams::new("pixel_histogram_overlapping");

    let pred = fixture(
        [[0.5, 0.33, 0.45, 0.6, 1.0], [0.33, 0.2, 0.61, 0.9, 0.0]],
        [[0.51, 0.7, 0.61, 0.44, 0.11], [0.77, 0.8, 0.42, 0.12, 1.0]],
    );
    let options = HistogramOptions::new(5, BinWeighting::Overlapping { frac_overlap: 0.5 });
    let out = pixel_histogram_2d(&pred, &options).unwrap();
    check_pattern(
        &mut rp,
        &out,
        &[
            "00000/01001",
            "01100/11000",
            "11110/10100",
            "00010/00100",
            "00001/00010",
            "00001/00010",
            "00011/00110",
            "11110/00100",
            "11100/11000",
            "00000/11001",
        ],
    );

    // Overlapping bins need values in [0, 1]
    let bad = fixture([[0.5; 5], [0.5, 0.5, 1.2, 0.5, 0.5]], [[0.5; 5]; 2]);
    rp.check(matches!(pixel_histogram_2d(&bad, &options), Err(ContextError::Integral(_))));

    assert!(rp.cleanup(), "pixel_histogram_overlapping regression test failed");
}

#[test]
fn histogram_reg_soft_pixels() {
    let mut rp = RegParams::new("pixel_histogram_soft");

    let pred = ChannelImage::from_data(1, 1, 2, vec![0.1, 0.9]).unwrap();
    for weighting in [BinWeighting::triangular(), BinWeighting::gaussian()] {
        let out = pixel_histogram_2d(&pred, &HistogramOptions::new(5, weighting)).unwrap();
        let px = out.pixel(0, 0);
        // Class 0 peaks in the first bin, class 1 in the last
        let argmax = |bins: &[f64]| {
            (0..bins.len())
                .max_by(|&a, &b| bins[a].total_cmp(&bins[b]))
                .unwrap_or(usize::MAX)
        };
        rp.compare_values(0.0, argmax(&px[..5]) as f64, 0.0);
        rp.compare_values(4.0, argmax(&px[5..]) as f64, 0.0);
        rp.compare_values(1.0, px[..5].iter().sum(), 1e-12);
        rp.compare_values(1.0, px[5..].iter().sum(), 1e-12);
        // Mirrored values give mirrored weights
        for b in 0..5 {
            rp.compare_values(px[b], px[5 + 4 - b], 1e-12);
        }
    }

    assert!(rp.cleanup(), "pixel_histogram_soft regression test failed");
}
