// Copyright 2025 the Amplio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image-level tests for the upsampling pass.

mod util;

use crate::util::{constant_image, image_from_rgb};
use amplio_cpu::{Image, ScaleError, Scaler};

#[cfg(feature = "multithreading")]
#[test]
fn threaded_upscale_matches_single_threaded() {
    use amplio_cpu::ScalerSettings;

    let mut rng = crate::util::TestRng::new(42);
    let mut src = Image::new(9, 7, [0.0; 4]);
    for y in 0..7_u16 {
        for x in 0..9_u16 {
            src.set_pixel(x, y, [rng.next_f32(), rng.next_f32(), rng.next_f32(), 1.0]);
        }
    }
    let mut serial = Image::new(18, 14, [0.0; 4]);
    Scaler::new().upscale(&src, &mut serial).unwrap();

    let mut parallel = Image::new(18, 14, [0.0; 4]);
    Scaler::with_settings(ScalerSettings { num_threads: 4 })
        .upscale(&src, &mut parallel)
        .unwrap();

    assert_eq!(serial.pixels(), parallel.pixels());
}

#[test]
fn flat_image_upscales_to_the_same_color() {
    let color = [0.25, 0.5, 0.75, 1.0];
    let src = constant_image(5, 3, color);
    let mut dst = Image::new(10, 6, [0.0; 4]);
    Scaler::new().upscale(&src, &mut dst).unwrap();
    for px in dst.pixels() {
        assert_eq!(*px, color);
    }
}

#[test]
fn two_by_two_block_reproduces_corners_exactly() {
    // A 2x2 block of primaries plus white, upscaled 2x. The outermost
    // output pixels sit in fully clamped neighborhoods, so deringing pins
    // them to their source color exactly.
    let src = image_from_rgb(
        2,
        2,
        &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 1.0]],
    );
    let mut dst = Image::new(4, 4, [0.0; 4]);
    Scaler::new().upscale(&src, &mut dst).unwrap();

    let corners = [
        ((0_u16, 0_u16), [1.0, 0.0, 0.0]),
        ((3, 0), [0.0, 1.0, 0.0]),
        ((0, 3), [0.0, 0.0, 1.0]),
        ((3, 3), [1.0, 1.0, 1.0]),
    ];
    for ((x, y), expected) in corners {
        let got = dst.get(x, y);
        for ch in 0..3 {
            assert!(
                (got[ch] - expected[ch]).abs() < 1e-6,
                "corner ({x}, {y}) channel {ch}: {} vs {}",
                got[ch],
                expected[ch]
            );
        }
    }
}

#[test]
fn two_by_two_block_keeps_sub_pixels_near_their_source() {
    let src = image_from_rgb(
        2,
        2,
        &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 1.0]],
    );
    let mut dst = Image::new(4, 4, [0.0; 4]);
    Scaler::new().upscale(&src, &mut dst).unwrap();

    // Every output channel stays inside the source's global range.
    for px in dst.pixels() {
        for ch in 0..3 {
            assert!((-1e-6..=1.0 + 1e-6).contains(&px[ch]));
        }
    }

    // Output pixels whose nearest source pixel is a primary color keep that
    // channel dominant; the kernel support is wide, but the bilinear
    // weighting and deringing keep the local color in charge.
    let dominated = [
        ((1_u16, 0_u16), 0_usize), // red half of the top edge
        ((0, 1), 0),
        ((1, 1), 0),
        ((2, 0), 1), // green half
        ((3, 1), 1),
        ((2, 1), 1),
        ((0, 2), 2), // blue half
        ((1, 2), 2),
        ((1, 3), 2),
    ];
    for ((x, y), ch) in dominated {
        let px = dst.get(x, y);
        for other in 0..3 {
            if other != ch {
                assert!(
                    px[ch] > px[other] + 0.1,
                    "({x}, {y}): channel {ch} not dominant in {px:?}"
                );
            }
        }
    }

    // The quadrant nearest the white source pixel stays bright in all
    // channels.
    for (x, y) in [(3_u16, 2_u16), (2, 3), (3, 3)] {
        let px = dst.get(x, y);
        for ch in 0..3 {
            assert!(px[ch] > 0.3, "({x}, {y}) channel {ch} too dark: {px:?}");
        }
    }
}

#[test]
fn upscale_rejects_empty_and_shrinking_targets() {
    let scaler = Scaler::new();
    let src = constant_image(4, 4, [0.5; 4]);

    let mut empty = Image::new(0, 0, [0.0; 4]);
    assert_eq!(
        scaler.upscale(&src, &mut empty),
        Err(ScaleError::EmptyImage)
    );

    let mut smaller = Image::new(3, 4, [0.0; 4]);
    assert_eq!(
        scaler.upscale(&src, &mut smaller),
        Err(ScaleError::Downscale {
            src_width: 4,
            src_height: 4,
            dst_width: 3,
            dst_height: 4,
        })
    );
}

#[test]
fn identity_scale_is_supported() {
    // A 1x "upscale" resolves every output pixel exactly on a source pixel.
    let src = image_from_rgb(
        3,
        1,
        &[[0.1, 0.2, 0.3], [0.6, 0.5, 0.4], [0.9, 0.8, 0.7]],
    );
    let mut dst = Image::new(3, 1, [0.0; 4]);
    Scaler::new().upscale(&src, &mut dst).unwrap();
    for (out, src_px) in dst.pixels().iter().zip(src.pixels()) {
        for ch in 0..3 {
            assert!(
                (out[ch] - src_px[ch]).abs() < 1e-4,
                "identity scale drifted: {out:?} vs {src_px:?}"
            );
        }
    }
}

#[test]
fn gradient_upscale_stays_within_source_extrema() {
    // A diagonal ramp; deringing bounds every output pixel by its local
    // neighborhood, so the global extrema bound the whole image.
    let mut src = Image::new(8, 8, [0.0; 4]);
    for y in 0..8_u16 {
        for x in 0..8_u16 {
            let v = f32::from(x + y) / 14.0;
            src.set_pixel(x, y, [v, v, v, 1.0]);
        }
    }
    let mut dst = Image::new(16, 16, [0.0; 4]);
    Scaler::new().upscale(&src, &mut dst).unwrap();
    for px in dst.pixels() {
        for ch in 0..3 {
            assert!((0.0..=1.0).contains(&px[ch]));
        }
    }
}
