// Copyright 2025 the Amplio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Temporal energy preserving dither.
//!
//! Quantizes `{0 to 1}` linear color to gamma-2.0 steps for 8-bit or 10-bit
//! storage (gamma 2.0 so the decode back to linear is just a square). Instead
//! of rounding to the perceptually nearest step, the quantizer compares a
//! dither threshold against the linear-space ratio between the two adjacent
//! steps; with a good non-biased temporal noise source the output then
//! conserves energy over time instead of drifting.

use amplio_common::math::{if_positive, rcp_refined, saturate};

/// Hand-tuned screen-position dither value in `[0, 1)`.
///
/// `f` is a frame counter for temporal variation; keep it `0` for stills.
/// Only 32-bit float has enough precision for this computation.
#[inline]
pub fn dither_value(p: [u32; 2], f: u32) -> f32 {
    let x = (p[0].wrapping_add(f)) as f32;
    let y = p[1] as f32;
    // The 1.61803 golden ratio.
    let a = (1.0 + 5.0_f32.sqrt()) / 2.0;
    // Number designed to provide a good visual pattern.
    let b = 1.0 / 3.69;
    (x * a + y * b).fract()
}

/// Quantize linear `{0 to 1}` color to 8-bit gamma-2.0 steps.
#[inline]
pub fn quantize_gamma2_8bit(c: [f32; 3], dit: f32) -> [f32; 3] {
    quantize(c, dit, 255.0)
}

/// Quantize linear `{0 to 1}` color to 10-bit gamma-2.0 steps.
#[inline]
pub fn quantize_gamma2_10bit(c: [f32; 3], dit: f32) -> [f32; 3] {
    quantize(c, dit, 1023.0)
}

#[inline]
fn quantize(c: [f32; 3], dit: f32, steps: f32) -> [f32; 3] {
    core::array::from_fn(|ch| {
        let x = c[ch];
        // Lower of the two adjacent steps in gamma-2.0 space.
        let n = (x.sqrt() * steps).floor() * (1.0 / steps);
        // Both candidate steps, decoded back to linear.
        let a = n * n;
        let b = n + 1.0 / steps;
        let b = b * b;
        // Ratio of 'a' to 'b' required to reproduce x; the coarse reciprocal
        // is not accurate enough here at high dynamic range.
        let r = (x - b) * rcp_refined(a - b);
        // Use the ratio as the cutoff between the two steps.
        saturate(n + if_positive(dit - r) * (1.0 / steps))
    })
}
