// Copyright 2025 the Amplio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transfer-function conversions.
//!
//! None of these are invoked by the filter kernels themselves; they convert
//! between encoded and linear-light values at the boundaries of a pipeline.
//! The PQ conversions exploit that PQ is very close to `x^(1/8)`, so the
//! encode direction reduces to a fast 8th root (and the gamma-2.0 flavor to a
//! 4th root) using the same bit-manipulation method as the approximations in
//! [`crate::math`]. Maximum error of the refined variants is around 0.7%.

/// Decode an sRGB-encoded value to linear light.
#[inline]
pub fn srgb_to_linear(x: f32) -> f32 {
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode a linear-light value to sRGB.
#[inline]
pub fn linear_to_srgb(x: f32) -> f32 {
    if x <= 0.003_130_8 {
        x * 12.92
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}

/// Decode a gamma-2.0 encoded value to linear light.
#[inline]
pub fn gamma2_to_linear(x: f32) -> f32 {
    x * x
}

/// Encode a linear-light value to gamma 2.0.
#[inline]
pub fn linear_to_gamma2(x: f32) -> f32 {
    x.sqrt()
}

#[inline]
fn quart(a: f32) -> f32 {
    let a = a * a;
    a * a
}

#[inline]
fn oct(a: f32) -> f32 {
    let a = a * a;
    let a = a * a;
    a * a
}

/// Decode PQ to linear light (8th power).
#[inline]
pub fn pq_to_linear(a: f32) -> f32 {
    oct(a)
}

/// Decode PQ to gamma 2.0 (4th power).
#[inline]
pub fn pq_to_gamma2(a: f32) -> f32 {
    quart(a)
}

/// Coarse linear-light to PQ encode (fast 8th root). Positive inputs only.
#[inline]
pub fn linear_to_pq_coarse(a: f32) -> f32 {
    f32::from_bits((a.to_bits() >> 3).wrapping_add(0x378d_8723))
}

/// Linear-light to PQ encode, refined with one Newton-Raphson step.
/// Positive inputs only.
#[inline]
pub fn linear_to_pq_refined(a: f32) -> f32 {
    let b = linear_to_pq_coarse(a);
    let b8 = oct(b);
    b - b * (b8 - a) / (8.0 * b8)
}

/// Coarse gamma-2.0 to PQ encode (fast 4th root). Positive inputs only.
#[inline]
pub fn gamma2_to_pq_coarse(a: f32) -> f32 {
    f32::from_bits((a.to_bits() >> 2).wrapping_add(0x2f9a_4e46))
}

/// Gamma-2.0 to PQ encode, refined with one Newton-Raphson step.
/// Positive inputs only.
#[inline]
pub fn gamma2_to_pq_refined(a: f32) -> f32 {
    let b = gamma2_to_pq_coarse(a);
    let b4 = quart(b);
    b - b * (b4 - a) / (4.0 * b4)
}
