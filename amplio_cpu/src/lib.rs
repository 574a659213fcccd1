// Copyright 2025 the Amplio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate implements a CPU-based image upscaler and sharpener.
//!
//! Two per-pixel filters make up the core:
//!
//! - [`easu`]: edge-adaptive spatial upsampling, a 12-tap resampling filter
//!   that estimates a local gradient direction and stretches a windowed
//!   Lanczos-like kernel along it.
//! - [`rcas`]: robust contrast-adaptive sharpening, a 5-tap sharpening
//!   filter whose strength is limited by the local clipping headroom, so it
//!   cannot ring.
//!
//! Both filters are pure functions from a small pixel neighborhood to one
//! output pixel; the [`Scaler`] runs them over whole images, optionally in
//! parallel with the `multithreading` feature. The companion modules
//! [`tonemap`], [`grain`], and [`dither`] hold the per-pixel helpers for
//! feeding HDR sources through the filters and quantizing their output.
//!
//! # Features
//!
//! - `multithreading`: Enable multi-threaded row dispatch in the image-level
//!   passes via a rayon thread pool.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET

pub mod dither;
pub mod easu;
pub mod grain;
pub mod rcas;
pub mod tonemap;

mod scaler;

use thiserror::Error;

pub use amplio_common::image::{Image, LinearPixel};
pub use scaler::{Scaler, ScalerSettings};

/// A source of pixel neighborhoods for the filter kernels.
///
/// The kernels request taps at integer offsets around the pixel they are
/// evaluating; coordinates may fall outside the image, and implementations
/// decide how to extend it. The provided [`Image`] implementation duplicates
/// edge pixels.
pub trait Source {
    /// The color at `(x, y)`.
    fn sample(&self, x: i32, y: i32) -> LinearPixel;
}

impl Source for Image<LinearPixel> {
    fn sample(&self, x: i32, y: i32) -> LinearPixel {
        self.sample_clamped(x, y)
    }
}

/// The cheapest multi-channel luma proxy there is (luma times two, in two
/// fused multiply-adds on most targets); used by both filters for gradient
/// and noise estimation, not for anything colorimetric.
#[inline]
pub(crate) fn luma(c: LinearPixel) -> f32 {
    c[2] * 0.5 + (c[0] * 0.5 + c[1])
}

/// Errors that can occur when running an image-level pass.
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScaleError {
    /// The source or destination image has no pixels.
    #[error("source and destination images must be non-empty")]
    EmptyImage,
    /// The upscaler cannot shrink an image.
    #[error("destination ({dst_width}x{dst_height}) is smaller than source ({src_width}x{src_height})")]
    Downscale {
        /// Source width in pixels.
        src_width: u16,
        /// Source height in pixels.
        src_height: u16,
        /// Destination width in pixels.
        dst_width: u16,
        /// Destination height in pixels.
        dst_height: u16,
    },
    /// The pass requires source and destination of the same size.
    #[error("expected matching dimensions, got {src_width}x{src_height} and {dst_width}x{dst_height}")]
    MismatchedDimensions {
        /// Source width in pixels.
        src_width: u16,
        /// Source height in pixels.
        src_height: u16,
        /// Destination width in pixels.
        dst_width: u16,
        /// Destination height in pixels.
        dst_height: u16,
    },
}
