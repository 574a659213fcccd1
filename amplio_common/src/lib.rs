// Copyright 2025 the Amplio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared foundations for the Amplio CPU upscaling filters.
//!
//! This crate holds the pieces that every filter pass needs and that carry no
//! filter semantics of their own:
//!
//! - [`image`]: a plain row-major image container and the linear-light pixel
//!   type the filters operate on.
//! - [`math`]: saturate/min3/max3 style helpers and the bit-manipulation
//!   float approximations the filter kernels are built from.
//! - [`transfer`]: sRGB, gamma 2.0, and PQ transfer-function conversions.
//!
//! This crate should not be used on its own; it acts as a foundation for
//! `amplio_cpu`, providing essential components to minimize duplication.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET

pub mod image;
pub mod math;
pub mod transfer;
