// Copyright 2025 the Amplio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simple reversible tone mapper.
//!
//! The sharpening pass assumes `[0, 1]` input, so linear HDR color has to be
//! compressed first and expanded again afterwards. The mapping preserves the
//! RGB ratio, which keeps HDR color bleed intact through the filters.
//!
//! ```
//! use amplio_cpu::tonemap;
//!
//! let hdr = [100.0, 50.0, 1.0];
//! let sdr = tonemap::compress(hdr);
//! assert!(sdr.iter().all(|c| (0.0..1.0).contains(c)));
//! let back = tonemap::expand(sdr);
//! assert!((back[0] - 100.0).abs() < 0.01);
//! ```

use amplio_common::math::max3;

/// Map linear `{0 to 32768}` color into `{0 to 1}`.
#[inline]
pub fn compress(c: [f32; 3]) -> [f32; 3] {
    let scale = 1.0 / (max3(c[0], c[1], c[2]) + 1.0);
    [c[0] * scale, c[1] * scale, c[2] * scale]
}

/// Invert [`compress`], mapping `{0 to 1}` back to `{0 to 32768}`.
#[inline]
pub fn expand(c: [f32; 3]) -> [f32; 3] {
    // The lower bound on the divisor solves the c = 1.0 case, which is
    // otherwise a division by zero; it also caps the output at a peak that
    // is safe for half-float storage.
    let scale = 1.0 / (1.0 / 32768.0_f32).max(1.0 - max3(c[0], c[1], c[2]));
    [c[0] * scale, c[1] * scale, c[2] * scale]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_lands_in_unit_range() {
        for c in [
            [0.0, 0.0, 0.0],
            [1.0, 0.5, 0.25],
            [100.0, 50.0, 1.0],
            [30000.0, 1.0, 0.0],
        ] {
            let t = compress(c);
            assert!(t.iter().all(|v| (0.0..1.0).contains(v)), "{t:?}");
        }
    }

    #[test]
    fn round_trips_preserve_ratio_and_value() {
        for c in [
            [1.0, 0.5, 0.25],
            [100.0, 50.0, 1.0],
            [4096.0, 16.0, 0.5],
            [30000.0, 1.0, 0.0],
        ] {
            let back = expand(compress(c));
            for ch in 0..3 {
                let err = (back[ch] - c[ch]).abs() / c[ch].max(1.0);
                assert!(err < 1e-3, "round trip failed for {c:?}: {back:?}");
            }
        }
    }

    #[test]
    fn black_is_a_fixed_point() {
        assert_eq!(compress([0.0; 3]), [0.0; 3]);
        assert_eq!(expand([0.0; 3]), [0.0; 3]);
    }
}
