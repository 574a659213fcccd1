// Copyright 2025 the Amplio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge-adaptive spatial upsampling.
//!
//! The filter produces one output pixel from a 12-tap neighborhood of the
//! source. A local gradient direction and edge strength are estimated from
//! cheap luma values, and a polynomial approximation of a windowed Lanczos-2
//! kernel is rotated and anisotropically stretched along that direction
//! before the taps are accumulated. The result is clamped to the min/max of
//! the four nearest taps, so the negative lobes cannot produce halos outside
//! the local color range.
//!
//! Everything here is per-invocation state; use [`Scaler`](crate::Scaler) to
//! run the kernel over a whole image.

use crate::{LinearPixel, Source, luma};
use amplio_common::math::{lerp, max3_v, min3_v, rcp_coarse, rsqrt_coarse, saturate};

/// Below this squared gradient magnitude a neighborhood counts as flat and
/// the direction falls back to horizontal, so noise is not amplified into a
/// fake edge.
const FLAT_DIR_THRESHOLD: f32 = 1.0 / 32768.0;

/// Per-pass constants mapping output pixel coordinates into the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasuConstants {
    /// Output-to-input scale per axis.
    pub scale: [f32; 2],
    /// Half-texel alignment offset per axis.
    pub offset: [f32; 2],
}

impl EasuConstants {
    /// Derive the constants for scaling `input_size` up to `output_size`
    /// (both as `(width, height)`).
    pub fn new(input_size: (u16, u16), output_size: (u16, u16)) -> Self {
        let scale = [
            f32::from(input_size.0) / f32::from(output_size.0),
            f32::from(input_size.1) / f32::from(output_size.1),
        ];
        // Output pixel centers map to input pixel centers: x_in + 0.5 =
        // (x_out + 0.5) * scale, folded into a per-axis offset.
        let offset = [0.5 * scale[0] - 0.5, 0.5 * scale[1] - 0.5];
        Self { scale, offset }
    }
}

/// Accumulate gradient direction and length for one quadrant of the 2x2
/// cell, weighted by that quadrant's bilinear weight `w`.
///
/// The five lumas form a '+' pattern:
/// ```text
///    a
///  b c d
///    e
/// ```
/// Direction is the across-the-center difference per axis. The length term
/// normalizes each axis gradient by the larger of its two one-sided
/// differences, then squares it: a gradient reversal contributes zero,
/// a consistent gradient contributes the full weight.
fn accumulate_direction(dir: &mut [f32; 2], len: &mut f32, w: f32, l: [f32; 5]) {
    let [la, lb, lc, ld, le] = l;

    let dc = ld - lc;
    let cb = lc - lb;
    let mut len_x = dc.abs().max(cb.abs());
    len_x = rcp_coarse(len_x);
    let dir_x = ld - lb;
    dir[0] += dir_x * w;
    len_x = saturate(dir_x.abs() * len_x);
    len_x *= len_x;
    *len += len_x * w;

    let ec = le - lc;
    let ca = lc - la;
    let mut len_y = ec.abs().max(ca.abs());
    len_y = rcp_coarse(len_y);
    let dir_y = le - la;
    dir[1] += dir_y * w;
    len_y = saturate(dir_y.abs() * len_y);
    len_y *= len_y;
    *len += len_y * w;
}

/// Accumulate one tap of the resampling kernel.
///
/// `off` is the offset from the resolve position to the tap, `dir` the unit
/// gradient direction, `len` the anisotropic axis scales, `lob` the negative
/// lobe strength and `clp` the squared-distance clipping point.
#[expect(clippy::too_many_arguments, reason = "plain per-tap kernel state")]
fn lanczos_tap(
    ac: &mut [f32; 3],
    aw: &mut f32,
    off: [f32; 2],
    dir: [f32; 2],
    len: [f32; 2],
    lob: f32,
    clp: f32,
    c: LinearPixel,
) {
    // Rotate the offset into the edge-aligned frame, then apply anisotropy.
    let v = [
        (off[0] * dir[0] + off[1] * dir[1]) * len[0],
        (off[0] * -dir[1] + off[1] * dir[0]) * len[1],
    ];
    // Squared distance, limited to the window; at a corner two taps can land
    // outside it.
    let d2 = (v[0] * v[0] + v[1] * v[1]).min(clp);
    // Polynomial approximation of lanczos2 without sin(), rcp() or sqrt():
    //  (25/16 * (2/5 * x^2 - 1)^2 - (25/16 - 1)) * (1/4 * x^2 - 1)^2
    //  |_______________________________________|   |_______________|
    //                   base                             window
    // The general form of the base is (a*(b*x^2-1)^2-(a-1)) with
    // a = 1/(2*b-b^2), and b moving around the negative lobe.
    let mut wb = (2.0 / 5.0) * d2 - 1.0;
    let mut wa = lob * d2 - 1.0;
    wb *= wb;
    wa *= wa;
    wb = (25.0 / 16.0) * wb - (25.0 / 16.0 - 1.0);
    let w = wb * wa;
    ac[0] += c[0] * w;
    ac[1] += c[1] * w;
    ac[2] += c[2] * w;
    *aw += w;
}

/// Evaluate the upsampling filter for the output pixel at `op`.
///
/// The 12 taps form a '+'-shaped footprint around the 2x2 cell containing
/// the resolve position:
/// ```text
///    b c
///  e f g h
///  i j k l
///    n o
/// ```
/// The alpha channel is not filtered; it is bilinearly interpolated from the
/// center 2x2 cell.
pub fn easu_pixel<S: Source>(src: &S, op: [u16; 2], con: &EasuConstants) -> LinearPixel {
    // Resolve position in the source: integer cell plus fraction.
    let mut pp = [
        f32::from(op[0]) * con.scale[0] + con.offset[0],
        f32::from(op[1]) * con.scale[1] + con.offset[1],
    ];
    let fp = [pp[0].floor(), pp[1].floor()];
    pp[0] -= fp[0];
    pp[1] -= fp[1];
    let fx = fp[0] as i32;
    let fy = fp[1] as i32;

    let b = src.sample(fx, fy - 1);
    let c = src.sample(fx + 1, fy - 1);
    let e = src.sample(fx - 1, fy);
    let f = src.sample(fx, fy);
    let g = src.sample(fx + 1, fy);
    let h = src.sample(fx + 2, fy);
    let i = src.sample(fx - 1, fy + 1);
    let j = src.sample(fx, fy + 1);
    let k = src.sample(fx + 1, fy + 1);
    let l = src.sample(fx + 2, fy + 1);
    let n = src.sample(fx, fy + 2);
    let o = src.sample(fx + 1, fy + 2);

    let (lb, lc, le, lf) = (luma(b), luma(c), luma(e), luma(f));
    let (lg, lh, li, lj) = (luma(g), luma(h), luma(i), luma(j));
    let (lk, ll, ln, lo) = (luma(k), luma(l), luma(n), luma(o));

    // Gradient accumulation over the four quadrants of the center cell,
    // bilinearly weighted by the resolve position.
    let mut dir = [0.0_f32; 2];
    let mut len = 0.0_f32;
    accumulate_direction(
        &mut dir,
        &mut len,
        (1.0 - pp[0]) * (1.0 - pp[1]),
        [lb, le, lf, lg, lj],
    );
    accumulate_direction(&mut dir, &mut len, pp[0] * (1.0 - pp[1]), [lc, lf, lg, lh, lk]);
    accumulate_direction(&mut dir, &mut len, (1.0 - pp[0]) * pp[1], [lf, li, lj, lk, ln]);
    accumulate_direction(&mut dir, &mut len, pp[0] * pp[1], [lg, lj, lk, ll, lo]);

    // Normalize the direction, falling back to horizontal in flat regions.
    let dir2 = dir[0] * dir[0] + dir[1] * dir[1];
    let flat = dir2 < FLAT_DIR_THRESHOLD;
    let dir_r = if flat { 1.0 } else { rsqrt_coarse(dir2) };
    if flat {
        dir = [1.0, 0.0];
    }
    let dir = [dir[0] * dir_r, dir[1] * dir_r];

    // Edge strength from {0 to 2} into {0 to 1}, shaped with a square.
    let len = len * 0.5;
    let len = len * len;
    // Stretch the kernel: 1.0 on an axis-aligned edge, sqrt(2) on a diagonal.
    let stretch =
        (dir[0] * dir[0] + dir[1] * dir[1]) * rcp_coarse(dir[0].abs().max(dir[1].abs()));
    // Anisotropic axis scales after rotation: the major axis blends towards
    // `stretch` on edges, the minor axis towards half.
    let len2 = [1.0 + (stretch - 1.0) * len, 1.0 - 0.5 * len];
    // The negative lobe moves the window from +/-sqrt(2) to slightly beyond
    // 2 as the edge strength grows.
    let lob = 0.5 + ((1.0 / 4.0 - 0.04) - 0.5) * len;
    let clp = rcp_coarse(lob);

    // Min/max of the four nearest taps, for deringing below.
    let min4 = min3_v(rgb(f), rgb(g), rgb(j));
    let min4 = [min4[0].min(k[0]), min4[1].min(k[1]), min4[2].min(k[2])];
    let max4 = max3_v(rgb(f), rgb(g), rgb(j));
    let max4 = [max4[0].max(k[0]), max4[1].max(k[1]), max4[2].max(k[2])];

    let mut ac = [0.0_f32; 3];
    let mut aw = 0.0_f32;
    let taps: [([f32; 2], LinearPixel); 12] = [
        ([0.0, -1.0], b),
        ([1.0, -1.0], c),
        ([-1.0, 1.0], i),
        ([0.0, 1.0], j),
        ([0.0, 0.0], f),
        ([-1.0, 0.0], e),
        ([1.0, 1.0], k),
        ([2.0, 1.0], l),
        ([2.0, 0.0], h),
        ([1.0, 0.0], g),
        ([1.0, 2.0], o),
        ([0.0, 2.0], n),
    ];
    for (off, color) in taps {
        lanczos_tap(
            &mut ac,
            &mut aw,
            [off[0] - pp[0], off[1] - pp[1]],
            dir,
            len2,
            lob,
            clp,
            color,
        );
    }

    // Normalize and dering. The weight reciprocal must be exact; the taps
    // carry negative lobes and the sum can get small.
    let rcp_w = 1.0 / aw;
    let alpha = lerp(lerp(f[3], g[3], pp[0]), lerp(j[3], k[3], pp[0]), pp[1]);
    [
        (ac[0] * rcp_w).max(min4[0]).min(max4[0]),
        (ac[1] * rcp_w).max(min4[1]).min(max4[1]),
        (ac[2] * rcp_w).max(min4[2]).min(max4[2]),
        alpha,
    ]
}

#[inline]
fn rgb(c: LinearPixel) -> [f32; 3] {
    [c[0], c[1], c[2]]
}
