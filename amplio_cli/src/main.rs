// Copyright 2025 the Amplio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line frontend for the Amplio CPU upscaler.
//!
//! Decodes a PNG, upscales it with the edge-adaptive filter, sharpens the
//! result, and writes it back out. Input is assumed to be sRGB encoded; all
//! filtering happens in linear light.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use amplio_common::image::{Image, LinearPixel};
use amplio_common::transfer::{linear_to_srgb, srgb_to_linear};
use amplio_cpu::rcas::RcasSharpen;
use amplio_cpu::{Scaler, ScalerSettings, dither, grain};

#[derive(Parser, Debug)]
#[command(about, version)]
struct Args {
    /// The input PNG to upscale.
    input: PathBuf,
    /// Where to write the result.
    output: PathBuf,
    /// Uniform scale factor, used when no explicit size is given.
    #[arg(long, default_value_t = 2.0)]
    scale: f32,
    /// Output width in pixels (overrides --scale; requires --height).
    #[arg(long, requires = "height")]
    width: Option<u16>,
    /// Output height in pixels (overrides --scale; requires --width).
    #[arg(long, requires = "width")]
    height: Option<u16>,
    /// Sharpening strength in stops; 0 is maximum, each stop halves it.
    #[arg(long, default_value_t = 0.2)]
    sharpness: f32,
    /// Skip the sharpening pass entirely.
    #[arg(long)]
    no_sharpen: bool,
    /// Damp sharpening on noisy pixels.
    #[arg(long)]
    denoise: bool,
    /// Apply film grain with the given amount in [0, 1].
    #[arg(long)]
    grain: Option<f32>,
    /// Quantize the output with gamma-2.0 dithering instead of plain
    /// sRGB rounding.
    #[arg(long)]
    dither: bool,
    /// Worker threads for the filter passes; 0 runs on the calling thread.
    #[arg(long, default_value_t = 0)]
    threads: u16,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let decoded = image::open(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?
        .to_rgba8();
    let (in_width, in_height) = decoded.dimensions();
    let in_width: u16 = in_width.try_into().context("input too wide")?;
    let in_height: u16 = in_height.try_into().context("input too tall")?;

    let (out_width, out_height) = match (args.width, args.height) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            if !(args.scale.is_finite() && args.scale >= 1.0) {
                bail!("--scale must be a finite factor >= 1.0");
            }
            let w = (f32::from(in_width) * args.scale).round() as u32;
            let h = (f32::from(in_height) * args.scale).round() as u32;
            (
                w.try_into().context("output too wide")?,
                h.try_into().context("output too tall")?,
            )
        }
    };
    info!("upscaling {in_width}x{in_height} to {out_width}x{out_height}");

    let src = decode_to_linear(decoded.into_raw(), in_width, in_height);
    let mut dst = Image::new(out_width, out_height, [0.0_f32; 4]);

    let scaler = Scaler::with_settings(ScalerSettings {
        num_threads: args.threads,
    });
    if args.no_sharpen {
        scaler.upscale(&src, &mut dst)?;
    } else {
        let params = RcasSharpen::new(args.sharpness).with_denoise(args.denoise);
        let mut scratch = Image::new(0, 0, [0.0_f32; 4]);
        scaler.upscale_sharpened(&src, &mut dst, &mut scratch, &params)?;
    }

    if let Some(amount) = args.grain {
        if !(0.0..=1.0).contains(&amount) {
            bail!("--grain must be in [0, 1]");
        }
        info!("applying film grain at {amount}");
        apply_grain(&mut dst, amount);
    }

    let bytes = encode_from_linear(&dst, args.dither);
    let out = image::RgbaImage::from_raw(u32::from(out_width), u32::from(out_height), bytes)
        .expect("buffer length matches dimensions");
    out.save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("wrote {}", args.output.display());
    Ok(())
}

/// Convert sRGB-encoded RGBA8 bytes to a linear-light image.
fn decode_to_linear(bytes: Vec<u8>, width: u16, height: u16) -> Image<LinearPixel> {
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            [
                srgb_to_linear(f32::from(px[0]) / 255.0),
                srgb_to_linear(f32::from(px[1]) / 255.0),
                srgb_to_linear(f32::from(px[2]) / 255.0),
                f32::from(px[3]) / 255.0,
            ]
        })
        .collect();
    Image::from_parts(pixels, width, height)
}

/// Encode a linear-light image to RGBA8 bytes, either with plain sRGB
/// rounding or with gamma-2.0 dithered quantization.
fn encode_from_linear(img: &Image<LinearPixel>, dithered: bool) -> Vec<u8> {
    let width = u32::from(img.width());
    let mut bytes = Vec::with_capacity(img.pixels().len() * 4);
    for (i, px) in img.pixels().iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        let rgb = if dithered {
            let dit = dither::dither_value([x, y], 0);
            dither::quantize_gamma2_8bit([px[0], px[1], px[2]], dit)
        } else {
            [
                linear_to_srgb(px[0]),
                linear_to_srgb(px[1]),
                linear_to_srgb(px[2]),
            ]
        };
        for c in rgb {
            bytes.push((c.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
        bytes.push((px[3].clamp(0.0, 1.0) * 255.0).round() as u8);
    }
    bytes
}

/// Apply monochrome film grain from the screen-position hash.
///
/// Tiled blue noise gives nicer grain; the hash keeps the CLI free of a
/// noise asset.
fn apply_grain(img: &mut Image<LinearPixel>, amount: f32) {
    let width = u32::from(img.width());
    for (i, px) in img.pixels_mut().iter_mut().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        let g = dither::dither_value([x, y], 0) - 0.5;
        let [r, gr, b] = grain::apply([px[0], px[1], px[2]], [g, g, g], amount);
        *px = [r, gr, b, px[3]];
    }
}
