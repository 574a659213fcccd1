// Copyright 2025 the Amplio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image-level passes over the per-pixel filter kernels.

use crate::easu::{EasuConstants, easu_pixel};
use crate::rcas::{RcasSharpen, rcas_pixel};
use crate::{Image, LinearPixel, ScaleError};

/// Settings for a [`Scaler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalerSettings {
    /// Number of worker threads for the image-level passes.
    ///
    /// `0` (the default) and `1` both run on the calling thread. Values
    /// above `1` only take effect with the `multithreading` feature enabled.
    pub num_threads: u16,
}

/// Runs the filter kernels over whole images.
///
/// Every output pixel is independent of every other one and the source is
/// only ever read, so the passes are embarrassingly parallel; with the
/// `multithreading` feature the scaler owns a thread pool and dispatches
/// rows across it.
#[derive(Debug)]
pub struct Scaler {
    settings: ScalerSettings,
    #[cfg(feature = "multithreading")]
    thread_pool: Option<rayon::ThreadPool>,
}

impl Scaler {
    /// Create a scaler with the default (single-threaded) settings.
    pub fn new() -> Self {
        Self::with_settings(ScalerSettings::default())
    }

    /// Create a scaler with the given settings.
    pub fn with_settings(settings: ScalerSettings) -> Self {
        #[cfg(feature = "multithreading")]
        let thread_pool = (settings.num_threads > 1).then(|| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(usize::from(settings.num_threads))
                .build()
                .unwrap()
        });
        Self {
            settings,
            #[cfg(feature = "multithreading")]
            thread_pool,
        }
    }

    /// The settings this scaler was created with.
    pub fn settings(&self) -> ScalerSettings {
        self.settings
    }

    /// Upscale `src` into `dst` with the edge-adaptive resampling filter.
    ///
    /// The filter is designed for up to a 2x scale per axis; larger factors
    /// work but quality degrades, and a warning is logged.
    pub fn upscale(
        &self,
        src: &Image<LinearPixel>,
        dst: &mut Image<LinearPixel>,
    ) -> Result<(), ScaleError> {
        if src.is_empty() || dst.is_empty() {
            return Err(ScaleError::EmptyImage);
        }
        if dst.width() < src.width() || dst.height() < src.height() {
            return Err(ScaleError::Downscale {
                src_width: src.width(),
                src_height: src.height(),
                dst_width: dst.width(),
                dst_height: dst.height(),
            });
        }
        if u32::from(dst.width()) > u32::from(src.width()) * 2
            || u32::from(dst.height()) > u32::from(src.height()) * 2
        {
            log::warn!(
                "upscaling {}x{} to {}x{} exceeds the 2x per-axis design range",
                src.width(),
                src.height(),
                dst.width(),
                dst.height()
            );
        }
        let con = EasuConstants::new((src.width(), src.height()), (dst.width(), dst.height()));
        self.dispatch_rows(dst, |y, row| {
            for (x, px) in row.iter_mut().enumerate() {
                *px = easu_pixel(src, [x as u16, y], &con);
            }
        });
        Ok(())
    }

    /// Sharpen `src` into `dst`. The images must have the same dimensions.
    pub fn sharpen(
        &self,
        src: &Image<LinearPixel>,
        dst: &mut Image<LinearPixel>,
        params: &RcasSharpen,
    ) -> Result<(), ScaleError> {
        if src.is_empty() || dst.is_empty() {
            return Err(ScaleError::EmptyImage);
        }
        if src.width() != dst.width() || src.height() != dst.height() {
            return Err(ScaleError::MismatchedDimensions {
                src_width: src.width(),
                src_height: src.height(),
                dst_width: dst.width(),
                dst_height: dst.height(),
            });
        }
        self.dispatch_rows(dst, |y, row| {
            for (x, px) in row.iter_mut().enumerate() {
                *px = rcas_pixel(src, [x as u16, y], params);
            }
        });
        Ok(())
    }

    /// Upscale `src` into `dst` and sharpen the result.
    ///
    /// `scratch` holds the unsharpened intermediate; it is resized as needed
    /// and can be reused across calls to avoid reallocation.
    pub fn upscale_sharpened(
        &self,
        src: &Image<LinearPixel>,
        dst: &mut Image<LinearPixel>,
        scratch: &mut Image<LinearPixel>,
        params: &RcasSharpen,
    ) -> Result<(), ScaleError> {
        scratch.resize(dst.width(), dst.height(), [0.0; 4]);
        self.upscale(src, scratch)?;
        self.sharpen(scratch, dst, params)
    }

    /// Run `f` once per destination row, in parallel when a thread pool is
    /// available. Rows never overlap, so there is nothing to synchronize.
    fn dispatch_rows<F>(&self, dst: &mut Image<LinearPixel>, f: F)
    where
        F: Fn(u16, &mut [LinearPixel]) + Sync,
    {
        let width = usize::from(dst.width());
        #[cfg(feature = "multithreading")]
        if let Some(pool) = &self.thread_pool {
            use rayon::prelude::*;
            pool.install(|| {
                dst.pixels_mut()
                    .par_chunks_mut(width)
                    .enumerate()
                    .for_each(|(y, row)| f(y as u16, row));
            });
            return;
        }
        for (y, row) in dst.pixels_mut().chunks_mut(width).enumerate() {
            f(y as u16, row);
        }
    }
}

impl Default for Scaler {
    fn default() -> Self {
        Self::new()
    }
}
