use rayon::prelude::*;

use crate::distort::interpolate::bilinear_interpolate;
use crate::foundation::core::Color;
use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::raster::canvas::Canvas;
use crate::sequence::sequencer::Sequencer;

/// Global warp parameters, drawn once per build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistortionParams {
    /// Ripple centre, x.
    pub center_x: i64,
    /// Ripple centre, y.
    pub center_y: i64,
    /// Phase of the vertical wave.
    pub phase: i64,
    /// Amplitude of the vertical wave, in `[1.1, 1.1 + 1/3]`.
    pub scale: f64,
}

impl DistortionParams {
    /// Draw order: centre x, centre y, phase, scale.
    pub fn draw(seq: &mut Sequencer, width: u32, height: u32) -> CaptchaResult<Self> {
        let center_x = seq.next_within(0, i64::from(width))?;
        let center_y = seq.next_within(0, i64::from(height))?;
        let phase = seq.next_within(0, 10)?;
        let scale = 1.1 + seq.next_within(0, 10_000)? as f64 / 30_000.0;
        Ok(Self {
            center_x,
            center_y,
            phase,
            scale,
        })
    }

    /// Backward-map destination pixel `(x, y)` to a fractional source coordinate.
    pub fn source_point(&self, x: f64, y: f64, ripple_divisor: f64) -> (f64, f64) {
        let cx = self.center_x as f64;
        let cy = self.center_y as f64;
        let vx = x - cx;
        let vy = y - cy;
        let vn = vx.hypot(vy);

        let (nx, ny) = if vn != 0.0 {
            let vn2 = vn + 4.0 * (vn / ripple_divisor).sin();
            (cx + vx * vn2 / vn, cy + vy * vn2 / vn)
        } else {
            (cx, cy)
        };
        (nx, ny + self.scale * (self.phase as f64 + nx * 0.2).sin())
    }
}

/// Sampling and scheduling knobs for [`distort`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistortOpts {
    /// Divisor of the radial ripple; smaller is harsher.
    pub ripple_divisor: f64,
    /// Bilinear sampling when `true`, nearest pixel otherwise.
    pub interpolation: bool,
    /// Compute rows on the rayon pool.
    pub parallel: bool,
    /// Dedicated pool size; the global pool is used when unset.
    pub threads: Option<usize>,
}

impl Default for DistortOpts {
    fn default() -> Self {
        Self {
            ripple_divisor: 30.0,
            interpolation: true,
            parallel: true,
            threads: None,
        }
    }
}

/// Warp `canvas` with freshly drawn parameters and return the new canvas.
#[tracing::instrument(skip(canvas, seq, opts), fields(w = canvas.width(), h = canvas.height()))]
pub fn distort(
    canvas: &Canvas,
    seq: &mut Sequencer,
    background: Color,
    opts: &DistortOpts,
) -> CaptchaResult<Canvas> {
    let params = DistortionParams::draw(seq, canvas.width(), canvas.height())?;
    tracing::debug!(?params, "distortion parameters");
    warp(canvas, &params, background, opts)
}

/// Apply the warp described by `params`. Makes no sequencer draws.
pub fn warp(
    src: &Canvas,
    params: &DistortionParams,
    background: Color,
    opts: &DistortOpts,
) -> CaptchaResult<Canvas> {
    if !opts.ripple_divisor.is_finite() || opts.ripple_divisor <= 0.0 {
        return Err(CaptchaError::validation(
            "ripple divisor must be finite and > 0",
        ));
    }

    let mut dst = Canvas::new(src.width(), src.height())?;
    let width = src.width() as usize;
    let fill_row = |(y, row): (usize, &mut [Color])| {
        for (x, px) in row.iter_mut().enumerate() {
            *px = sample(src, params, x as f64, y as f64, background, opts);
        }
    };

    if !opts.parallel {
        dst.pixels_mut().chunks_mut(width).enumerate().for_each(fill_row);
    } else if let Some(threads) = opts.threads {
        let pool = build_thread_pool(threads)?;
        pool.install(|| {
            dst.pixels_mut()
                .par_chunks_mut(width)
                .enumerate()
                .for_each(fill_row)
        });
    } else {
        dst.pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(fill_row);
    }
    Ok(dst)
}

fn sample(
    src: &Canvas,
    params: &DistortionParams,
    x: f64,
    y: f64,
    background: Color,
    opts: &DistortOpts,
) -> Color {
    let (nx, ny) = params.source_point(x, y, opts.ripple_divisor);
    let p = if opts.interpolation {
        let (x0, y0) = (nx.floor(), ny.floor());
        let (x1, y1) = (nx.ceil() as i64, ny.ceil() as i64);
        bilinear_interpolate(
            nx - x0,
            ny - y0,
            src.get_pixel(x0 as i64, y0 as i64, background),
            src.get_pixel(x1, y0 as i64, background),
            src.get_pixel(x0 as i64, y1, background),
            src.get_pixel(x1, y1, background),
        )
    } else {
        src.get_pixel(nx.round() as i64, ny.round() as i64, background)
    };
    // Packed zero doubles as the unset sentinel.
    if p.packed() == 0 { Color::WHITE } else { p }
}

fn build_thread_pool(threads: usize) -> CaptchaResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(CaptchaError::validation(
            "distortion 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| CaptchaError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/distort/field.rs"]
mod tests;
