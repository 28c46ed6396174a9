use crate::foundation::core::Color;
use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::foundation::math::{channel, channel_f64};
use crate::raster::canvas::Canvas;
use crate::sequence::sequencer::Sequencer;

const EDGE_KERNEL: [[i64; 3]; 3] = [[-1, 0, -1], [0, 4, 0], [-1, 0, -1]];
const EDGE_OFFSET: i64 = 127;

/// Whole-image tonal adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneFilter {
    /// Invert every color channel.
    Negate,
    /// 3x3 Laplacian-style edge detection biased to mid grey.
    EdgeDetect,
    /// Contrast change; negative values increase contrast.
    Contrast(i32),
    /// Add a fixed offset to each channel.
    Colorize {
        /// Red offset.
        r: i32,
        /// Green offset.
        g: i32,
        /// Blue offset.
        b: i32,
    },
}

/// Fails with [`CaptchaError::UnsupportedFilterBackend`] when post filters are compiled out.
pub fn ensure_filter_backend() -> CaptchaResult<()> {
    if cfg!(feature = "post-filters") {
        Ok(())
    } else {
        Err(CaptchaError::UnsupportedFilterBackend)
    }
}

/// Draw the filter chain for one build.
///
/// Draw order: negate gate, edge gate, contrast strength, colorize gate, then three colorize
/// offsets when that gate fires.
pub fn plan_filters(seq: &mut Sequencer) -> CaptchaResult<Vec<ToneFilter>> {
    let mut filters = Vec::with_capacity(4);
    if seq.coin()? {
        filters.push(ToneFilter::Negate);
    }
    if seq.next(0, 10)? == 0 {
        filters.push(ToneFilter::EdgeDetect);
    }
    filters.push(ToneFilter::Contrast(seq.next_within(-50, 10)? as i32));
    if seq.next(0, 5)? == 0 {
        filters.push(ToneFilter::Colorize {
            r: seq.next_within(-80, 50)? as i32,
            g: seq.next_within(-80, 50)? as i32,
            b: seq.next_within(-80, 50)? as i32,
        });
    }
    Ok(filters)
}

/// Apply `filters` in order.
#[tracing::instrument(level = "debug", skip(canvas))]
pub fn apply_filters(canvas: &mut Canvas, filters: &[ToneFilter]) -> CaptchaResult<()> {
    ensure_filter_backend()?;
    for filter in filters {
        filter.apply(canvas);
    }
    Ok(())
}

impl ToneFilter {
    /// Apply this filter in place. Transparency is preserved.
    pub fn apply(&self, canvas: &mut Canvas) {
        match *self {
            Self::Negate => map_channels(canvas, |c| 255 - c),
            Self::EdgeDetect => edge_detect(canvas),
            Self::Contrast(strength) => {
                let f = (100.0 - f64::from(strength)) / 100.0;
                let f = f * f;
                map_channels(canvas, |c| {
                    channel_f64(((f64::from(c) / 255.0 - 0.5) * f + 0.5) * 255.0)
                });
            }
            Self::Colorize { r, g, b } => {
                for px in canvas.pixels_mut() {
                    *px = Color::from_channels(
                        px.transparency(),
                        channel(i64::from(px.r()) + i64::from(r)),
                        channel(i64::from(px.g()) + i64::from(g)),
                        channel(i64::from(px.b()) + i64::from(b)),
                    );
                }
            }
        }
    }
}

fn map_channels(canvas: &mut Canvas, f: impl Fn(u8) -> u8) {
    for px in canvas.pixels_mut() {
        *px = Color::from_channels(px.transparency(), f(px.r()), f(px.g()), f(px.b()));
    }
}

fn edge_detect(canvas: &mut Canvas) {
    let src = canvas.clone();
    let w = i64::from(src.width());
    let h = i64::from(src.height());
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0i64; 3];
            for (ky, row) in EDGE_KERNEL.iter().enumerate() {
                for (kx, &kw) in row.iter().enumerate() {
                    if kw == 0 {
                        continue;
                    }
                    let sx = (x + kx as i64 - 1).clamp(0, w - 1);
                    let sy = (y + ky as i64 - 1).clamp(0, h - 1);
                    let p = src.get_pixel(sx, sy, Color::BLACK);
                    acc[0] += kw * i64::from(p.r());
                    acc[1] += kw * i64::from(p.g());
                    acc[2] += kw * i64::from(p.b());
                }
            }
            let center = src.get_pixel(x, y, Color::BLACK);
            canvas.set_pixel(
                x,
                y,
                Color::from_channels(
                    center.transparency(),
                    channel(acc[0] + EDGE_OFFSET),
                    channel(acc[1] + EDGE_OFFSET),
                    channel(acc[2] + EDGE_OFFSET),
                ),
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/post.rs"]
mod tests;
