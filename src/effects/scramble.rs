use crate::foundation::core::Color;
use crate::foundation::error::CaptchaResult;
use crate::foundation::math::channel;
use crate::raster::canvas::Canvas;
use crate::sequence::sequencer::Sequencer;

/// Which decorative noise operation to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// A thick straight line crossing the canvas.
    Line,
    /// A full ellipse outline.
    Arc,
    /// Scattered single pixels.
    PixelNoise,
}

impl EffectKind {
    /// Map a `rand(0, 2)` draw onto a kind; replayed values outside the range are clamped.
    pub fn from_draw(v: i64) -> Self {
        match v {
            i64::MIN..=0 => Self::Line,
            1 => Self::Arc,
            _ => Self::PixelNoise,
        }
    }
}

/// Passes run around the glyph layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Before the phrase is written.
    Behind,
    /// After the phrase is written.
    Front,
}

/// One fully parameterised noise operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrambleEffect {
    /// Straight line between two points.
    Line {
        /// Start point.
        from: (i64, i64),
        /// End point.
        to: (i64, i64),
        /// Brush size in pixels.
        thickness: u32,
        /// Line color.
        color: Color,
    },
    /// Full 360 degree circle outline.
    Arc {
        /// Centre point.
        center: (i64, i64),
        /// Radius in pixels.
        radius: i64,
        /// Outline color.
        color: Color,
    },
    /// Individual pixels with independent colors.
    PixelNoise {
        /// `(x, y, color)` per pixel.
        pixels: Vec<(i64, i64, Color)>,
    },
}

fn draw_color(seq: &mut Sequencer, lo: i64, hi: i64) -> CaptchaResult<Color> {
    Ok(Color::rgb(
        channel(seq.next(lo, hi)?),
        channel(seq.next(lo, hi)?),
        channel(seq.next(lo, hi)?),
    ))
}

impl ScrambleEffect {
    /// Draw the parameters of one `kind` effect for a `width` x `height` canvas.
    ///
    /// `tint` replaces the three color draws of lines and arcs.
    pub fn draw(
        kind: EffectKind,
        seq: &mut Sequencer,
        width: u32,
        height: u32,
        tint: Option<Color>,
    ) -> CaptchaResult<Self> {
        let (w, h) = (i64::from(width), i64::from(height));
        match kind {
            EffectKind::Line => {
                let color = match tint {
                    Some(c) => c,
                    None => draw_color(seq, 100, 255)?,
                };
                let (from, to) = if !seq.coin()? {
                    // Horizontal-ish: start in the left half, end in the right half.
                    let xa = seq.next_within(0, w / 2)?;
                    let ya = seq.next_within(0, h)?;
                    let xb = seq.next_within(w / 2, w)?;
                    let yb = seq.next_within(0, h)?;
                    ((xa, ya), (xb, yb))
                } else {
                    let xa = seq.next_within(0, w)?;
                    let ya = seq.next_within(0, h / 2)?;
                    let xb = seq.next_within(0, w)?;
                    let yb = seq.next_within(h / 2, h)?;
                    ((xa, ya), (xb, yb))
                };
                let thickness = seq.next_within(1, 3)? as u32;
                Ok(Self::Line {
                    from,
                    to,
                    thickness,
                    color,
                })
            }
            EffectKind::Arc => {
                let color = match tint {
                    Some(c) => c,
                    None => draw_color(seq, 100, 255)?,
                };
                let cx = seq.next_within(0, w)?;
                let cy = seq.next_within(0, h)?;
                let radius = seq.next_within(0, w.min(h))?;
                Ok(Self::Arc {
                    center: (cx, cy),
                    radius,
                    color,
                })
            }
            EffectKind::PixelNoise => {
                let area = w * h;
                let count = seq.next_within(area / 1000, area / 100)?;
                let mut pixels = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let color = draw_color(seq, 0, 255)?;
                    let x = seq.next_within(0, w - 1)?;
                    let y = seq.next_within(0, h - 1)?;
                    pixels.push((x, y, color));
                }
                Ok(Self::PixelNoise { pixels })
            }
        }
    }

    /// Kind tag of this effect.
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Line { .. } => EffectKind::Line,
            Self::Arc { .. } => EffectKind::Arc,
            Self::PixelNoise { .. } => EffectKind::PixelNoise,
        }
    }

    /// Paint the effect onto `canvas`.
    pub fn apply(&self, canvas: &mut Canvas) {
        match self {
            Self::Line {
                from,
                to,
                thickness,
                color,
            } => canvas.draw_line(from.0, from.1, to.0, to.1, *color, *thickness),
            Self::Arc {
                center,
                radius,
                color,
            } => canvas.draw_arc(center.0, center.1, *radius, *radius, 0, 360, *color),
            Self::PixelNoise { pixels } => {
                for &(x, y, color) in pixels {
                    canvas.set_pixel(x, y, color);
                }
            }
        }
    }
}

/// Number of effects for a pass.
///
/// `Some(0)` disables the pass without drawing anything; any other cap bounds the drawn count;
/// `None` keeps it as drawn.
pub fn pass_count(
    seq: &mut Sequencer,
    width: u32,
    height: u32,
    cap: Option<u32>,
) -> CaptchaResult<usize> {
    if cap == Some(0) {
        return Ok(0);
    }
    let area = i64::from(width) * i64::from(height);
    let drawn = seq.next_within(area / 3000, area / 2000)?;
    let count = match cap {
        Some(c) => drawn.min(i64::from(c)),
        None => drawn,
    };
    Ok(usize::try_from(count).unwrap_or(0))
}

/// Run one scramble pass over `canvas` and return how many effects were drawn.
#[tracing::instrument(level = "debug", skip(canvas, seq, tint))]
pub fn run_pass(
    canvas: &mut Canvas,
    seq: &mut Sequencer,
    pass: Pass,
    cap: Option<u32>,
    tint: Option<Color>,
) -> CaptchaResult<usize> {
    let (width, height) = (canvas.width(), canvas.height());
    let count = pass_count(seq, width, height, cap)?;
    for _ in 0..count {
        let kind = EffectKind::from_draw(seq.next(0, 2)?);
        ScrambleEffect::draw(kind, seq, width, height, tint)?.apply(canvas);
    }
    tracing::debug!(count, "scramble pass done");
    Ok(count)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/scramble.rs"]
mod tests;
