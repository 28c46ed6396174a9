use kurbo::{Affine, BezPath};

use crate::foundation::core::Color;
use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::foundation::math::channel;
use crate::glyph::builtin::{self, ADVANCE_UNITS, HEIGHT_UNITS, UNITS_PER_EM};
use crate::glyph::cpu::GlyphRaster;
use crate::glyph::font::{FaceKind, FontFace};
use crate::glyph::layout::{GlyphBrush, TextLayoutEngine};
use crate::raster::canvas::Canvas;
use crate::sequence::sequencer::Sequencer;

/// Per-build text settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    /// Largest rotation of a single character, in degrees.
    pub max_angle: i64,
    /// Largest vertical shift of a single character, in pixels.
    pub max_offset: i64,
    /// Fixed text color; drawn at random when unset.
    pub text_color: Option<Color>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            max_angle: 12,
            max_offset: 5,
            text_color: None,
        }
    }
}

struct PreparedGlyph {
    width: f64,
    height: f64,
    shape: GlyphShape,
}

enum GlyphShape {
    Path(BezPath),
    Run {
        font: vello_cpu::peniko::FontData,
        size: f32,
        glyphs: Vec<vello_cpu::Glyph>,
        color: Color,
    },
}

/// Draw `phrase` centred on `canvas` and return the text color.
///
/// Draw order: size shrink, text color (three channels unless fixed), then an angle and a
/// vertical offset for each character. Each character is rotated about the centre of its own box
/// and the pen advances by the measured box width.
#[tracing::instrument(skip_all, fields(face = face.name(), chars = phrase.chars().count()))]
pub fn write_phrase(
    canvas: &mut Canvas,
    phrase: &str,
    face: &FontFace,
    seq: &mut Sequencer,
    style: &TextStyle,
) -> CaptchaResult<Color> {
    let chars: Vec<char> = phrase.chars().collect();
    if chars.is_empty() {
        return Err(CaptchaError::EmptyPhrase);
    }
    let mut raster = GlyphRaster::new(canvas.width(), canvas.height())?;

    let width = f64::from(canvas.width());
    let height = f64::from(canvas.height());
    let shrink = seq.next_within(0, 3)?;
    let size = ((width / chars.len() as f64).round() as i64 - shrink - 1).max(1);

    let color = match style.text_color {
        Some(c) => c,
        None => Color::rgb(
            channel(seq.next(0, 150)?),
            channel(seq.next(0, 150)?),
            channel(seq.next(0, 150)?),
        ),
    };

    let glyphs = prepare(&chars, face, size as f64, color)?;
    let total: f64 = glyphs.iter().map(|g| g.width).sum();
    let tallest = glyphs.iter().map(|g| g.height).fold(0.0, f64::max);

    let mut x = (width - total) / 2.0;
    let top = (height - tallest) / 2.0;
    for glyph in &glyphs {
        let angle = seq.next_within(-style.max_angle, style.max_angle)?;
        let offset = seq.next_within(-style.max_offset, style.max_offset)?;

        let (hw, hh) = (glyph.width / 2.0, glyph.height / 2.0);
        let transform = Affine::translate((x + hw, top + offset as f64 + hh))
            * Affine::rotate(-(angle as f64).to_radians())
            * Affine::translate((-hw, -hh));
        match &glyph.shape {
            GlyphShape::Path(path) => raster.fill_path(path, transform, color),
            GlyphShape::Run {
                font,
                size,
                glyphs,
                color,
            } => raster.fill_glyphs(font, *size, glyphs, transform, *color),
        }
        x += glyph.width;
    }

    raster.composite_onto(canvas)?;
    tracing::debug!(size, %color, "phrase written");
    Ok(color)
}

fn prepare(
    chars: &[char],
    face: &FontFace,
    size: f64,
    color: Color,
) -> CaptchaResult<Vec<PreparedGlyph>> {
    match face.kind() {
        FaceKind::Builtin(style) => {
            let unit = size / UNITS_PER_EM;
            chars
                .iter()
                .map(|&ch| {
                    Ok(PreparedGlyph {
                        width: ADVANCE_UNITS * unit,
                        height: HEIGHT_UNITS * unit,
                        shape: GlyphShape::Path(builtin::outline(ch, *style, unit)?),
                    })
                })
                .collect()
        }
        FaceKind::Outline(font) => {
            let mut engine = TextLayoutEngine::new();
            let family = engine.register(&font.bytes)?;
            let mut out = Vec::with_capacity(chars.len());
            for &ch in chars {
                let mut buf = [0u8; 4];
                let layout = engine.layout_plain(
                    ch.encode_utf8(&mut buf),
                    &family,
                    size as f32,
                    GlyphBrush::from(color),
                )?;

                let mut glyphs = Vec::new();
                let mut ink = color;
                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let brush = run.style().brush;
                        ink = Color::rgba(brush.r, brush.g, brush.b, brush.a);
                        glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        }));
                    }
                }
                out.push(PreparedGlyph {
                    width: f64::from(layout.width()),
                    height: f64::from(layout.height()),
                    shape: GlyphShape::Run {
                        font: font.data.clone(),
                        size: size as f32,
                        glyphs,
                        color: ink,
                    },
                });
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/writer.rs"]
mod tests;
