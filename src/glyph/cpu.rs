use kurbo::{Affine, BezPath, PathEl, Point};

use crate::foundation::core::Color;
use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::raster::canvas::Canvas;
use crate::raster::composite::over_canvas;

/// Anti-aliased glyph layer rasterised with vello_cpu, composited onto a [`Canvas`] at the end.
pub(crate) struct GlyphRaster {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl GlyphRaster {
    pub(crate) fn new(width: u32, height: u32) -> CaptchaResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| CaptchaError::validation("canvas width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| CaptchaError::validation("canvas height exceeds u16"))?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
        })
    }

    pub(crate) fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(paint(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    pub(crate) fn fill_glyphs(
        &mut self,
        font: &vello_cpu::peniko::FontData,
        font_size: f32,
        glyphs: &[vello_cpu::Glyph],
        transform: Affine,
        color: Color,
    ) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(paint(color));
        self.ctx
            .glyph_run(font)
            .font_size(font_size)
            .fill_glyphs(glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            }));
    }

    /// Rasterise everything drawn so far and blend it over `canvas`.
    pub(crate) fn composite_onto(mut self, canvas: &mut Canvas) -> CaptchaResult<()> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        over_canvas(canvas, pixmap.data_as_u8_slice())
    }
}

fn paint(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r(), c.g(), c.b(), c.alpha())
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
