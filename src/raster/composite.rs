use crate::foundation::core::Color;
use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::foundation::math::mul_div255_u8;
use crate::raster::canvas::Canvas;

pub(crate) type PremulRgba8 = [u8; 4];

/// Premultiplied source-over.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

pub(crate) fn premultiply(c: Color) -> PremulRgba8 {
    let a = u16::from(c.alpha());
    [
        mul_div255_u8(u16::from(c.r()), a),
        mul_div255_u8(u16::from(c.g()), a),
        mul_div255_u8(u16::from(c.b()), a),
        c.alpha(),
    ]
}

pub(crate) fn unpremultiply(px: PremulRgba8) -> Color {
    let a = px[3];
    if a == 0 {
        return Color::rgba(0, 0, 0, 0);
    }
    if a == 255 {
        return Color::rgb(px[0], px[1], px[2]);
    }
    let un = |c: u8| -> u8 {
        let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
        v.min(255) as u8
    };
    Color::rgba(un(px[0]), un(px[1]), un(px[2]), a)
}

/// Composite a premultiplied RGBA8 layer of the same size over `canvas`.
pub(crate) fn over_canvas(canvas: &mut Canvas, layer: &[u8]) -> CaptchaResult<()> {
    let expected = canvas.pixels().len() * 4;
    if layer.len() != expected {
        return Err(CaptchaError::validation(format!(
            "layer has {} bytes, canvas needs {expected}",
            layer.len()
        )));
    }
    for (dst, src) in canvas.pixels_mut().iter_mut().zip(layer.chunks_exact(4)) {
        if src[3] == 0 {
            continue;
        }
        let out = over(premultiply(*dst), [src[0], src[1], src[2], src[3]]);
        *dst = unpremultiply(out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/composite.rs"]
mod tests;
