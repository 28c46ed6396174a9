use crate::foundation::core::Color;
use crate::foundation::math::channel_f64;

/// Bilinear blend of four neighbouring colors at fractional offset `(x, y)` from `nw`.
///
/// Each channel, transparency included, is blended independently as
/// `(1-y)·((1-x)·nw + x·ne) + y·((1-x)·sw + x·se)` and truncated.
pub fn bilinear_interpolate(x: f64, y: f64, nw: Color, ne: Color, sw: Color, se: Color) -> Color {
    // Lerp form keeps equal corners exact under floating point.
    let lerp = |a: u8, b: u8, t: f64| f64::from(a) + t * (f64::from(b) - f64::from(a));
    let blend = |pick: fn(Color) -> u8| -> u8 {
        let top = lerp(pick(nw), pick(ne), x);
        let bottom = lerp(pick(sw), pick(se), x);
        channel_f64(top + y * (bottom - top))
    };
    Color::from_channels(
        blend(Color::transparency),
        blend(Color::r),
        blend(Color::g),
        blend(Color::b),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/distort/interpolate.rs"]
mod tests;
