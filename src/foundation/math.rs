pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Clamp a sequencer draw into a color channel.
///
/// Replayed fingerprints are not range-checked, so call sites that need a byte clamp instead of
/// failing.
pub(crate) fn channel(v: i64) -> u8 {
    v.clamp(0, 255) as u8
}

/// Clamp a floating-point channel value into a byte, truncating the fraction.
pub(crate) fn channel_f64(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}
