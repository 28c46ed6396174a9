use super::*;

#[test]
fn opaque_colors_pack_to_plain_rgb() {
    assert_eq!(Color::rgb(0x12, 0x34, 0x56).packed(), 0x0012_3456);
    assert_eq!(Color::rgba(0x12, 0x34, 0x56, 255).packed(), 0x0012_3456);
    assert_eq!(Color::rgb(0, 0, 0), Color::BLACK);
    assert_eq!(Color::BLACK.packed(), 0);
}

#[test]
fn channel_extraction_uses_shift_and_mask() {
    let c = Color(0x7f_a1_b2_c3);
    assert_eq!(c.r(), 0xa1);
    assert_eq!(c.g(), 0xb2);
    assert_eq!(c.b(), 0xc3);
    assert_eq!(c.transparency(), 0x7f);
    assert_eq!(c.alpha(), 255 - 0x7f);
}

#[test]
fn rgba8_conversion_inverts_transparency() {
    let c = Color::rgba(10, 20, 30, 40);
    assert_eq!(c.to_rgba8(), [10, 20, 30, 40]);
    assert_eq!(Color::from_rgba8([10, 20, 30, 40]), c);
    assert_eq!(Color::WHITE.with_alpha(0).transparency(), 255);
}

#[test]
fn colors_serialize_as_plain_integers() {
    let json = serde_json::to_string(&Color::WHITE).unwrap();
    assert_eq!(json, "16777215");
    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Color::WHITE);
}
