use super::*;

#[test]
fn transparent_source_keeps_destination() {
    assert_eq!(over([10, 20, 30, 255], [0, 0, 0, 0]), [10, 20, 30, 255]);
}

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(over([10, 20, 30, 255], [1, 2, 3, 255]), [1, 2, 3, 255]);
}

#[test]
fn premultiply_round_trips_opaque_and_clear() {
    let c = Color::rgb(12, 200, 99);
    assert_eq!(unpremultiply(premultiply(c)), c);
    assert_eq!(unpremultiply([0, 0, 0, 0]).alpha(), 0);
}

#[test]
fn half_covered_glyph_pixel_blends_toward_text_color() {
    let mut canvas = Canvas::filled(2, 1, Color::WHITE).unwrap();
    // Black text at ~50% coverage over the first pixel only.
    let layer = [0, 0, 0, 128, 0, 0, 0, 0];
    over_canvas(&mut canvas, &layer).unwrap();
    let px = canvas.pixel(0, 0).unwrap();
    assert_eq!(px.alpha(), 255);
    assert!((120..=135).contains(&px.r()), "got {}", px.r());
    assert_eq!(canvas.pixel(1, 0), Some(Color::WHITE));
}

#[test]
fn layer_size_mismatch_is_rejected() {
    let mut canvas = Canvas::new(2, 2).unwrap();
    assert!(over_canvas(&mut canvas, &[0u8; 4]).is_err());
}
