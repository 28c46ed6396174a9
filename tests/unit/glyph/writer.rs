use super::*;
use crate::glyph::builtin::BuiltinStyle;

fn regular() -> FontFace {
    FontFace::builtin(BuiltinStyle::Regular)
}

#[test]
fn empty_phrase_is_rejected_before_any_draw() {
    let mut canvas = Canvas::filled(150, 40, Color::WHITE).unwrap();
    let mut seq = Sequencer::seeded(1);
    let err = write_phrase(&mut canvas, "", &regular(), &mut seq, &TextStyle::default());
    assert!(matches!(err, Err(CaptchaError::EmptyPhrase)));
    assert_eq!(seq.draws(), 0);
}

#[test]
fn draw_count_is_shrink_color_then_two_per_character() {
    let mut canvas = Canvas::filled(150, 40, Color::WHITE).unwrap();
    let mut seq = Sequencer::seeded(2);
    write_phrase(&mut canvas, "ab3", &regular(), &mut seq, &TextStyle::default()).unwrap();
    assert_eq!(seq.draws(), 1 + 3 + 2 * 3);

    let fixed = TextStyle {
        text_color: Some(Color::rgb(10, 20, 30)),
        ..TextStyle::default()
    };
    let mut seq = Sequencer::seeded(2);
    let color = write_phrase(&mut canvas, "ab3", &regular(), &mut seq, &fixed).unwrap();
    assert_eq!(color, Color::rgb(10, 20, 30));
    assert_eq!(seq.draws(), 1 + 2 * 3);
}

#[test]
fn random_text_color_stays_dark() {
    for seed in 0..16 {
        let mut canvas = Canvas::filled(100, 30, Color::WHITE).unwrap();
        let mut seq = Sequencer::seeded(seed);
        let c = write_phrase(&mut canvas, "xy", &regular(), &mut seq, &TextStyle::default())
            .unwrap();
        assert!(c.r() <= 150 && c.g() <= 150 && c.b() <= 150, "{c}");
        assert_eq!(c.alpha(), 255);
    }
}

#[test]
fn glyphs_darken_the_background() {
    let mut canvas = Canvas::filled(150, 40, Color::WHITE).unwrap();
    let mut seq = Sequencer::seeded(3);
    write_phrase(&mut canvas, "ab3", &regular(), &mut seq, &TextStyle::default()).unwrap();
    let inked = canvas.pixels().iter().filter(|&&p| p != Color::WHITE).count();
    assert!(inked > 100, "only {inked} pixels inked");
    // Nothing lands in the outer columns: the phrase is centred.
    for y in 0..40 {
        assert_eq!(canvas.pixel(0, y), Some(Color::WHITE));
        assert_eq!(canvas.pixel(149, y), Some(Color::WHITE));
    }
}

#[test]
fn replay_reproduces_identical_pixels() {
    let mut first = Canvas::filled(150, 40, Color::WHITE).unwrap();
    let mut seq = Sequencer::seeded(4);
    write_phrase(&mut first, "q7Z", &regular(), &mut seq, &TextStyle::default()).unwrap();

    let mut second = Canvas::filled(150, 40, Color::WHITE).unwrap();
    let mut replay = Sequencer::replaying(seq.into_fingerprint());
    write_phrase(&mut second, "q7Z", &regular(), &mut replay, &TextStyle::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(replay.remaining(), 0);
}

#[test]
fn oversized_canvas_is_a_validation_error() {
    let mut canvas = Canvas::new(70_000, 1).unwrap();
    let mut seq = Sequencer::seeded(5);
    let err = write_phrase(&mut canvas, "a", &regular(), &mut seq, &TextStyle::default());
    assert!(matches!(err, Err(CaptchaError::Validation(_))));
}
