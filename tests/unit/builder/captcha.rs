use super::*;
use crate::encode::output::ImageType;

fn quiet_opts() -> CaptchaOpts {
    CaptchaOpts {
        max_behind_lines: Some(0),
        max_front_lines: Some(0),
        distortion: false,
        text_color: Some(Color::rgb(30, 30, 30)),
        parallel: false,
        ..CaptchaOpts::default()
    }
}

#[test]
fn first_build_generates_a_phrase() {
    let mut b = CaptchaBuilder::create();
    assert_eq!(b.state(), BuildState::Uninitialized);
    assert!(b.phrase().is_none());
    b.build_seeded(1).unwrap();
    assert_eq!(b.state(), BuildState::Built);
    assert_eq!(b.phrase().unwrap().chars().count(), 5);
    assert!(b.contents().is_some());
    assert!(!b.fingerprint().unwrap().is_empty());
}

#[test]
fn supplied_phrase_survives_builds() {
    let mut b = CaptchaBuilder::with_phrase(CaptchaOpts::default(), "ab3");
    assert_eq!(b.state(), BuildState::PhraseSet);
    b.build_seeded(2).unwrap();
    b.build_seeded(3).unwrap();
    assert_eq!(b.phrase(), Some("ab3"));
    let canvas = b.contents().unwrap();
    assert_eq!((canvas.width(), canvas.height()), (150, 40));
}

#[test]
fn replaying_the_fingerprint_rebuilds_the_same_pixels() {
    let mut first = CaptchaBuilder::with_phrase(CaptchaOpts::default(), "k9x2m");
    let original = first.build_seeded(4).unwrap().clone();
    let fp = first.fingerprint().unwrap().clone();

    let mut second = CaptchaBuilder::with_phrase(CaptchaOpts::default(), "k9x2m");
    let replayed = second.build_from_fingerprint(fp.clone()).unwrap();
    assert_eq!(&original, replayed);
    assert_eq!(second.fingerprint(), Some(&fp));
    assert_eq!(second.background(), first.background());
}

#[test]
fn draw_count_with_passes_distortion_and_filters_off() {
    let mut b = CaptchaBuilder::with_phrase(quiet_opts(), "ab3");
    b.build_seeded(5).unwrap();
    // font index, background color, shrink, then angle and offset per character.
    assert_eq!(b.fingerprint().unwrap().len(), 1 + 3 + 1 + 2 * 3);

    let mut b = CaptchaBuilder::with_phrase(
        CaptchaOpts {
            distortion: true,
            ..quiet_opts()
        },
        "ab3",
    );
    b.build_seeded(5).unwrap();
    assert_eq!(b.fingerprint().unwrap().len(), 1 + 3 + 1 + 2 * 3 + 4);
}

#[test]
fn ignore_all_effects_skips_everything_after_the_text() {
    let opts = CaptchaOpts {
        ignore_all_effects: true,
        ..CaptchaOpts::default()
    };
    let mut b = CaptchaBuilder::with_phrase(opts, "ab3");
    b.build_seeded(6).unwrap();
    assert_eq!(b.fingerprint().unwrap().len(), 1 + 3 + 1 + 3 + 2 * 3);
}

#[test]
fn explicit_font_skips_the_font_draw() {
    let mut b = CaptchaBuilder::with_phrase(quiet_opts(), "ab3");
    b.set_font(crate::glyph::builtin::BuiltinStyle::Bold);
    b.build_seeded(7).unwrap();
    assert_eq!(b.fingerprint().unwrap().len(), 3 + 1 + 2 * 3);
}

#[test]
fn truncated_fingerprint_fails_without_contents() {
    let mut first = CaptchaBuilder::with_phrase(quiet_opts(), "ab3");
    first.build_seeded(8).unwrap();
    let mut values = first.fingerprint().unwrap().values().to_vec();
    values.pop();

    let mut b = CaptchaBuilder::with_phrase(quiet_opts(), "ab3");
    let err = b.build_from_fingerprint(Fingerprint::new(values)).unwrap_err();
    assert!(matches!(err, CaptchaError::FingerprintExhausted { consumed: 10 }));
    assert_eq!(b.state(), BuildState::Failed);
    assert!(b.contents().is_none());
    assert!(b.fingerprint().is_none());
    assert!(b.last_error().unwrap().contains("exhausted"));
}

#[test]
fn failed_builder_rejects_builds_until_reset() {
    let opts = CaptchaOpts {
        font_paths: vec!["/no/such/font.ttf".into()],
        ..CaptchaOpts::default()
    };
    let mut b = CaptchaBuilder::with_phrase(opts, "ab3");
    assert!(matches!(b.build_seeded(9), Err(CaptchaError::FontLoad(_))));
    assert_eq!(b.state(), BuildState::Failed);
    assert!(b.contents().is_none());

    assert!(matches!(b.build_seeded(9), Err(CaptchaError::Validation(_))));

    b.set_phrase("xyz");
    assert_eq!(b.state(), BuildState::PhraseSet);
    assert!(b.last_error().is_none());
}

#[test]
fn empty_phrase_fails_the_build() {
    let mut b = CaptchaBuilder::with_phrase(CaptchaOpts::default(), "");
    assert!(matches!(b.build_seeded(10), Err(CaptchaError::EmptyPhrase)));
    assert_eq!(b.state(), BuildState::Failed);
}

#[test]
fn transparent_background_reaches_the_png() {
    let opts = CaptchaOpts {
        image_type: ImageType::Png,
        background_alpha: Some(0),
        ..quiet_opts()
    };
    let mut b = CaptchaBuilder::with_phrase(opts, "ab3");
    let canvas = b.build_seeded(11).unwrap();
    assert!(canvas.pixels().iter().any(|p| p.alpha() == 0));

    let png = b.get().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert!(decoded.pixels().any(|p| p.0[3] == 0));
    assert!(decoded.pixels().any(|p| p.0[3] == 255));
}

#[test]
fn output_requires_a_built_image() {
    let b = CaptchaBuilder::create();
    assert!(matches!(b.encode(90), Err(CaptchaError::Validation(_))));
    assert!(b.inline(90).is_err());
}

#[test]
fn phrase_test_uses_niceize() {
    let mut b = CaptchaBuilder::with_phrase(CaptchaOpts::default(), "ab10");
    assert!(b.test_phrase("AB1O"));
    assert!(b.test_phrase("abl0"));
    assert!(!b.test_phrase("ab11x"));
    b.set_phrase_builder(PhraseBuilder {
        confusables: Vec::new(),
        ..PhraseBuilder::default()
    });
    assert!(!b.test_phrase("abl0"));
}

#[test]
fn background_images_set_the_canvas_size() {
    let dir = std::env::temp_dir().join(format!("warpcaptcha-bg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bg.png");
    image::RgbaImage::from_pixel(90, 30, image::Rgba([200, 210, 220, 255]))
        .save(&path)
        .unwrap();

    let opts = CaptchaOpts {
        background_images: vec![path],
        ignore_all_effects: true,
        ..CaptchaOpts::default()
    };
    let mut b = CaptchaBuilder::with_phrase(opts, "ab3");
    let canvas = b.build_seeded(12).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (90, 30));
    // font index and image index replace the three background color draws.
    assert_eq!(b.fingerprint().unwrap().len(), 1 + 1 + 1 + 3 + 2 * 3);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unused_trailing_values_are_not_reported_after_replay() {
    let mut first = CaptchaBuilder::with_phrase(quiet_opts(), "ab3");
    first.build_seeded(13).unwrap();
    let fp = first.fingerprint().unwrap().clone();
    let mut values = fp.values().to_vec();
    values.extend([7, 7, 7]);

    let mut b = CaptchaBuilder::with_phrase(quiet_opts(), "ab3");
    b.build_from_fingerprint(Fingerprint::new(values)).unwrap();
    assert_eq!(b.fingerprint(), Some(&fp));
}
