use super::*;

fn gradient(w: u32, h: u32) -> Canvas {
    let mut canvas = Canvas::new(w, h).unwrap();
    for y in 0..i64::from(h) {
        for x in 0..i64::from(w) {
            canvas.set_pixel(x, y, Color::rgb((x * 3) as u8, (y * 5) as u8, 77));
        }
    }
    canvas
}

fn params() -> DistortionParams {
    DistortionParams {
        center_x: 40,
        center_y: 12,
        phase: 3,
        scale: 1.2,
    }
}

#[test]
fn parameters_take_four_draws_in_range() {
    for seed in 0..32 {
        let mut seq = Sequencer::seeded(seed);
        let p = DistortionParams::draw(&mut seq, 150, 40).unwrap();
        assert_eq!(seq.draws(), 4);
        assert!((0..=150).contains(&p.center_x));
        assert!((0..=40).contains(&p.center_y));
        assert!((0..=10).contains(&p.phase));
        assert!(p.scale >= 1.1 && p.scale <= 1.1 + 1.0 / 3.0 + 1e-12);
    }
}

#[test]
fn centre_pixel_only_gets_the_vertical_wave() {
    let p = params();
    let (nx, ny) = p.source_point(40.0, 12.0, 30.0);
    assert_eq!(nx, 40.0);
    assert_eq!(ny, 12.0 + 1.2 * (3.0f64 + 40.0 * 0.2).sin());
}

#[test]
fn radial_ripple_follows_the_sine_perturbation() {
    let p = params();
    let (nx, _) = p.source_point(70.0, 12.0, 30.0);
    assert!((nx - (40.0 + 30.0 + 4.0 * 1.0f64.sin())).abs() < 1e-9);
}

#[test]
fn black_samples_are_remapped_to_white() {
    let canvas = Canvas::new(30, 10).unwrap();
    let opts = DistortOpts {
        parallel: false,
        ..DistortOpts::default()
    };
    let out = warp(&canvas, &params(), Color::BLACK, &opts).unwrap();
    assert!(out.pixels().iter().all(|&p| p == Color::WHITE));
}

#[test]
fn uniform_canvas_with_matching_background_is_a_fixed_point() {
    let c = Color::rgb(210, 190, 230);
    let canvas = Canvas::filled(60, 20, c).unwrap();
    let out = warp(&canvas, &params(), c, &DistortOpts::default()).unwrap();
    assert_eq!(out, canvas);
}

#[test]
fn nearest_sampling_matches_the_backward_map() {
    let src = gradient(50, 20);
    let bg = Color::rgb(1, 2, 250);
    let opts = DistortOpts {
        interpolation: false,
        parallel: false,
        ..DistortOpts::default()
    };
    let p = params();
    let out = warp(&src, &p, bg, &opts).unwrap();

    let mut saw_background = false;
    for y in 0..20i64 {
        for x in 0..50i64 {
            let (nx, ny) = p.source_point(x as f64, y as f64, 30.0);
            let (sx, sy) = (nx.round() as i64, ny.round() as i64);
            let mut want = src.get_pixel(sx, sy, bg);
            if want.packed() == 0 {
                want = Color::WHITE;
            }
            saw_background |= src.pixel(sx, sy).is_none();
            assert_eq!(out.pixel(x, y), Some(want), "({x}, {y})");
        }
    }
    assert!(saw_background, "expected some samples outside the source");
}

#[test]
fn parallel_and_sequential_rows_agree() {
    let src = gradient(80, 33);
    let p = params();
    let bg = Color::rgb(240, 240, 240);
    let sequential = warp(
        &src,
        &p,
        bg,
        &DistortOpts {
            parallel: false,
            ..DistortOpts::default()
        },
    )
    .unwrap();
    let global = warp(&src, &p, bg, &DistortOpts::default()).unwrap();
    let pooled = warp(
        &src,
        &p,
        bg,
        &DistortOpts {
            threads: Some(2),
            ..DistortOpts::default()
        },
    )
    .unwrap();
    assert_eq!(sequential, global);
    assert_eq!(sequential, pooled);
}

#[test]
fn distort_replays_identically() {
    let src = gradient(64, 24);
    let bg = Color::rgb(200, 200, 200);
    let mut seq = Sequencer::seeded(9);
    let first = distort(&src, &mut seq, bg, &DistortOpts::default()).unwrap();

    let mut replay = Sequencer::replaying(seq.into_fingerprint());
    let second = distort(&src, &mut replay, bg, &DistortOpts::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(replay.remaining(), 0);
}

#[test]
fn bad_options_are_rejected() {
    let src = gradient(8, 8);
    let zero_div = DistortOpts {
        ripple_divisor: 0.0,
        ..DistortOpts::default()
    };
    assert!(matches!(
        warp(&src, &params(), Color::WHITE, &zero_div),
        Err(CaptchaError::Validation(_))
    ));
    let zero_threads = DistortOpts {
        threads: Some(0),
        ..DistortOpts::default()
    };
    assert!(matches!(
        warp(&src, &params(), Color::WHITE, &zero_threads),
        Err(CaptchaError::Validation(_))
    ));
}
