use std::cell::Cell;

use super::*;
use crate::builder::opts::CaptchaOpts;
use crate::ocr::engine::OcradEngine;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "warpcaptcha_{name}_{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn quick_opts() -> CaptchaOpts {
    CaptchaOpts {
        width: 80,
        height: 24,
        parallel: false,
        ..CaptchaOpts::default()
    }
}

#[test]
fn readable_when_engine_returns_the_phrase() {
    let dir = scratch("ocr_readable");
    let mut b = CaptchaBuilder::with_phrase(quick_opts(), "ab10");
    b.build_seeded(1).unwrap();

    let seen = Cell::new(None);
    let engine = |path: &Path| -> CaptchaResult<String> {
        let bytes = std::fs::read(path).unwrap();
        seen.set(Some(path.to_path_buf()));
        assert_eq!(&bytes[..2], b"P5");
        Ok("AB1O".to_owned())
    };

    let check = OcrSelfTest::new(&dir);
    assert!(check.is_readable(&b, &engine).unwrap());
    // scratch file removed afterwards
    assert!(!seen.take().unwrap().exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unreadable_when_engine_misreads() {
    let dir = scratch("ocr_misread");
    let mut b = CaptchaBuilder::with_phrase(quick_opts(), "ab3");
    b.build_seeded(2).unwrap();
    let engine = |_: &Path| -> CaptchaResult<String> { Ok("a83".to_owned()) };
    assert!(!OcrSelfTest::new(&dir).is_readable(&b, &engine).unwrap());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn requires_a_built_image() {
    let b = CaptchaBuilder::create();
    let engine = |_: &Path| -> CaptchaResult<String> { Ok(String::new()) };
    let err = OcrSelfTest::default().is_readable(&b, &engine).unwrap_err();
    assert!(matches!(err, CaptchaError::Validation(_)));
}

#[test]
fn build_against_stops_at_first_unreadable_image() {
    let dir = scratch("ocr_build_against");
    let mut b = CaptchaBuilder::with_phrase(quick_opts(), "k9x2m");
    let calls = Cell::new(0usize);
    let engine = |_: &Path| -> CaptchaResult<String> {
        calls.set(calls.get() + 1);
        Ok(if calls.get() < 3 { "k9x2m" } else { "????" }.to_owned())
    };

    let check = OcrSelfTest::new(&dir);
    assert_eq!(check.build_against(&mut b, &engine, 10).unwrap(), Some(3));
    assert_eq!(calls.get(), 3);
    assert!(b.contents().is_some());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn build_against_gives_up_after_max_attempts() {
    let dir = scratch("ocr_give_up");
    let mut b = CaptchaBuilder::with_phrase(quick_opts(), "k9x2m");
    let engine = |_: &Path| -> CaptchaResult<String> { Ok("k9x2m".to_owned()) };

    let check = OcrSelfTest::new(&dir);
    assert_eq!(check.build_against(&mut b, &engine, 2).unwrap(), None);
    assert!(matches!(
        check.build_against(&mut b, &engine, 0),
        Err(CaptchaError::Validation(_))
    ));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn engine_errors_propagate() {
    let dir = scratch("ocr_engine_error");
    let mut b = CaptchaBuilder::with_phrase(quick_opts(), "ab3");
    b.build_seeded(3).unwrap();
    let engine = OcradEngine {
        program: dir.join("no-such-ocrad"),
    };
    assert!(!engine.is_available());
    assert!(OcrSelfTest::new(&dir).is_readable(&b, &engine).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn scratch_file_is_named_by_process_and_time() {
    let dir = scratch("ocr_naming");
    let mut b = CaptchaBuilder::with_phrase(quick_opts(), "ab3");
    b.build_seeded(3).unwrap();

    let seen = Cell::new(None);
    let engine = |path: &Path| -> CaptchaResult<String> {
        seen.set(Some(path.to_path_buf()));
        Ok(String::new())
    };
    OcrSelfTest::new(&dir).is_readable(&b, &engine).unwrap();

    let path = seen.take().unwrap();
    assert_eq!(path.parent(), Some(dir.as_path()));
    let name = path.file_name().unwrap().to_str().unwrap();
    let stamp = name
        .strip_prefix(&format!("warpcaptcha_ocr_{}_", std::process::id()))
        .and_then(|rest| rest.strip_suffix(".pgm"))
        .unwrap();
    assert!(stamp.parse::<u128>().is_ok(), "{name}");
    let _ = std::fs::remove_dir_all(&dir);
}
