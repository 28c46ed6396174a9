use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CaptchaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CaptchaError::font_load("x")
            .to_string()
            .contains("font load error:")
    );
    assert!(
        CaptchaError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        CaptchaError::FingerprintExhausted { consumed: 7 }
            .to_string()
            .contains("after 7 values")
    );
}

#[test]
fn only_missing_filter_backend_is_recoverable() {
    assert!(CaptchaError::UnsupportedFilterBackend.is_recoverable());
    assert!(!CaptchaError::EmptyPhrase.is_recoverable());
    assert!(!CaptchaError::FingerprintExhausted { consumed: 0 }.is_recoverable());
    assert!(!CaptchaError::font_load("missing").is_recoverable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CaptchaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn image_errors_map_to_encoding() {
    let err = image::ImageError::Unsupported(
        image::error::UnsupportedError::from_format_and_kind(
            image::error::ImageFormatHint::Unknown,
            image::error::UnsupportedErrorKind::GenericFeature("x".to_string()),
        ),
    );
    assert!(matches!(CaptchaError::from(err), CaptchaError::Encoding(_)));
}
