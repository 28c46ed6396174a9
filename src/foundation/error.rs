/// Convenience result type used across warpcaptcha.
pub type CaptchaResult<T> = Result<T, CaptchaError>;

/// Top-level error taxonomy used by the captcha pipeline.
#[derive(thiserror::Error, Debug)]
pub enum CaptchaError {
    /// A build was requested for an empty phrase.
    #[error("empty phrase: a captcha needs at least one character")]
    EmptyPhrase,

    /// A font resource could not be read or parsed.
    #[error("font load error: {0}")]
    FontLoad(String),

    /// A replayed fingerprint ran out of values before the build finished.
    #[error("fingerprint exhausted after {consumed} values")]
    FingerprintExhausted {
        /// Number of values consumed before the overrun.
        consumed: usize,
    },

    /// Tonal post filters are not available in this build.
    #[error("unsupported filter backend: post filters are not compiled in")]
    UnsupportedFilterBackend,

    /// Errors surfaced from the image codec boundary.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid user-provided options or builder usage.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptchaError {
    /// Build a [`CaptchaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CaptchaError::FontLoad`] value.
    pub fn font_load(msg: impl Into<String>) -> Self {
        Self::FontLoad(msg.into())
    }

    /// Build a [`CaptchaError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Return `true` for conditions that only skip an optional step.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnsupportedFilterBackend)
    }
}

impl From<image::ImageError> for CaptchaError {
    fn from(err: image::ImageError) -> Self {
        Self::Encoding(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
