use std::path::PathBuf;

use crate::distort::field::DistortOpts;
use crate::encode::output::{DEFAULT_QUALITY, ImageType};
use crate::foundation::core::Color;
use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::glyph::writer::TextStyle;

/// Environment variable overriding the distortion pool size when `threads` is unset.
pub const THREADS_ENV: &str = "WARPCAPTCHA_THREADS";

/// Options for one captcha builder.
///
/// Every field has a default, so a JSON document only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptchaOpts {
    /// Canvas width in pixels (ignored when a background image is used).
    pub width: u32,
    /// Canvas height in pixels (ignored when a background image is used).
    pub height: u32,
    /// Output format.
    pub image_type: ImageType,
    /// Encoder quality, 0..=100.
    pub quality: u8,
    /// Apply the sinusoidal warp.
    pub distortion: bool,
    /// Bilinear sampling in the warp; nearest pixel otherwise.
    pub interpolation: bool,
    /// Skip scramble passes, distortion and post filters.
    pub ignore_all_effects: bool,
    /// Cap on the behind pass; `Some(0)` disables it.
    pub max_behind_lines: Option<u32>,
    /// Cap on the front pass; `Some(0)` disables it.
    pub max_front_lines: Option<u32>,
    /// Largest per-character rotation, in degrees.
    pub max_angle: i64,
    /// Largest per-character vertical shift, in pixels.
    pub max_offset: i64,
    /// Divisor of the radial ripple.
    pub ripple_divisor: f64,
    /// Fixed background color. Setting it also disables post filters.
    pub background_color: Option<Color>,
    /// Straight alpha applied to the background fill (`0` = fully transparent).
    pub background_alpha: Option<u8>,
    /// Fixed text color. Setting it also disables post filters.
    pub text_color: Option<Color>,
    /// Font files to pick from; the builtin stroke faces when empty.
    pub font_paths: Vec<PathBuf>,
    /// Background images to pick from.
    pub background_images: Vec<PathBuf>,
    /// Compute distortion rows in parallel.
    pub parallel: bool,
    /// Dedicated distortion pool size.
    pub threads: Option<usize>,
}

impl Default for CaptchaOpts {
    fn default() -> Self {
        Self {
            width: 150,
            height: 40,
            image_type: ImageType::Jpeg,
            quality: DEFAULT_QUALITY,
            distortion: true,
            interpolation: true,
            ignore_all_effects: false,
            max_behind_lines: None,
            max_front_lines: None,
            max_angle: 12,
            max_offset: 5,
            ripple_divisor: 30.0,
            background_color: None,
            background_alpha: None,
            text_color: None,
            font_paths: Vec::new(),
            background_images: Vec::new(),
            parallel: true,
            threads: None,
        }
    }
}

impl CaptchaOpts {
    /// Parse and validate options from JSON.
    pub fn from_json_str(s: &str) -> CaptchaResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| CaptchaError::validation(format!("captcha options from json: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject option combinations no build could satisfy.
    pub fn validate(&self) -> CaptchaResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptchaError::validation("width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(CaptchaError::validation(format!(
                "width/height must be <= {}",
                u16::MAX
            )));
        }
        if self.quality > 100 {
            return Err(CaptchaError::validation("quality must be in 0..=100"));
        }
        if !self.ripple_divisor.is_finite() || self.ripple_divisor <= 0.0 {
            return Err(CaptchaError::validation(
                "ripple_divisor must be finite and > 0",
            ));
        }
        if self.max_angle < 0 || self.max_offset < 0 {
            return Err(CaptchaError::validation(
                "max_angle and max_offset must be >= 0",
            ));
        }
        if self.threads == Some(0) {
            return Err(CaptchaError::validation(
                "'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }

    pub(crate) fn text_style(&self) -> TextStyle {
        TextStyle {
            max_angle: self.max_angle,
            max_offset: self.max_offset,
            text_color: self.text_color,
        }
    }

    pub(crate) fn distort_opts(&self) -> DistortOpts {
        let threads = self.threads.or_else(|| {
            std::env::var(THREADS_ENV)
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&n| n > 0)
        });
        DistortOpts {
            ripple_divisor: self.ripple_divisor,
            interpolation: self.interpolation,
            parallel: self.parallel,
            threads,
        }
    }

    /// Post filters only run over randomly colored images.
    pub(crate) fn post_filters_enabled(&self) -> bool {
        !self.ignore_all_effects && self.background_color.is_none() && self.text_color.is_none()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/builder/opts.rs"]
mod tests;
