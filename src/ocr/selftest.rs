use std::path::{Path, PathBuf};

use crate::builder::captcha::CaptchaBuilder;
use crate::encode::output::{self, ImageType};
use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::ocr::engine::OcrEngine;
use crate::raster::canvas::Canvas;

/// Checks finished captchas against an OCR engine.
///
/// Scratch images go to `temp_dir`, named by process id and a timestamp, and are removed
/// once the engine has read them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OcrSelfTest {
    /// Directory for the scratch PGM files.
    pub temp_dir: PathBuf,
    /// JPEG quality the image passes through before the OCR sees it.
    pub quality: u8,
}

impl Default for OcrSelfTest {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir(),
            quality: 20,
        }
    }
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

impl OcrSelfTest {
    /// Self test writing scratch files to `temp_dir`.
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            ..Self::default()
        }
    }

    /// Return `true` when `engine` reads the builder's phrase back from its last image.
    ///
    /// The comparison goes through [`CaptchaBuilder::test_phrase`], so confusable
    /// characters count as matches.
    pub fn is_readable(
        &self,
        builder: &CaptchaBuilder,
        engine: &dyn OcrEngine,
    ) -> CaptchaResult<bool> {
        let canvas = builder
            .contents()
            .ok_or_else(|| CaptchaError::validation("no built image to read; call build() first"))?;

        let path = self.temp_dir.join(format!(
            "warpcaptcha_ocr_{}_{}.pgm",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        let _guard = TempFileGuard(Some(path.clone()));
        self.write_pgm(canvas, &path)?;

        let text = engine.read_text(&path)?;
        let readable = builder.test_phrase(&text);
        tracing::debug!(ocr = %text, readable, "ocr self test");
        Ok(readable)
    }

    /// Rebuild until `engine` can no longer read the phrase.
    ///
    /// Returns the attempt that produced an unreadable image, or `None` when every
    /// attempt was readable; the builder keeps the last image either way.
    #[tracing::instrument(skip(self, builder, engine))]
    pub fn build_against(
        &self,
        builder: &mut CaptchaBuilder,
        engine: &dyn OcrEngine,
        max_attempts: usize,
    ) -> CaptchaResult<Option<usize>> {
        if max_attempts == 0 {
            return Err(CaptchaError::validation("max_attempts must be >= 1"));
        }
        for attempt in 1..=max_attempts {
            builder.build()?;
            if !self.is_readable(builder, engine)? {
                return Ok(Some(attempt));
            }
        }
        tracing::warn!(max_attempts, "every build was readable by ocr");
        Ok(None)
    }

    fn write_pgm(&self, canvas: &Canvas, path: &Path) -> CaptchaResult<()> {
        let jpeg = output::encode(canvas, ImageType::Jpeg, self.quality)?;
        let gray = image::load_from_memory(&jpeg)?.to_luma8();
        gray.save_with_format(path, image::ImageFormat::Pnm)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ocr/selftest.rs"]
mod tests;
