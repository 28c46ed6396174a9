use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context;

use crate::foundation::error::{CaptchaError, CaptchaResult};

/// Reads text out of an image file.
pub trait OcrEngine {
    /// Best guess at the text in the image at `image`.
    fn read_text(&self, image: &Path) -> CaptchaResult<String>;
}

impl<F> OcrEngine for F
where
    F: Fn(&Path) -> CaptchaResult<String>,
{
    fn read_text(&self, image: &Path) -> CaptchaResult<String> {
        self(image)
    }
}

/// The `ocrad` command-line OCR, fed binary PGM files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OcradEngine {
    /// Executable to run.
    pub program: PathBuf,
}

impl Default for OcradEngine {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ocrad"),
        }
    }
}

impl OcradEngine {
    /// Return `true` when the configured program runs.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl OcrEngine for OcradEngine {
    fn read_text(&self, image: &Path) -> CaptchaResult<String> {
        let output = Command::new(&self.program)
            .arg(image)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("spawn {}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptchaError::Other(anyhow::anyhow!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }
}
