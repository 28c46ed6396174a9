use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::glyph::builtin::BuiltinStyle;
use crate::glyph::layout::TextLayoutEngine;

/// Where a font face comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// One of the bundled stroke faces.
    Builtin(BuiltinStyle),
    /// A TrueType/OpenType file on disk.
    File(PathBuf),
    /// TrueType/OpenType bytes already in memory.
    Bytes {
        /// Name used in logs and errors.
        name: String,
        /// Raw font file contents.
        data: Vec<u8>,
    },
}

impl From<BuiltinStyle> for FontSource {
    fn from(style: BuiltinStyle) -> Self {
        Self::Builtin(style)
    }
}

impl From<PathBuf> for FontSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for FontSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// A loaded face, ready to draw.
#[derive(Clone)]
pub struct FontFace {
    name: String,
    kind: FaceKind,
}

#[derive(Clone)]
pub(crate) enum FaceKind {
    Builtin(BuiltinStyle),
    Outline(OutlineFont),
}

#[derive(Clone)]
pub(crate) struct OutlineFont {
    pub(crate) bytes: Arc<Vec<u8>>,
    pub(crate) data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            FaceKind::Builtin(style) => format!("builtin {style:?}"),
            FaceKind::Outline(o) => format!("outline ({} bytes)", o.bytes.len()),
        };
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

impl FontFace {
    /// One of the bundled stroke faces.
    pub fn builtin(style: BuiltinStyle) -> Self {
        Self {
            name: style.name().to_string(),
            kind: FaceKind::Builtin(style),
        }
    }

    /// Load and validate a face.
    ///
    /// Outline fonts are registered with the shaper once here so that a broken file fails before
    /// any random value is drawn.
    pub fn load(source: &FontSource) -> CaptchaResult<Self> {
        match source {
            FontSource::Builtin(style) => Ok(Self::builtin(*style)),
            FontSource::File(path) => {
                let data = std::fs::read(path)
                    .with_context(|| format!("read font {}", path.display()))
                    .map_err(|e| CaptchaError::font_load(format!("{e:#}")))?;
                Self::from_bytes(path.display().to_string(), data)
            }
            FontSource::Bytes { name, data } => Self::from_bytes(name.clone(), data.clone()),
        }
    }

    fn from_bytes(name: String, data: Vec<u8>) -> CaptchaResult<Self> {
        TextLayoutEngine::new()
            .register(&data)
            .map_err(|e| CaptchaError::font_load(format!("{name}: {e}")))?;

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(data.clone()), 0);
        let bytes = Arc::new(data);
        Ok(Self {
            name,
            kind: FaceKind::Outline(OutlineFont { bytes, data: font }),
        })
    }

    /// Face name (builtin name or source path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return `true` for the bundled stroke faces.
    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, FaceKind::Builtin(_))
    }

    pub(crate) fn kind(&self) -> &FaceKind {
        &self.kind
    }
}

/// The fixed set of faces a builder picks from when no explicit font is set.
#[derive(Clone, Debug)]
pub struct FontLibrary {
    faces: Vec<FontFace>,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontLibrary {
    /// The four bundled stroke faces.
    pub fn builtin() -> Self {
        Self {
            faces: BuiltinStyle::ALL.into_iter().map(FontFace::builtin).collect(),
        }
    }

    /// Load every source, failing on the first broken one.
    pub fn load<'a>(sources: impl IntoIterator<Item = &'a FontSource>) -> CaptchaResult<Self> {
        let faces = sources
            .into_iter()
            .map(FontFace::load)
            .collect::<CaptchaResult<Vec<_>>>()?;
        if faces.is_empty() {
            return Err(CaptchaError::font_load("font library is empty"));
        }
        Ok(Self { faces })
    }

    /// Library of font files, or the builtin faces when `paths` is empty.
    pub fn from_paths(paths: &[PathBuf]) -> CaptchaResult<Self> {
        if paths.is_empty() {
            return Ok(Self::builtin());
        }
        let sources: Vec<FontSource> = paths.iter().cloned().map(FontSource::File).collect();
        Self::load(&sources)
    }

    /// Number of faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Return `true` when the library holds no faces.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// All faces in order.
    pub fn faces(&self) -> &[FontFace] {
        &self.faces
    }

    /// Face for a sequencer draw, clamped into range.
    pub fn select(&self, index: i64) -> Option<&FontFace> {
        let last = self.faces.len().checked_sub(1)?;
        let i = usize::try_from(index.max(0)).unwrap_or(usize::MAX).min(last);
        self.faces.get(i)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/font.rs"]
mod tests;
