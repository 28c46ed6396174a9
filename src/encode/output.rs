use std::io::Write;
use std::path::Path;

use anyhow::Context;
use base64::Engine as _;
use image::ImageEncoder;

use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::raster::canvas::Canvas;

/// Default encoder quality.
pub const DEFAULT_QUALITY: u8 = 90;

/// Raster format of the encoded image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Lossy, no transparency.
    #[default]
    Jpeg,
    /// Lossless, keeps transparency.
    Png,
    /// Palette, keeps binary transparency.
    Gif,
}

impl ImageType {
    /// MIME type for data URIs and HTTP responses.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

fn check_quality(quality: u8) -> CaptchaResult<()> {
    if quality > 100 {
        return Err(CaptchaError::validation(format!(
            "quality must be in 0..=100, got {quality}"
        )));
    }
    Ok(())
}

/// Encode `canvas` into `out`.
///
/// `quality` is the JPEG quality, the PNG compression level and the GIF quantizer effort, all on
/// a 0..=100 scale.
pub fn write_to<W: Write>(
    canvas: &Canvas,
    out: &mut W,
    image_type: ImageType,
    quality: u8,
) -> CaptchaResult<()> {
    check_quality(quality)?;
    let (w, h) = (canvas.width(), canvas.height());
    match image_type {
        ImageType::Jpeg => {
            let rgb = canvas.to_rgb_image();
            image::codecs::jpeg::JpegEncoder::new_with_quality(out, quality.max(1)).write_image(
                rgb.as_raw(),
                w,
                h,
                image::ExtendedColorType::Rgb8,
            )?;
        }
        ImageType::Png => {
            let compression = match quality {
                0..=33 => image::codecs::png::CompressionType::Fast,
                34..=80 => image::codecs::png::CompressionType::Default,
                _ => image::codecs::png::CompressionType::Best,
            };
            let rgba = canvas.to_rgba_image();
            image::codecs::png::PngEncoder::new_with_quality(
                out,
                compression,
                image::codecs::png::FilterType::Adaptive,
            )
            .write_image(rgba.as_raw(), w, h, image::ExtendedColorType::Rgba8)?;
        }
        ImageType::Gif => {
            // 1 is the slowest, best-quality quantizer speed and 30 the fastest.
            let speed = 1 + i32::from(100 - quality) * 29 / 100;
            let rgba = canvas.to_rgba_image();
            image::codecs::gif::GifEncoder::new_with_speed(out, speed).encode(
                rgba.as_raw(),
                w,
                h,
                image::ExtendedColorType::Rgba8,
            )?;
        }
    }
    Ok(())
}

/// Encode `canvas` into a fresh buffer.
pub fn encode(canvas: &Canvas, image_type: ImageType, quality: u8) -> CaptchaResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_to(canvas, &mut buf, image_type, quality)?;
    Ok(buf)
}

/// Encode `canvas` and write it to `path`.
pub fn save(canvas: &Canvas, path: &Path, image_type: ImageType, quality: u8) -> CaptchaResult<()> {
    let bytes = encode(canvas, image_type, quality)?;
    std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Encode `canvas` as a `data:` URI suitable for an `<img src>` attribute.
pub fn inline(canvas: &Canvas, image_type: ImageType, quality: u8) -> CaptchaResult<String> {
    let bytes = encode(canvas, image_type, quality)?;
    Ok(format!(
        "data:{};base64,{}",
        image_type.mime(),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/output.rs"]
mod tests;
