pub use kurbo::{Affine, BezPath, Point, Vec2};

/// Packed 8-bit-per-channel color, laid out as `0xTTRRGGBB`.
///
/// The top byte holds *transparency* rather than alpha: `0` is fully opaque and `255` fully
/// transparent. Every opaque color therefore packs to its plain 24-bit RGB value, and opaque
/// black packs to exactly `0`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Opaque black (packs to `0`).
    pub const BLACK: Self = Self(0x0000_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0x00FF_FFFF);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Color from RGB channels and straight alpha (`255` = opaque).
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_channels(255 - a, r, g, b)
    }

    /// Color from raw transparency and RGB channels.
    pub const fn from_channels(transparency: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((transparency as u32) << 24) | Self::rgb(r, g, b).0)
    }

    /// Raw packed value.
    pub const fn packed(self) -> u32 {
        self.0
    }

    /// Red channel.
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green channel.
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue channel.
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Transparency channel (`0` = opaque).
    pub const fn transparency(self) -> u8 {
        ((self.0 >> 24) & 0xFF) as u8
    }

    /// Straight alpha (`255` = opaque).
    pub const fn alpha(self) -> u8 {
        255 - self.transparency()
    }

    /// Same RGB with the given straight alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// Straight-alpha RGBA8 bytes.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.alpha()]
    }

    /// Build from straight-alpha RGBA8 bytes.
    pub const fn from_rgba8(px: [u8; 4]) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
