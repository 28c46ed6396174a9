use crate::foundation::core::Color;
use crate::foundation::error::{CaptchaError, CaptchaResult};

/// In-memory pixel buffer, row-major, one packed [`Color`] per pixel.
///
/// Reads outside the canvas return a caller-supplied background, and writes outside it are
/// dropped, so drawing code never has to clip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Create a canvas filled with opaque black.
    pub fn new(width: u32, height: u32) -> CaptchaResult<Self> {
        Self::filled(width, height, Color::BLACK)
    }

    /// Create a canvas filled with `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> CaptchaResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaptchaError::validation(format!(
                "canvas dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| CaptchaError::validation("canvas size overflow"))?;
        Ok(Self {
            width,
            height,
            pixels: vec![color; len],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixels, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Paint every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Pixel at `(x, y)`, or `background` outside the canvas.
    pub fn get_pixel(&self, x: i64, y: i64, background: Color) -> Color {
        self.pixel(x, y).unwrap_or(background)
    }

    /// Overwrite the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Pull a point lying more than one canvas size outside the edges back to that margin.
    fn pull_in(&self, x: i64, y: i64) -> (i64, i64) {
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        (x.clamp(-w, 2 * w), y.clamp(-h, 2 * h))
    }

    /// Draw a straight line with a square brush `thickness` pixels wide.
    ///
    /// Endpoints far off the canvas are pulled in to one canvas size past the edges and the
    /// brush is never wider than the canvas.
    pub fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color, thickness: u32) {
        let (x0, y0) = self.pull_in(x0, y0);
        let (x1, y1) = self.pull_in(x1, y1);
        let t = i64::from(thickness.clamp(1, self.width.max(self.height)));
        let lo = -((t - 1) / 2);
        let hi = lo + t - 1;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            for by in lo..=hi {
                for bx in lo..=hi {
                    self.set_pixel(x + bx, y + by, color);
                }
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw an elliptical arc outline, stepping one degree at a time.
    ///
    /// Angles are in degrees, clockwise from the positive x axis (y grows downward). An end
    /// angle before the start wraps by whole turns and a sweep past a full turn draws one turn.
    /// The centre is pulled in like a line endpoint and radii are capped at twice the longer side.
    pub fn draw_arc(
        &mut self,
        cx: i64,
        cy: i64,
        rx: i64,
        ry: i64,
        start_deg: i64,
        end_deg: i64,
        color: Color,
    ) {
        let (cx, cy) = self.pull_in(cx, cy);
        let limit = 2 * i64::from(self.width.max(self.height));
        let (rx, ry) = (rx.clamp(-limit, limit), ry.clamp(-limit, limit));

        let mut sweep = i128::from(end_deg) - i128::from(start_deg);
        if sweep < 0 {
            sweep = sweep.rem_euclid(360);
        }
        let sweep = sweep.min(360) as i64;
        let start = start_deg.rem_euclid(360);

        let point = |deg: i64| -> (i64, i64) {
            let rad = (deg as f64).to_radians();
            (
                cx + (rad.cos() * rx as f64).round() as i64,
                cy + (rad.sin() * ry as f64).round() as i64,
            )
        };

        let (mut lx, mut ly) = point(start);
        self.set_pixel(lx, ly, color);
        for deg in (start + 1)..=(start + sweep) {
            let (x, y) = point(deg);
            self.draw_line(lx, ly, x, y, color, 1);
            (lx, ly) = (x, y);
        }
    }

    /// Copy out as straight-alpha RGBA8.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixels[self.offset(x, y)].to_rgba8())
        })
    }

    /// Copy out as RGB8, dropping transparency.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let px = self.pixels[self.offset(x, y)];
            image::Rgb([px.r(), px.g(), px.b()])
        })
    }

    /// Build a canvas from a decoded straight-alpha RGBA8 image.
    pub fn from_rgba_image(img: &image::RgbaImage) -> CaptchaResult<Self> {
        let mut canvas = Self::new(img.width(), img.height())?;
        for (dst, src) in canvas.pixels.iter_mut().zip(img.pixels()) {
            *dst = Color::from_rgba8(src.0);
        }
        Ok(canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/canvas.rs"]
mod tests;
