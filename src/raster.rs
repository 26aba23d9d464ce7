//! Software rasterizer over a flat RGBA8888 buffer.
//!
//! Every primitive overwrites the pixels it covers; there is no blending
//! between draws, so the last primitive painted over a pixel wins.

use crate::png::BYTES_PER_PIXEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A width x height RGBA8888 drawing surface, initially fully transparent black.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// # Panics
    ///
    /// Panics if `width * height * 4` does not fit in `usize`.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .unwrap_or_else(|| panic!("canvas of {width}x{height} pixels is too large"));
        Self {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Hand the finished buffer back to the caller.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Caller must keep `x < width` and `y < height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        let i = self.offset(x, y);
        self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.to_bytes());
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn set_alpha(&mut self, x: u32, y: u32, alpha: u8) {
        let i = self.offset(x, y);
        self.pixels[i + 3] = alpha;
    }

    /// Clamp an inclusive span to `[0, limit)`; `None` when nothing is left.
    fn clip(lo: i64, hi: i64, limit: u32) -> Option<(u32, u32)> {
        let lo = lo.max(0);
        let hi = hi.min(limit as i64 - 1);
        (lo <= hi).then(|| (lo as u32, hi as u32))
    }

    /// Fill every pixel whose center `(x + 0.5, y + 0.5)` lies within
    /// `radius` of `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        if radius < 0.0 {
            return;
        }
        let Some((x0, x1)) = Self::clip(
            (cx - radius - 1.0) as i64,
            (cx + radius + 1.0) as i64,
            self.width,
        ) else {
            return;
        };
        let Some((y0, y1)) = Self::clip(
            (cy - radius - 1.0) as i64,
            (cy + radius + 1.0) as i64,
            self.height,
        ) else {
            return;
        };

        let r2 = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = (x as f64 + 0.5) - cx;
                let dy = (y as f64 + 0.5) - cy;
                if dx * dx + dy * dy <= r2 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Fill the rectangle `[x, x + rw) x [y, y + rh)` with quarter-circle
    /// corners of `radius`.
    ///
    /// The radius is clamped to half the shorter side so the four corner
    /// regions never overlap; a radius of 0 yields a plain rectangle.
    pub fn fill_rounded_rect(&mut self, x: i64, y: i64, rw: i64, rh: i64, radius: i64, color: Color) {
        if rw <= 0 || rh <= 0 {
            return;
        }
        let radius = radius.clamp(0, rw.min(rh) / 2);

        let Some((x0, x1)) = Self::clip(x, x + rw - 1, self.width) else {
            return;
        };
        let Some((y0, y1)) = Self::clip(y, y + rh - 1, self.height) else {
            return;
        };

        let corner = |p: i64, start: i64, len: i64| {
            if p < start + radius {
                Some(start + radius)
            } else if p >= start + len - radius {
                Some(start + len - 1 - radius)
            } else {
                None
            }
        };

        let r2 = radius * radius;
        for yy in y0..=y1 {
            let ccy = corner(yy as i64, y, rh);
            for xx in x0..=x1 {
                let inside = match (corner(xx as i64, x, rw), ccy) {
                    (Some(ccx), Some(ccy)) => {
                        let dx = xx as i64 - ccx;
                        let dy = yy as i64 - ccy;
                        dx * dx + dy * dy <= r2
                    }
                    _ => true,
                };
                if inside {
                    self.set_pixel(xx, yy, color);
                }
            }
        }
    }
}
