use crate::foundation::core::Size;
use crate::foundation::error::{LayerError, LayerResult};
use crate::foundation::math::{premul_rgba8, unpremul_rgba8};
use crate::layer::color::Argb;

/// A rasterized layer as RGBA8 pixels.
///
/// Bitmaps produced by the rasterizer are **premultiplied alpha**; the `premultiplied` flag makes
/// this explicit at API boundaries.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .field("premultiplied", &self.premultiplied)
            .finish()
    }
}

impl Bitmap {
    /// Fully transparent premultiplied bitmap.
    pub fn transparent(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            data: vec![0u8; size.area().saturating_mul(4)],
            premultiplied: true,
        }
    }

    /// Wrap premultiplied RGBA8 bytes, checking the length.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> LayerResult<Self> {
        let bitmap = Self {
            width,
            height,
            data,
            premultiplied: true,
        };
        bitmap.check_len()?;
        Ok(bitmap)
    }

    /// Check that `data` holds exactly `width * height` RGBA8 pixels.
    ///
    /// The fields are public, so bitmaps assembled by hand are checked before pixel access.
    pub fn check_len(&self) -> LayerResult<()> {
        let expected = (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4);
        if self.data.len() != expected {
            return Err(LayerError::validation(format!(
                "bitmap byte len mismatch: expected {expected}, got {}",
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Bitmap dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Raw RGBA8 bytes of one pixel, in this bitmap's alpha convention.
    ///
    /// Panics when `(x, y)` is outside the bitmap.
    pub fn raw_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} bitmap",
            self.width,
            self.height
        );
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Straight-alpha color of one pixel.
    ///
    /// Panics when `(x, y)` is outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Argb {
        let px = self.raw_pixel(x, y);
        if self.premultiplied {
            Argb::from_rgba8(unpremul_rgba8(px))
        } else {
            Argb::from_rgba8(px)
        }
    }

    /// Copy of the pixels with straight alpha, suitable for PNG encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let un = unpremul_rgba8([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&un);
        }
        out
    }

    /// Convert to premultiplied alpha in place (no-op when already premultiplied).
    pub fn premultiply(&mut self) {
        if self.premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let p = premul_rgba8([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&p);
        }
        self.premultiplied = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/bitmap.rs"]
mod tests;
