use crate::foundation::math::round_half_up;

pub use kurbo::{BezPath, Rect};

/// Pixel displacement from the top-left origin of a frame.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Offset {
    /// Horizontal displacement in pixels.
    pub x: i32,
    /// Vertical displacement in pixels (grows downward).
    pub y: i32,
}

impl Offset {
    /// The frame origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create an offset.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Scale both components uniformly, rounding to the nearest pixel (ties toward +inf).
    pub fn scaled(self, scale: f64) -> Self {
        Self {
            x: round_half_up(f64::from(self.x) * scale) as i32,
            y: round_half_up(f64::from(self.y) * scale) as i32,
        }
    }
}

impl std::ops::Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x.saturating_add(rhs.x),
            y: self.y.saturating_add(rhs.y),
        }
    }
}

/// Pixel dimensions of a layer, bitmap or frame.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Portrait 1080p frame that templates are commonly authored against.
    ///
    /// This is a named value for callers; no API falls back to it implicitly.
    pub const FULL_SCREEN: Self = Self {
        width: 1080,
        height: 1920,
    };

    /// Create a size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Create a square size.
    pub const fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// Scale both dimensions uniformly, rounding to the nearest pixel.
    pub fn scaled(self, scale: f64) -> Self {
        fn scale_dim(v: u32, scale: f64) -> u32 {
            round_half_up(f64::from(v) * scale).clamp(0.0, f64::from(u32::MAX)) as u32
        }

        Self {
            width: scale_dim(self.width, scale),
            height: scale_dim(self.height, scale),
        }
    }

    /// Return `true` when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Rectangle `(0, 0) .. (width, height)` in kurbo coordinates.
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
