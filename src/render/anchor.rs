use crate::foundation::core::{Offset, Size};

/// Overlay placement in normalized device coordinates.
///
/// `x` grows rightward and `y` grows upward, both spanning `[-1, 1]` across the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameAnchor {
    /// Horizontal NDC coordinate.
    pub x: f32,
    /// Vertical NDC coordinate.
    pub y: f32,
}

impl FrameAnchor {
    /// Top-left anchor used for layers placed at the frame origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };
}

/// Map a bitmap's pixel offset in `frame` to the NDC anchor the compositor positions it by.
///
/// An offset of exactly `(0, 0)` yields `(0, 0)` regardless of bitmap size; every other offset
/// goes through the general formula.
pub fn calculate_frame_anchor(
    frame: Size,
    offset: Offset,
    bitmap_width: u32,
    bitmap_height: u32,
) -> FrameAnchor {
    if offset == Offset::ZERO {
        return FrameAnchor::ORIGIN;
    }

    let frame_w = frame.width as f32;
    let frame_h = frame.height as f32;

    let ndc_x = (offset.x as f32 / frame_w) * 2.0 - 1.0;
    let ndc_y = 1.0 - (offset.y as f32 / frame_h) * 2.0;

    FrameAnchor {
        x: ndc_x + bitmap_width as f32 / frame_w,
        y: ndc_y - bitmap_height as f32 / frame_h,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/anchor.rs"]
mod tests;
