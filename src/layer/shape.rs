use crate::foundation::core::{BezPath, Size};
use crate::foundation::error::{LayerError, LayerResult};
use crate::layer::model::ClipShape;
use kurbo::Shape;

/// Curve flattening tolerance (pixels) used when converting ellipses and arcs to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Build the clip path of `shape` inside a box of `size`, anchored at `(0, 0)`.
///
/// Returns `None` for [`ClipShape::Rectangle`] (the whole box is painted). Corner radii larger than
/// half the shorter side are clamped.
pub(crate) fn clip_path(shape: ClipShape, size: Size) -> LayerResult<Option<BezPath>> {
    if size.is_empty() {
        return Err(LayerError::geometry(format!(
            "clip shape needs a positive bounding box, got {}x{}",
            size.width, size.height
        )));
    }
    let rect = size.to_rect();
    match shape {
        ClipShape::Rectangle => Ok(None),
        ClipShape::Circle => Ok(Some(
            kurbo::Ellipse::from_rect(rect).to_path(PATH_TOLERANCE),
        )),
        ClipShape::RoundedRectangle {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        } => {
            let max_r = rect.width().min(rect.height()) / 2.0;
            let r = |v: u32| f64::from(v).clamp(0.0, max_r);
            let radii = kurbo::RoundedRectRadii::new(
                r(top_left),
                r(top_right),
                r(bottom_right),
                r(bottom_left),
            );
            Ok(Some(
                kurbo::RoundedRect::from_rect(rect, radii).to_path(PATH_TOLERANCE),
            ))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/shape.rs"]
mod tests;
