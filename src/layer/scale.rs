use crate::foundation::core::Size;
use crate::foundation::error::{LayerError, LayerResult};
use crate::layer::model::{Layer, LayerCollection};

/// Cover-fit scale factor from `reference` (the authoring frame) to `target`.
///
/// `max(target.w / reference.w, target.h / reference.h)`: the scaled composition covers the whole
/// target frame and overflow is cropped. `reference` must have non-zero dimensions.
pub fn cover_scale(target: Size, reference: Size) -> LayerResult<f64> {
    if reference.is_empty() {
        return Err(LayerError::validation(format!(
            "reference frame must have positive dimensions, got {}x{}",
            reference.width, reference.height
        )));
    }
    let sx = f64::from(target.width) / f64::from(reference.width);
    let sy = f64::from(target.height) / f64::from(reference.height);
    Ok(sx.max(sy))
}

/// Scale the geometry of every layer by `scale`.
///
/// Offsets and sizes are rounded to the nearest pixel; text layers also scale `line_height` and
/// `font_size`. Colors, text and clip kinds are untouched.
pub fn adjust_layers(collection: &LayerCollection, scale: f64) -> LayerCollection {
    collection
        .iter()
        .map(|layer| match layer {
            Layer::Shape(s) => Layer::Shape(s.scaled(scale)),
            Layer::Text(t) => Layer::Text(t.scaled(scale)),
        })
        .collect()
}

/// [`cover_scale`] followed by [`adjust_layers`].
pub fn adjust_for_frame(
    collection: &LayerCollection,
    target: Size,
    reference: Size,
) -> LayerResult<LayerCollection> {
    let scale = cover_scale(target, reference)?;
    Ok(adjust_layers(collection, scale))
}

#[cfg(test)]
#[path = "../../tests/unit/layer/scale.rs"]
mod tests;
