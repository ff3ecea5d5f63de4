use crate::foundation::core::{Offset, Size};
use crate::foundation::error::{LayerError, LayerResult};
use crate::foundation::math::{premul_over_px, premul_rgba8};
use crate::raster::bitmap::Bitmap;
use crate::render::anchor::FrameAnchor;
use crate::render::overlay::{BitmapOverlay, TextureOverlay};

/// Flatten bitmap overlays into one canvas-sized overlay.
///
/// Overlays are drawn in order at their pixel offsets with premultiplied source-over, so later
/// entries cover earlier ones. Pixels falling outside the canvas are dropped. The result sits at
/// the frame origin.
///
/// Every overlay must be [`TextureOverlay::Bitmap`]; anything else fails with
/// [`LayerError::UnsupportedOverlayKind`] before any drawing happens. A bitmap whose byte length
/// does not match its dimensions fails with [`LayerError::Validation`], also before drawing.
#[tracing::instrument(skip(overlays), fields(overlays = overlays.len()))]
pub fn merge_overlays(overlays: &[TextureOverlay], canvas: Size) -> LayerResult<BitmapOverlay> {
    let bitmaps = overlays
        .iter()
        .enumerate()
        .map(|(i, o)| match o {
            TextureOverlay::Bitmap(b) => {
                b.bitmap.check_len().map_err(|e| {
                    LayerError::validation(format!("overlay {i} has a malformed bitmap: {e}"))
                })?;
                Ok(b)
            }
            other => Err(LayerError::unsupported_overlay(format!(
                "overlay {i} is a {} overlay; only bitmap overlays can be merged",
                other.kind()
            ))),
        })
        .collect::<LayerResult<Vec<_>>>()?;

    if canvas.is_empty() {
        return Err(LayerError::geometry(format!(
            "merge canvas must be positive, got {}x{}",
            canvas.width, canvas.height
        )));
    }

    let mut dst = Bitmap::transparent(canvas);
    for o in bitmaps {
        draw_over(&mut dst, &o.bitmap, o.offset);
    }

    Ok(BitmapOverlay {
        bitmap: dst,
        offset: Offset::ZERO,
        anchor: FrameAnchor::ORIGIN,
    })
}

fn draw_over(dst: &mut Bitmap, src: &Bitmap, at: Offset) {
    let x0 = i64::from(at.x).max(0);
    let y0 = i64::from(at.y).max(0);
    let x1 = (i64::from(at.x) + i64::from(src.width)).min(i64::from(dst.width));
    let y1 = (i64::from(at.y) + i64::from(src.height)).min(i64::from(dst.height));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let dst_w = dst.width as usize;
    let src_w = src.width as usize;
    for y in y0..y1 {
        let sy = (y - i64::from(at.y)) as usize;
        for x in x0..x1 {
            let sx = (x - i64::from(at.x)) as usize;
            let si = (sy * src_w + sx) * 4;
            let s = [
                src.data[si],
                src.data[si + 1],
                src.data[si + 2],
                src.data[si + 3],
            ];
            let s = if src.premultiplied { s } else { premul_rgba8(s) };
            let di = ((y as usize) * dst_w + x as usize) * 4;
            let d = [
                dst.data[di],
                dst.data[di + 1],
                dst.data[di + 2],
                dst.data[di + 3],
            ];
            dst.data[di..di + 4].copy_from_slice(&premul_over_px(d, s));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/merge.rs"]
mod tests;
