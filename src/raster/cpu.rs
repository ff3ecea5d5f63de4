use crate::foundation::core::{BezPath, Size};
use crate::foundation::error::{LayerError, LayerResult};
use crate::foundation::math::premul_rgba8;
use crate::layer::color::Argb;
use crate::layer::model::{ClipShape, Layer, ShapeLayer, TextLayer};
use crate::layer::shape::clip_path;
use crate::raster::alpha::normalize_alpha;
use crate::raster::bitmap::Bitmap;
use crate::raster::text::{FontSource, TextLayoutEngine};
use std::sync::Arc;

/// Rasterizer options.
///
/// Defaults enable every feature (clip shapes and alpha normalization); turning them off selects
/// the simpler legacy rendering.
#[derive(Debug, Clone)]
pub struct RasterOpts {
    pub(crate) normalize_alpha: bool,
    pub(crate) clip_shapes: bool,
    pub(crate) font: Option<FontSource>,
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            normalize_alpha: true,
            clip_shapes: true,
            font: None,
        }
    }
}

impl RasterOpts {
    /// Boost low-alpha colors before drawing (see [`crate::normalize_alpha`]).
    pub fn with_normalize_alpha(mut self, on: bool) -> Self {
        self.normalize_alpha = on;
        self
    }

    /// Honor clip shapes; when off every shape fills its whole bounding box.
    pub fn with_clip_shapes(mut self, on: bool) -> Self {
        self.clip_shapes = on;
        self
    }

    /// Font used for every text layer; `None` uses the system sans-serif family.
    pub fn with_font(mut self, font: Option<FontSource>) -> Self {
        self.font = font;
        self
    }

    /// Whether alpha normalization is enabled.
    pub fn normalizes_alpha(&self) -> bool {
        self.normalize_alpha
    }

    /// Whether clip shapes are honored.
    pub fn clips_shapes(&self) -> bool {
        self.clip_shapes
    }
}

/// CPU rasterizer powered by `vello_cpu`, turning one [`Layer`] into one [`Bitmap`].
///
/// A rasterizer keeps a render context and text layout state between calls, so it is meant to be
/// owned by a single worker; create one per thread for parallel work.
pub struct Rasterizer {
    opts: RasterOpts,
    ctx: Option<vello_cpu::RenderContext>,
    text_engine: TextLayoutEngine,
}

impl Rasterizer {
    /// Create a rasterizer with the given options.
    pub fn new(opts: RasterOpts) -> Self {
        Self {
            opts,
            ctx: None,
            text_engine: TextLayoutEngine::new(),
        }
    }

    /// Options this rasterizer was built with.
    pub fn opts(&self) -> &RasterOpts {
        &self.opts
    }

    /// Render `layer` in isolation into a bitmap of exactly `layer.size()`.
    ///
    /// Everything outside the layer's shape is transparent.
    pub fn rasterize(&mut self, layer: &Layer) -> LayerResult<Bitmap> {
        let size = layer.size();
        let (w, h) = surface_dims(size)?;

        if let Layer::Text(t) = layer
            && t.text.is_empty()
        {
            return Ok(Bitmap::transparent(size));
        }

        let pixmap = self.with_ctx_mut(w, h, |this, ctx| {
            match layer {
                Layer::Shape(s) => this.draw_shape(s, ctx)?,
                Layer::Text(t) => this.draw_text(t, ctx)?,
            }
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        })?;

        tracing::debug!(
            kind = layer.kind(),
            width = size.width,
            height = size.height,
            "rasterized layer"
        );
        Bitmap::from_premul_rgba8(
            size.width,
            size.height,
            pixmap.data_as_u8_slice().to_vec(),
        )
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> LayerResult<R>,
    ) -> LayerResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn prepare_color(&self, c: Argb) -> Argb {
        if self.opts.normalize_alpha {
            normalize_alpha(c)
        } else {
            c
        }
    }

    fn draw_shape(
        &mut self,
        layer: &ShapeLayer,
        ctx: &mut vello_cpu::RenderContext,
    ) -> LayerResult<()> {
        let size = layer.size();
        let clip = if self.opts.clip_shapes {
            layer.clip_shape()
        } else {
            ClipShape::Rectangle
        };
        let path = clip_path(clip, size)?;
        let colors: Vec<Argb> = layer
            .colors()
            .iter()
            .map(|&c| self.prepare_color(c))
            .collect();

        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match colors.as_slice() {
            [] => {
                return Err(LayerError::validation(
                    "shape layer color list must contain at least one color",
                ));
            }
            [c] => {
                let [r, g, b, a] = c.to_rgba8();
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            }
            stops => {
                let bytes = vertical_gradient_premul(stops, size.width, size.height);
                ctx.set_paint(rgba_premul_to_image(&bytes, size.width, size.height)?);
            }
        }

        match path {
            None => ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(size.width),
                f64::from(size.height),
            )),
            Some(p) => ctx.fill_path(&bezpath_to_cpu(&p)),
        }
        Ok(())
    }

    fn draw_text(&mut self, layer: &TextLayer, ctx: &mut vello_cpu::RenderContext) -> LayerResult<()> {
        let color = self.prepare_color(layer.color);
        let layout = self.text_engine.layout_plain(
            &layer.text,
            self.opts.font.as_ref(),
            layer.font_size as f32,
            color.into(),
            layer.size.width as f32,
        )?;

        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                // Line offset and baseline are folded into each glyph position.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(run.run().font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

/// Convert a layer size into render surface dimensions.
fn surface_dims(size: Size) -> LayerResult<(u16, u16)> {
    if size.is_empty() {
        return Err(LayerError::geometry(format!(
            "layer size must be positive, got {}x{}",
            size.width, size.height
        )));
    }
    let w: u16 = size.width.try_into().map_err(|_| {
        LayerError::geometry(format!("layer width {} exceeds surface limit", size.width))
    })?;
    let h: u16 = size.height.try_into().map_err(|_| {
        LayerError::geometry(format!("layer height {} exceeds surface limit", size.height))
    })?;
    Ok((w, h))
}

/// Top-to-bottom linear gradient through `stops`, evenly spaced, clamped at both ends.
///
/// Interpolation happens in straight alpha; the result is premultiplied RGBA8.
fn vertical_gradient_premul(stops: &[Argb], width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0u8; (width as usize).saturating_mul(height as usize).saturating_mul(4)];
    let row_len = (width as usize) * 4;
    for y in 0..height {
        let t = ((f64::from(y) + 0.5) / f64::from(height.max(1))).clamp(0.0, 1.0);
        let c = premul_rgba8(sample_stops(stops, t));
        let row = &mut bytes[(y as usize) * row_len..(y as usize + 1) * row_len];
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
    }
    bytes
}

fn sample_stops(stops: &[Argb], t: f64) -> [u8; 4] {
    match stops {
        [] => [0, 0, 0, 0],
        [only] => only.to_rgba8(),
        _ => {
            let segments = (stops.len() - 1) as f64;
            let pos = t.clamp(0.0, 1.0) * segments;
            let i = (pos.floor() as usize).min(stops.len() - 2);
            let f = pos - i as f64;
            let a = stops[i].to_rgba8();
            let b = stops[i + 1].to_rgba8();
            let lerp = |a: u8, b: u8| -> u8 {
                let af = f64::from(a);
                let bf = f64::from(b);
                (af + (bf - af) * f).round().clamp(0.0, 255.0) as u8
            };
            [
                lerp(a[0], b[0]),
                lerp(a[1], b[1]),
                lerp(a[2], b[2]),
                lerp(a[3], b[3]),
            ]
        }
    }
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> LayerResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(Size::new(width, height))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(LayerError::geometry("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> LayerResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/raster/cpu.rs"]
mod tests;
