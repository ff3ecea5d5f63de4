use crate::foundation::error::{LayerError, LayerResult};
use crate::layer::color::Argb;
use std::path::Path;
use std::sync::Arc;

/// Font bytes shared by every rasterizer built from the same options.
#[derive(Clone)]
pub struct FontSource {
    bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSource")
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl FontSource {
    /// Wrap raw TrueType/OpenType bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> LayerResult<Self> {
        if bytes.is_empty() {
            return Err(LayerError::validation("font bytes must be non-empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
        })
    }

    /// Read a font file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> LayerResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            LayerError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes)
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// RGBA8 brush color used by Parley text layout (straight alpha).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Argb> for TextBrushRgba8 {
    fn from(c: Argb) -> Self {
        Self {
            r: c.red(),
            g: c.green(),
            b: c.blue(),
            a: c.alpha(),
        }
    }
}

/// Stateful helper for building Parley text layouts.
///
/// Layouts use the registered [`FontSource`] when one is given and the system sans-serif family
/// otherwise. A registered font is added to the collection lazily on first use.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: Option<String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::new(),
            layout_ctx: parley::LayoutContext::new(),
            family_name: None,
        }
    }

    fn ensure_family(&mut self, font: &FontSource) -> LayerResult<String> {
        if let Some(name) = &self.family_name {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            LayerError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LayerError::validation("registered font family has no name"))?
            .to_string();
        self.family_name = Some(family_name.clone());
        Ok(family_name)
    }

    /// Shape and lay out plain text, wrapped at `max_width_px` and left-aligned.
    ///
    /// Line spacing is the font's natural line height (no extra multiplier). Visible text that
    /// produces no glyph runs means no usable font was found and is [`LayerError::MissingFont`].
    pub(crate) fn layout_plain(
        &mut self,
        text: &str,
        font: Option<&FontSource>,
        size_px: f32,
        brush: TextBrushRgba8,
        max_width_px: f32,
    ) -> LayerResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LayerError::geometry("text font size must be finite and > 0"));
        }

        let stack = match font {
            Some(font) => parley::style::FontStack::Source(std::borrow::Cow::Owned(
                self.ensure_family(font)?,
            )),
            None => parley::style::FontStack::from(parley::style::GenericFamily::SansSerif),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(stack));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(Some(max_width_px));
        layout.align(
            Some(max_width_px),
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        if !text.trim().is_empty() && !has_glyph_runs(&layout) {
            return Err(LayerError::MissingFont);
        }
        Ok(layout)
    }
}

fn has_glyph_runs(layout: &parley::Layout<TextBrushRgba8>) -> bool {
    layout.lines().any(|line| {
        line.items()
            .any(|item| matches!(item, parley::layout::PositionedLayoutItem::GlyphRun(_)))
    })
}
