use crate::foundation::core::{Offset, Size};
use crate::foundation::error::{LayerError, LayerResult};
use crate::foundation::math::round_half_up;
use crate::layer::color::Argb;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Region of a layer's bounding box that receives paint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClipShape {
    /// Ellipse inscribed in the bounding box.
    Circle,
    /// The whole bounding box (no clipping).
    #[default]
    Rectangle,
    /// Rectangle with independent corner radii in pixels.
    RoundedRectangle {
        /// Top-left corner radius.
        top_left: u32,
        /// Top-right corner radius.
        top_right: u32,
        /// Bottom-right corner radius.
        bottom_right: u32,
        /// Bottom-left corner radius.
        bottom_left: u32,
    },
}

impl ClipShape {
    /// Rounded rectangle with the same radius on every corner.
    pub const fn rounded(radius: u32) -> Self {
        Self::RoundedRectangle {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    pub(crate) fn scaled(self, scale: f64) -> Self {
        match self {
            Self::Circle | Self::Rectangle => self,
            Self::RoundedRectangle {
                top_left,
                top_right,
                bottom_right,
                bottom_left,
            } => {
                let s = |r: u32| Size::square(r).scaled(scale).width;
                Self::RoundedRectangle {
                    top_left: s(top_left),
                    top_right: s(top_right),
                    bottom_right: s(bottom_right),
                    bottom_left: s(bottom_left),
                }
            }
        }
    }
}

/// Drop shadow description attached to a [`ShapeLayer`].
///
/// Shadows are carried through the pipeline (including scaling) but are not rasterized.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShadowDef", into = "ShadowDef")]
pub struct Shadow {
    relative_offset: Offset,
    clip_shape: ClipShape,
    color: Argb,
    blur_radius: f32,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct ShadowDef {
    relative_offset: Offset,
    #[serde(default)]
    clip_shape: ClipShape,
    color: Argb,
    #[serde(default)]
    blur_radius: f32,
}

impl Shadow {
    /// Create a validated shadow; `blur_radius` must be finite and `>= 0`.
    pub fn new(
        relative_offset: Offset,
        clip_shape: ClipShape,
        color: Argb,
        blur_radius: f32,
    ) -> LayerResult<Self> {
        if !blur_radius.is_finite() || blur_radius < 0.0 {
            return Err(LayerError::validation(
                "shadow blur_radius must be finite and >= 0",
            ));
        }
        Ok(Self {
            relative_offset,
            clip_shape,
            color,
            blur_radius,
        })
    }

    /// Offset of the shadow relative to its layer.
    pub fn relative_offset(&self) -> Offset {
        self.relative_offset
    }

    /// Shape of the shadow.
    pub fn clip_shape(&self) -> ClipShape {
        self.clip_shape
    }

    /// Shadow color.
    pub fn color(&self) -> Argb {
        self.color
    }

    /// Blur radius in pixels.
    pub fn blur_radius(&self) -> f32 {
        self.blur_radius
    }

    pub(crate) fn scaled(self, scale: f64) -> Self {
        Self {
            relative_offset: self.relative_offset.scaled(scale),
            clip_shape: self.clip_shape.scaled(scale),
            color: self.color,
            blur_radius: (f64::from(self.blur_radius) * scale) as f32,
        }
    }
}

impl TryFrom<ShadowDef> for Shadow {
    type Error = LayerError;

    fn try_from(def: ShadowDef) -> LayerResult<Self> {
        Self::new(def.relative_offset, def.clip_shape, def.color, def.blur_radius)
    }
}

impl From<Shadow> for ShadowDef {
    fn from(s: Shadow) -> Self {
        Self {
            relative_offset: s.relative_offset,
            clip_shape: s.clip_shape,
            color: s.color,
            blur_radius: s.blur_radius,
        }
    }
}

/// A filled shape: one color paints solid, several paint a top-to-bottom linear gradient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShapeLayerDef", into = "ShapeLayerDef")]
pub struct ShapeLayer {
    pub(crate) offset: Offset,
    pub(crate) size: Size,
    colors: Vec<Argb>,
    clip_shape: ClipShape,
    shadow: Option<Shadow>,
}

#[derive(Clone, Serialize, Deserialize)]
struct ShapeLayerDef {
    offset: Offset,
    size: Size,
    colors: Vec<Argb>,
    #[serde(default)]
    clip_shape: ClipShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shadow: Option<Shadow>,
}

impl ShapeLayer {
    /// Create a shape layer. `colors` must contain at least one entry.
    pub fn new(
        offset: Offset,
        size: Size,
        colors: Vec<Argb>,
        clip_shape: ClipShape,
    ) -> LayerResult<Self> {
        if colors.is_empty() {
            return Err(LayerError::validation(
                "shape layer color list must contain at least one color",
            ));
        }
        Ok(Self {
            offset,
            size,
            colors,
            clip_shape,
            shadow: None,
        })
    }

    /// Create a single-color shape layer.
    pub fn solid_color(offset: Offset, size: Size, color: Argb, clip_shape: ClipShape) -> Self {
        Self {
            offset,
            size,
            colors: vec![color],
            clip_shape,
            shadow: None,
        }
    }

    /// Attach a drop shadow.
    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// Position within the reference frame.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Bounding box size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Fill colors in gradient order (never empty).
    pub fn colors(&self) -> &[Argb] {
        &self.colors
    }

    /// Clip shape applied to the fill.
    pub fn clip_shape(&self) -> ClipShape {
        self.clip_shape
    }

    /// Optional drop shadow.
    pub fn shadow(&self) -> Option<&Shadow> {
        self.shadow.as_ref()
    }

    pub(crate) fn scaled(&self, scale: f64) -> Self {
        Self {
            offset: self.offset.scaled(scale),
            size: self.size.scaled(scale),
            colors: self.colors.clone(),
            clip_shape: self.clip_shape.scaled(scale),
            shadow: self.shadow.map(|s| s.scaled(scale)),
        }
    }
}

impl TryFrom<ShapeLayerDef> for ShapeLayer {
    type Error = LayerError;

    fn try_from(def: ShapeLayerDef) -> LayerResult<Self> {
        let mut layer = Self::new(def.offset, def.size, def.colors, def.clip_shape)?;
        layer.shadow = def.shadow;
        Ok(layer)
    }
}

impl From<ShapeLayer> for ShapeLayerDef {
    fn from(l: ShapeLayer) -> Self {
        Self {
            offset: l.offset,
            size: l.size,
            colors: l.colors,
            clip_shape: l.clip_shape,
            shadow: l.shadow,
        }
    }
}

/// Plain text laid out from the top-left of its box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "TextLayerDef")]
pub struct TextLayer {
    /// Position within the reference frame.
    pub offset: Offset,
    /// Layout box size; text wraps at `size.width`.
    pub size: Size,
    /// Text content.
    pub text: String,
    /// Fill color.
    pub color: Argb,
    /// Authored line height in pixels.
    pub line_height: u32,
    /// Glyph size in pixels.
    pub font_size: u32,
}

#[derive(Deserialize)]
struct TextLayerDef {
    offset: Offset,
    size: Size,
    text: String,
    color: Argb,
    line_height: u32,
    #[serde(default)]
    font_size: Option<u32>,
}

impl TextLayer {
    /// Create a text layer whose font size is derived from `line_height`.
    pub fn new(
        offset: Offset,
        size: Size,
        text: impl Into<String>,
        color: Argb,
        line_height: u32,
    ) -> Self {
        Self {
            offset,
            size,
            text: text.into(),
            color,
            line_height,
            font_size: default_font_size(line_height),
        }
    }

    /// Override the derived font size.
    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    pub(crate) fn scaled(&self, scale: f64) -> Self {
        Self {
            offset: self.offset.scaled(scale),
            size: self.size.scaled(scale),
            text: self.text.clone(),
            color: self.color,
            line_height: Size::square(self.line_height).scaled(scale).width,
            font_size: Size::square(self.font_size).scaled(scale).width,
        }
    }
}

impl From<TextLayerDef> for TextLayer {
    fn from(def: TextLayerDef) -> Self {
        Self {
            offset: def.offset,
            size: def.size,
            text: def.text,
            color: def.color,
            line_height: def.line_height,
            font_size: def
                .font_size
                .unwrap_or_else(|| default_font_size(def.line_height)),
        }
    }
}

/// Font size used when only a line height is authored: `line_height / 1.3`, rounded half up.
pub fn default_font_size(line_height: u32) -> u32 {
    round_half_up(f64::from(line_height) / 1.3) as u32
}

/// One piece of declarative visual content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    /// Filled shape.
    Shape(ShapeLayer),
    /// Text block.
    Text(TextLayer),
}

impl Layer {
    /// Position within the reference frame.
    pub fn offset(&self) -> Offset {
        match self {
            Self::Shape(s) => s.offset,
            Self::Text(t) => t.offset,
        }
    }

    /// Bounding box size.
    pub fn size(&self) -> Size {
        match self {
            Self::Shape(s) => s.size,
            Self::Text(t) => t.size,
        }
    }

    /// Short variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Shape(_) => "shape",
            Self::Text(_) => "text",
        }
    }
}

impl From<ShapeLayer> for Layer {
    fn from(l: ShapeLayer) -> Self {
        Self::Shape(l)
    }
}

impl From<TextLayer> for Layer {
    fn from(l: TextLayer) -> Self {
        Self::Text(l)
    }
}

/// Ordered layers; index order is paint order and matches output order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerCollection {
    layers: Vec<Layer>,
}

impl LayerCollection {
    /// Wrap an ordered list of layers.
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Borrow the layers in paint order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Return `true` when there are no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterate layers in paint order.
    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    /// Parse a layer document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LayerResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LayerError::serde(format!("parse layer collection JSON: {e}")))
    }

    /// Parse a layer document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LayerResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LayerError::validation(format!("open layer JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Write the document as pretty-printed JSON.
    pub fn to_writer_pretty<W: std::io::Write>(&self, w: W) -> LayerResult<()> {
        serde_json::to_writer_pretty(w, self)
            .map_err(|e| LayerError::serde(format!("write layer collection JSON: {e}")))
    }
}

impl FromIterator<Layer> for LayerCollection {
    fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LayerCollection {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/model.rs"]
mod tests;
