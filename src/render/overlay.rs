use crate::foundation::core::{Offset, Size};
use crate::raster::bitmap::Bitmap;
use crate::render::anchor::FrameAnchor;

/// A rasterized layer plus its placement, ready for video compositing.
#[derive(Clone, Debug, PartialEq)]
pub struct BitmapOverlay {
    /// Rendered pixels.
    pub bitmap: Bitmap,
    /// Pixel offset of the bitmap's top-left corner within the output frame.
    pub offset: Offset,
    /// NDC anchor derived from `offset` and the bitmap size.
    pub anchor: FrameAnchor,
}

/// Handle to a texture owned by the composition engine.
///
/// Its pixels never pass through this crate, so it cannot be flattened on the CPU.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureRef {
    /// Engine-assigned identifier.
    pub id: u64,
    /// Texture dimensions.
    pub size: Size,
}

/// Any overlay the composition engine accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum TextureOverlay {
    /// CPU bitmap with an NDC anchor.
    Bitmap(BitmapOverlay),
    /// Engine-owned texture.
    Texture(TextureRef),
}

impl TextureOverlay {
    /// Short variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bitmap(_) => "bitmap",
            Self::Texture(_) => "texture",
        }
    }
}

impl From<BitmapOverlay> for TextureOverlay {
    fn from(o: BitmapOverlay) -> Self {
        Self::Bitmap(o)
    }
}
