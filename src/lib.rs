//! Layerframe rasterizes declarative visual layers into video overlays.
//!
//! A [`LayerCollection`] of shapes, gradients and text is authored against a reference frame.
//! The pipeline:
//!
//! - Cover-scales every layer to the output frame ([`adjust_for_frame`])
//! - Rasterizes all layers in parallel on the CPU, keeping input order ([`adjust_and_rasterize`])
//! - Anchors each bitmap in normalized device coordinates ([`calculate_frame_anchor`])
//! - Optionally flattens the overlays into one bitmap ([`merge_overlays`])
//!
//! Video composition itself is delegated to a [`CompositionEngine`] through [`export_video`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod encode;
pub(crate) mod layer;
pub(crate) mod raster;
pub(crate) mod render;

pub use crate::foundation::core::{BezPath, Offset, Rect, Size};
pub use crate::foundation::error::{LayerError, LayerResult};

pub use crate::encode::engine::{
    AudioDurationProbe, CompositionEngine, CompositionRequest, EXPORT_FRAME_RATE, ExportRequest,
    ExportSetting, ExportStatus, FixedDurationProbe, InMemoryEngine, export_variants, export_video,
};
pub use crate::layer::color::Argb;
pub use crate::layer::model::{
    ClipShape, Layer, LayerCollection, Shadow, ShapeLayer, TextLayer, default_font_size,
};
pub use crate::layer::scale::{adjust_for_frame, adjust_layers, cover_scale};
pub use crate::raster::alpha::{ALPHA_BOOST, VISIBILITY_ALPHA, normalize_alpha};
pub use crate::raster::bitmap::Bitmap;
pub use crate::raster::cpu::{RasterOpts, Rasterizer};
pub use crate::raster::text::FontSource;
pub use crate::render::anchor::{FrameAnchor, calculate_frame_anchor};
pub use crate::render::merge::merge_overlays;
pub use crate::render::overlay::{BitmapOverlay, TextureOverlay, TextureRef};
pub use crate::render::pipeline::{
    CancelToken, PipelineOpts, RenderThreading, adjust_and_rasterize,
    adjust_and_rasterize_bitmaps, process_layers, rasterize,
};
