//! Multi-layer rendering: parallel rasterization, frame anchoring and overlay merging.

pub(crate) mod anchor;
pub(crate) mod merge;
pub(crate) mod overlay;
pub(crate) mod pipeline;
