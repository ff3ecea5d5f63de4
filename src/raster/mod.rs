//! Single-layer CPU rasterization.

pub(crate) mod alpha;
pub(crate) mod bitmap;
pub(crate) mod cpu;
pub(crate) mod text;
