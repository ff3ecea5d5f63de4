//! Declarative layer model and its geometry transforms.

pub(crate) mod color;
pub(crate) mod model;
pub(crate) mod scale;
pub(crate) mod shape;
