//! Contract with the external video composition engine.

pub(crate) mod engine;
