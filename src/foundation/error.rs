/// Convenience result type used across layerframe.
pub type LayerResult<T> = Result<T, LayerError>;

/// Top-level error taxonomy used by the rasterization pipeline.
#[derive(thiserror::Error, Debug)]
pub enum LayerError {
    /// Invalid user-provided layer or frame data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A layer whose geometry cannot be rasterized (degenerate size or clip, bad font metrics).
    #[error("invalid layer geometry: {0}")]
    InvalidLayerGeometry(String),

    /// An overlay kind that cannot be flattened on the CPU.
    #[error("unsupported overlay kind: {0}")]
    UnsupportedOverlayKind(String),

    /// A text layer has visible text but neither the configured font nor the system fonts can
    /// shape it.
    #[error("no usable font for text layer")]
    MissingFont,

    /// The enclosing render pass was cancelled.
    #[error("render cancelled")]
    Cancelled,

    /// The composition engine reported a failed export.
    #[error("export failed: {0}")]
    Export(String),

    /// Errors when serializing or deserializing layer documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayerError {
    /// Build a [`LayerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LayerError::InvalidLayerGeometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::InvalidLayerGeometry(msg.into())
    }

    /// Build a [`LayerError::UnsupportedOverlayKind`] value.
    pub fn unsupported_overlay(msg: impl Into<String>) -> Self {
        Self::UnsupportedOverlayKind(msg.into())
    }

    /// Build a [`LayerError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`LayerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
