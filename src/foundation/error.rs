/// Convenience result type used across Quire.
pub type QuireResult<T> = Result<T, QuireError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only input and environment failures surface here. Precondition violations on the layer and
/// ruler operations (nothing selected, layer order locked) are normal UI states and are reported
/// as `false`/`None` plus a debug log instead.
#[derive(thiserror::Error, Debug)]
pub enum QuireError {
    /// Invalid caller-provided options, objects or documents.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed or unusable vector template input.
    #[error("ingest error: {0}")]
    Ingest(String),

    /// A font family could not be resolved or loaded.
    #[error("font error: {0}")]
    Font(String),

    /// The drawing surface is gone or failed to render.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors when serializing or deserializing persisted documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuireError {
    /// Build a [`QuireError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QuireError::Ingest`] value.
    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest(msg.into())
    }

    /// Build a [`QuireError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`QuireError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`QuireError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
