/// Convenience result type used across svgfx.
pub type SvgfxResult<T> = Result<T, SvgfxError>;

/// Top-level error taxonomy.
///
/// Filter *execution* never surfaces these to callers (it degrades visually instead); they are
/// returned by intrinsics, filter document loading and the SVG engine adapter.
#[derive(thiserror::Error, Debug)]
pub enum SvgfxError {
    /// Invalid user-provided data (filter documents, parameters).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while executing an intrinsic or a filter node.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors reported by the SVG engine adapter (handles, parsing, rendering).
    #[error("engine error: {0}")]
    Engine(String),

    /// Errors when serializing or deserializing filter documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SvgfxError {
    /// Build a [`SvgfxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SvgfxError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`SvgfxError::Engine`] value.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }
}

impl From<serde_json::Error> for SvgfxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
