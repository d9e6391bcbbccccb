/// Convenience result type used across snapcard.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by the card engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid template or caller-provided input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while decoding image bytes or data URIs.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors raised while drawing onto a surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
