use crate::path::PathError;

/// Result alias used across the crate.
pub type HypnaResult<T> = Result<T, HypnaError>;

/// Top-level error type.
///
/// Migration and validation never produce errors for bad *data*; these variants cover
/// programmer errors (paths built against the wrong shape) and serialization failures.
#[derive(thiserror::Error, Debug)]
pub enum HypnaError {
    /// Structural conflict or syntax error in a dotted path.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// A schema did not satisfy the current contract where one was required.
    #[error("validation error: {0}")]
    Validation(String),

    /// Migration could not produce a typed schema.
    #[error("migration error: {0}")]
    Migration(String),

    /// Timeline construction or interpolation failed.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// JSON encode/decode failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HypnaError {
    /// Build a [`HypnaError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HypnaError::Migration`].
    pub fn migration(msg: impl Into<String>) -> Self {
        Self::Migration(msg.into())
    }

    /// Build a [`HypnaError::Timeline`].
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build a [`HypnaError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for HypnaError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
