/// Result alias used across the crate.
pub type MorphResult<T> = Result<T, MorphError>;

/// Errors produced while loading inputs, warping, or persisting frames.
#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    /// Inputs are well-formed but unusable (degenerate features, mismatched counts, bad params).
    #[error("validation error: {0}")]
    Validation(String),

    /// A config or line-editor file could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// An image could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),

    /// Filesystem failure, with the operation that was attempted.
    #[error("io error: {context}: {source}")]
    Io {
        /// What was being done when the error happened.
        context: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Anything else, carried with its original context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MorphError {
    /// Build a [`MorphError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MorphError::Parse`].
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`MorphError::Codec`].
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Prefix the message of a validation or parse error with `context` (a file, line number or
    /// feature index). Other kinds are returned unchanged.
    pub fn with_context(self, context: impl std::fmt::Display) -> Self {
        match self {
            Self::Validation(msg) => Self::Validation(format!("{context}: {msg}")),
            Self::Parse(msg) => Self::Parse(format!("{context}: {msg}")),
            other => other,
        }
    }

    /// Build a [`MorphError::Io`].
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
