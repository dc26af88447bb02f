use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid field path {path:?}: {reason}")]
    InvalidFieldPath { path: String, reason: String },

    #[error("invalid body: {0}")]
    InvalidBody(String),
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
