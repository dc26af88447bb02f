/// Errors from essence store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The stored annotation value is not a valid serialized essence
    /// (corrupted or externally tampered).
    #[error("cannot parse stored essence under {key:?}: {reason}")]
    Parse { key: String, reason: String },

    /// The stored annotation decodes, but not to a mapping.
    #[error("stored essence under {key:?} is not a mapping")]
    NotAMapping { key: String },

    /// Serialization failure while encoding an essence.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
