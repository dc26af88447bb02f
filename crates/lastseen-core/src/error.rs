//! Error types for the change detection crate.

use lastseen_store::StoreError;

/// Errors that can occur during change detection.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Reading or staging the tracking annotation failed.
    #[error("essence store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for change detection results.
pub type CoreResult<T> = Result<T, CoreError>;
