//! Errors produced by the cleanup operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by [`crate::remove_duplicates`], [`crate::clean_empty`]
/// and [`crate::sweep_non_executables`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// `sweep_non_executables` was called without `assume_yes` and needs the
    /// caller to confirm before any directory is removed.
    #[error("confirmation required before sweeping {0:?}")]
    ConfirmationRequired(PathBuf),

    /// A filesystem operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// Hashing a source file failed.
    #[error(transparent)]
    Fingerprint(#[from] fingerprint::Error),
}
