//! Errors surfaced by the orchestrator, distinguishing recoverable user
//! errors (exit code 1) from everything else.

use thiserror::Error;

/// Errors produced while running the `dupe`, `search`, or `database`
/// operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No buckets were named on the command line and the store holds none
    /// either.
    #[error("no buckets given and the store is empty")]
    NoArgs,

    /// `--fast` was requested against a bucket that has never been scanned.
    #[error("fast flag cannot be used: bucket {0} has never been scanned")]
    FastModeRefused(index::BucketName),

    /// The check path is neither a file nor a directory.
    #[error("check path {0:?} is not a file or directory")]
    InvalidCheckPath(std::path::PathBuf),

    /// A destructive operation needs confirmation before proceeding.
    #[error("confirmation required: {0}")]
    ConfirmationRequired(String),

    /// An error from the index store.
    #[error(transparent)]
    Index(#[from] index::Error),

    /// An error from the scanner.
    #[error(transparent)]
    Scanner(#[from] scanner::Error),

    /// An error from the comparison engine.
    #[error(transparent)]
    Compare(#[from] compare::Error),

    /// An error from the cleanup engine.
    #[error(transparent)]
    Cleanup(#[from] cleanup::Error),

    /// A filesystem operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

impl Error {
    /// Whether refusing to proceed without confirmation is itself the
    /// expected outcome here: a clean exit with code `0`, not a failure.
    pub fn is_confirmation_refusal(&self) -> bool {
        matches!(
            self,
            Error::ConfirmationRequired(_) | Error::Index(index::Error::ConfirmationRequired(_))
        )
    }

    /// Whether this error is a recoverable user error (exit code `1`) rather
    /// than an unexpected failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::NoArgs
                | Error::FastModeRefused(_)
                | Error::InvalidCheckPath(_)
                | Error::Index(index::Error::BucketNotFound(_))
                | Error::Index(index::Error::BucketEmpty(_))
                | Error::Index(index::Error::SameName(_))
        )
    }
}
