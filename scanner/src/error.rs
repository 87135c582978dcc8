//! Errors produced while walking a directory or archive tree.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by [`crate::Scanner`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The bucket root does not exist, or is not a directory.
    #[error("{0:?} is not an existing directory")]
    NotADirectory(PathBuf),

    /// Walking the tree hit an I/O error.
    #[error("i/o error while walking: {0}")]
    IO(#[from] io::Error),

    /// `walkdir` reported an error mid-traversal.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Hashing a file or archive entry failed.
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] fingerprint::Error),

    /// Reading a detected archive failed.
    #[error("archive error: {0}")]
    Archive(#[from] archive::Error),

    /// Storing an entry in the index failed.
    #[error("index error: {0}")]
    Index(#[from] index::Error),
}
