//! Errors encountered while detecting or reading archives.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::Reason;

/// Errors encountered while reading an archive.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The file is not a container format this crate extracts.
    #[error("archive at {path:?} is not supported for extraction: {reason:?}")]
    Unsupported {
        /// The path that was rejected.
        path: PathBuf,
        /// Why it was rejected.
        reason: Reason,
    },

    /// The underlying decoder panicked while reading the archive. Treated as
    /// an unsupported archive rather than propagated, since a third-party
    /// decoder aborting mid-read must never tear down the scanner.
    #[error("archive decoder panicked while reading {path:?}")]
    DecoderPanic {
        /// The path being read when the panic occurred.
        path: PathBuf,
    },

    /// Generic IO error while reading the archive or its extracted contents.
    #[error("i/o error reading archive: {0}")]
    IO(#[from] io::Error),

    /// libarchive (via `compress_tools`) failed to extract the archive.
    #[error("libarchive extraction failed: {0}")]
    Libarchive(#[from] compress_tools::Error),

    /// Unable to walk the extracted archive's temporary directory.
    #[error("walk extracted archive: {0}")]
    Walk(#[from] walkdir::Error),
}
