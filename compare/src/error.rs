//! Errors produced while searching the index.

use thiserror::Error;

/// Errors produced by [`crate::search`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A requested bucket does not exist in the index.
    #[error(transparent)]
    Index(#[from] index::Error),
}
