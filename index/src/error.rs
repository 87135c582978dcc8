//! Errors produced by the bucketed index store.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::BucketName;

/// Errors produced while operating on a [`crate::Handle`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An operation was attempted on a store that has not been opened.
    #[error("index store is not open")]
    NotOpen,

    /// The named bucket does not exist.
    #[error("bucket not found: {0}")]
    BucketNotFound(BucketName),

    /// The named bucket exists but contains no entries.
    #[error("bucket is empty: {0}")]
    BucketEmpty(BucketName),

    /// A rename was attempted where the source and destination bucket names
    /// are the same after normalisation.
    #[error("cannot rename bucket {0} to itself")]
    SameName(BucketName),

    /// `csv_import` would overwrite an existing bucket and `assume_yes` was
    /// not set; the caller must confirm with the user and retry.
    #[error("importing would overwrite existing bucket {0}; confirm and retry with assume_yes")]
    ConfirmationRequired(BucketName),

    /// The on-disk store is present but could not be read as a valid
    /// database.
    #[error("index store at {0:?} is corrupt: {1}")]
    Corrupt(PathBuf, String),

    /// Generic I/O failure reading or writing the store or a related file
    /// (backups, CSV import/export).
    #[error("i/o error: {0}")]
    IO(#[from] io::Error),

    /// A failure opening or reading the underlying redb database.
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// A failure within a redb transaction.
    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// A failure opening or operating on a redb table.
    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    /// A failure committing a redb transaction.
    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// A failure reading or writing a storage error from redb's storage layer.
    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    /// A malformed digest was encountered while reading a stored entry or a
    /// CSV row.
    #[error("invalid digest: {0}")]
    InvalidDigest(#[from] fingerprint::Error),

    /// A CSV row could not be parsed during `csv_import`.
    #[error("invalid csv row: {0}")]
    Csv(#[from] csv::Error),

    /// Compacting the store failed.
    #[error("compaction error: {0}")]
    Compaction(#[from] redb::CompactionError),
}
