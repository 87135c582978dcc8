//! A persistent, bucketed key-value index store backed by a single on-disk
//! file.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

mod bucket;
mod csvio;
mod error;
mod handle;

pub use bucket::BucketName;
pub use error::Error;
pub use handle::{resolve_targets, Handle};
