//! Guarded destructive cleanup: duplicate removal, empty-directory pruning,
//! and sweeping directories with no executable payload.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

mod error;
mod ops;

pub use error::Error;
pub use ops::{clean_empty, remove_duplicates, sweep_non_executables};
