//! Walks directories and archives, hashing files and recording them in the
//! index store.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

mod compare_map;
mod error;
mod progress;
mod scan;

pub use compare_map::ComparisonMap;
pub use error::Error;
pub use progress::Progress;
pub use scan::{Scanner, ARCHIVE_ENTRY_SEPARATOR};
