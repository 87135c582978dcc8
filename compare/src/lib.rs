//! Duplicate lookup and filename search over an [`index::Handle`].

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

mod error;
mod search;

pub use error::Error;
pub use search::{highlight, lookup_one, search};
