//! Detects archive container formats and extracts them for scanning.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

mod error;
mod format;
mod reader;

pub use error::Error;
pub use format::{detect, sniff, Format, Reason};
pub use reader::{detect_file, Entry, Reader};
