//! The orchestrator: top-level operations (`dupe`, `search`, database
//! subcommands) composed from the leaf crates, plus the CLI surface and
//! presentation helpers that drive them.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod context;
mod error;
pub mod orchestrator;
pub mod presentation;

pub use error::Error;
