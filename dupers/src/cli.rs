//! Command-line surface. Parses arguments into plain data; contains no
//! algorithm of its own, only the shape of the interface described in
//! the external-interfaces section of the design.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use getset::CopyGetters;
use index::BucketName;

/// A content-addressed duplicate-file detector and filename search tool.
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Cli {
    /// The operation to run.
    #[clap(subcommand)]
    pub command: Command,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Copy, Default, CopyGetters)]
pub struct Common {
    /// Suppress progress and status output.
    #[clap(long, short)]
    #[getset(get_copy = "pub")]
    quiet: bool,

    /// Emit diagnostic lines prefixed `∙`.
    #[clap(long)]
    #[getset(get_copy = "pub")]
    debug: bool,

    /// Disable ANSI color.
    #[clap(long, short)]
    #[getset(get_copy = "pub")]
    mono: bool,

    /// Skip confirmation prompts.
    #[clap(long, short)]
    #[getset(get_copy = "pub")]
    yes: bool,
}

impl From<Common> for crate::context::Common {
    fn from(common: Common) -> Self {
        Self {
            quiet: common.quiet,
            debug: common.debug,
            mono: common.mono,
            yes: common.yes,
        }
    }
}

/// The path to the index store, shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Store {
    /// Path to the index database file.
    #[clap(long, global = true, default_value = "dupers.redb")]
    pub db: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find files under a path that duplicate already-indexed content.
    Dupe(DupeArgs),

    /// Search indexed paths or filenames for a substring.
    Search(SearchArgs),

    /// Operate on the index store itself.
    #[clap(subcommand)]
    Database(DbCommand),
}

#[derive(Args, Debug)]
pub struct DupeArgs {
    /// The index store to operate on.
    #[clap(flatten)]
    pub store: Store,

    /// Flags shared by every subcommand.
    #[clap(flatten)]
    pub common: Common,

    /// The file or directory to check for duplicates.
    pub check_path: PathBuf,

    /// The indexed directories to compare against. Every known bucket, if
    /// none are given.
    pub buckets: Vec<PathBuf>,

    /// Skip the filesystem scan and answer from the existing index only.
    #[clap(long, short)]
    pub fast: bool,

    /// After matching, unlink duplicate sources.
    #[clap(long)]
    pub delete: bool,

    /// `--delete`, plus prune empty directories left behind.
    #[clap(long = "delete+")]
    pub delete_plus: bool,

    /// `--delete+`, plus keep only directories holding `.com`/`.exe`.
    #[clap(long)]
    pub sensen: bool,
}

impl DupeArgs {
    /// The delete mode implied by the flag combination the user passed.
    pub fn delete_mode(&self) -> crate::context::DeleteMode {
        use crate::context::DeleteMode;
        if self.sensen {
            DeleteMode::Sensen
        } else if self.delete_plus {
            DeleteMode::DeletePlus
        } else if self.delete {
            DeleteMode::Delete
        } else {
            DeleteMode::None
        }
    }
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// The index store to operate on.
    #[clap(flatten)]
    pub store: Store,

    /// Flags shared by every subcommand.
    #[clap(flatten)]
    pub common: Common,

    /// The substring to search for.
    pub term: String,

    /// The buckets to search. Every known bucket, if none are given.
    pub buckets: Vec<PathBuf>,

    /// Case-sensitive search.
    #[clap(long, short)]
    pub exact: bool,

    /// Search basenames only.
    #[clap(long, short)]
    pub name: bool,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Copy the store to a timestamped backup.
    Backup(StoreArgs),
    /// Remove stale entries (paths no longer on disk).
    Clean(BucketScopedArgs),
    /// List buckets, or entries within one.
    Ls(OptionalBucketArgs),
    /// Scan a directory into a bucket, archives hashed as opaque files.
    Up(TargetArgs),
    /// Scan a directory into a bucket, expanding supported archives.
    #[clap(name = "up+")]
    UpPlus(TargetArgs),
    /// Remove a bucket and all its entries.
    Rm(BucketArgs),
    /// Rename a bucket.
    Mv(RenameArgs),
    /// Export a bucket to CSV.
    Export(BucketArgs),
    /// Import a bucket from CSV.
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct StoreArgs {
    /// The index store to operate on.
    #[clap(flatten)]
    pub store: Store,
    /// Flags shared by every subcommand.
    #[clap(flatten)]
    pub common: Common,
}

#[derive(Args, Debug)]
pub struct BucketScopedArgs {
    /// The index store to operate on.
    #[clap(flatten)]
    pub store: Store,
    /// Flags shared by every subcommand.
    #[clap(flatten)]
    pub common: Common,
    /// Restrict to these buckets. Every bucket, if none are given.
    pub buckets: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OptionalBucketArgs {
    /// The index store to operate on.
    #[clap(flatten)]
    pub store: Store,
    /// Flags shared by every subcommand.
    #[clap(flatten)]
    pub common: Common,
    /// The bucket to list entries of. Lists every bucket name, if omitted.
    pub bucket: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// The index store to operate on.
    #[clap(flatten)]
    pub store: Store,
    /// Flags shared by every subcommand.
    #[clap(flatten)]
    pub common: Common,
    /// The directory to scan into a bucket.
    pub target: PathBuf,
}

#[derive(Args, Debug)]
pub struct BucketArgs {
    /// The index store to operate on.
    #[clap(flatten)]
    pub store: Store,
    /// Flags shared by every subcommand.
    #[clap(flatten)]
    pub common: Common,
    /// The bucket to operate on.
    pub bucket: PathBuf,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// The index store to operate on.
    #[clap(flatten)]
    pub store: Store,
    /// Flags shared by every subcommand.
    #[clap(flatten)]
    pub common: Common,
    /// The existing bucket name.
    pub old: PathBuf,
    /// The new bucket name.
    pub new: PathBuf,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// The index store to operate on.
    #[clap(flatten)]
    pub store: Store,
    /// Flags shared by every subcommand.
    #[clap(flatten)]
    pub common: Common,
    /// The CSV file to import.
    pub path: PathBuf,
}

/// Resolve a list of CLI path arguments into bucket names.
pub fn as_buckets(paths: &[PathBuf]) -> Vec<BucketName> {
    paths.iter().map(|path| BucketName::normalise(path)).collect()
}
