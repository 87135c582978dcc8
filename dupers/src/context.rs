//! The explicit context threaded through the `dupe` state machine, replacing
//! a single shared mutable configuration object with a small value passed by
//! reference between plain functions.

use index::BucketName;

/// Flags shared by every top-level operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Common {
    /// Suppress progress and status output.
    pub quiet: bool,
    /// Emit diagnostic lines.
    pub debug: bool,
    /// Disable ANSI color.
    pub mono: bool,
    /// Skip confirmation prompts.
    pub yes: bool,
}

/// How aggressively the `dupe` command removes what it finds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Matches are only reported.
    #[default]
    None,
    /// Unlink duplicate sources.
    Delete,
    /// Unlink duplicate sources, then prune empty bucket directories.
    DeletePlus,
    /// Unlink duplicate sources, sweep non-executable directories, then
    /// prune empty bucket directories.
    Sensen,
}

/// The parameters of one `dupe` invocation, resolved progressively as the
/// state machine advances.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Buckets named on the command line, before resolution against the
    /// store (empty means "every bucket the store knows about").
    pub requested_buckets: Vec<BucketName>,
    /// The check path: a file or directory whose contents are compared
    /// against the index, but never indexed themselves.
    pub check_path: std::path::PathBuf,
    /// Answer from the existing index only, without walking the filesystem.
    pub fast: bool,
    /// Cleanup aggressiveness requested for this run.
    pub delete: DeleteMode,
    /// Flags shared with every other operation.
    pub common: Common,
}
