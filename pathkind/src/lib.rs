//! Path absolutisation and the filesystem skip rules shared by the scanner
//! and cleanup engines.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

use std::env;
use std::path::{Path, PathBuf};

use walkdir::DirEntry;

/// Directory names that are always skipped, compared case-insensitively.
const SKIP_DIR_NAMES: &[&str] = &[
    ".git",
    ".cache",
    ".config",
    ".local",
    "node_modules",
    "__macosx",
    "appdata",
];

/// File names that are always skipped, compared case-insensitively.
const SKIP_FILE_NAMES: &[&str] = &[
    ".ds_store",
    ".trashes",
    "desktop.ini",
    "hiberfil.sys",
    "ntuser.dat",
    "pagefile.sys",
    "swapfile.sys",
    "thumbs.db",
];

/// The syntactic absolutisation of a path, plus whether it could be confirmed
/// to exist on disk. Callers decide whether a nonexistent path is fatal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Absolute {
    /// The absolute form of the path.
    pub path: PathBuf,
    /// Whether the path could be confirmed to exist on disk.
    pub existed: bool,
}

/// Resolve `path` to its OS-absolute form.
///
/// If `path` is already absolute it is used as-is (after lexical cleanup of `.`
/// and `..` components); otherwise it is joined onto the current directory.
/// This never fails on a nonexistent path: existence is reported separately via
/// [`Absolute::existed`] so callers can decide whether that's fatal.
pub fn absolutise(path: &Path) -> Absolute {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .unwrap_or_default()
            .join(path)
    };
    let cleaned = clean(&joined);
    let existed = cleaned.try_exists().unwrap_or(false);
    Absolute {
        path: cleaned,
        existed,
    }
}

/// Lexically normalise a path: collapse `.` components and resolve `..`
/// against preceding components without touching the filesystem.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        use std::path::Component::*;
        match component {
            CurDir => {}
            ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// The classification of a directory entry encountered while walking.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Classification {
    /// A directory that should be pruned from the walk.
    SkipDir,
    /// A file that should be ignored.
    SkipFile,
    /// A regular file eligible for hashing.
    Regular,
    /// Anything else: symlinks, devices, sockets, etc.
    Other,
}

/// Classify a walked directory entry according to the skip rules.
///
/// Directories named exactly (case-insensitively) one of a fixed denylist, or
/// starting with `.` (and, on Windows, `$`), are [`Classification::SkipDir`].
/// Files named (case-insensitively) one of a fixed denylist, or starting with
/// `._` (macOS resource forks), are [`Classification::SkipFile`]. Non-regular
/// entries (symlinks, devices, sockets) are [`Classification::Other`].
pub fn classify(entry: &DirEntry) -> Classification {
    let name = entry.file_name().to_string_lossy();

    if entry.file_type().is_dir() {
        let lower = name.to_lowercase();
        if SKIP_DIR_NAMES.contains(&lower.as_str()) {
            return Classification::SkipDir;
        }
        if name.starts_with('.') {
            return Classification::SkipDir;
        }
        if cfg!(windows) && name.starts_with('$') {
            return Classification::SkipDir;
        }
        return Classification::Other;
    }

    if entry.file_type().is_file() {
        let lower = name.to_lowercase();
        if SKIP_FILE_NAMES.contains(&lower.as_str()) {
            return Classification::SkipFile;
        }
        if name.starts_with("._") {
            return Classification::SkipFile;
        }
        return Classification::Regular;
    }

    Classification::Other
}
