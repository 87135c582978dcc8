//! Destructive post-processing: removing confirmed duplicates, pruning
//! directories left empty by that removal, and sweeping non-executable
//! directories in a `--sensen` pass.
//!
//! Every operation takes a `test` flag; when `true` the same report is
//! produced but no filesystem mutation happens, only a logged no-op, so the
//! caller has one code path to exercise for both real and dry-run modes.

use std::fs;
use std::path::{Path, PathBuf};

use scanner::ComparisonMap;

use crate::error::Error;

/// For each path in `sources`, look up its digest in `compare`; if it is
/// already recorded under a *different* path, unlink `source`. Sources that
/// no longer exist are skipped silently. Returns the set of paths removed
/// (or that would have been removed, under `test`).
pub fn remove_duplicates(
    sources: &[PathBuf],
    compare: &ComparisonMap,
    test: bool,
) -> Result<Vec<PathBuf>, Error> {
    let mut removed = Vec::new();
    for source in sources {
        if !source.exists() {
            continue;
        }

        let digest = fingerprint::hash_file(source)?;
        let Some(stored) = compare.lookup_one(&digest) else {
            continue;
        };
        if stored == source.as_path() {
            continue;
        }

        log::info!("removing duplicate {source:?} (kept {stored:?})");
        if test {
            log::info!("[test] would remove {source:?}");
        } else {
            fs::remove_file(source)?;
        }
        removed.push(source.clone());
    }
    Ok(removed)
}

/// Post-order walk of `root`, removing any directory with zero entries. A
/// directory holding only hidden files is not empty. Bounded to directories
/// under (and including) `root`.
pub fn clean_empty(root: &Path, test: bool) -> Result<Vec<PathBuf>, Error> {
    let mut removed = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .contents_first(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        let empty = fs::read_dir(path)?.next().is_none();
        if !empty {
            continue;
        }

        log::info!("removing empty directory {path:?}");
        if test {
            log::info!("[test] would remove {path:?}");
        } else {
            fs::remove_dir(path)?;
        }
        removed.push(path.to_owned());
    }
    Ok(removed)
}

/// For each immediate subdirectory of `root`, remove it entirely unless it
/// contains at least one file whose extension is `.com` or `.exe`
/// (case-insensitive), anywhere below it. Requires `assume_yes`, since this
/// is a single irreversible sweep over everything under `root`; without it,
/// returns [`Error::ConfirmationRequired`] so the caller can prompt and
/// retry with `assume_yes = true`.
pub fn sweep_non_executables(
    root: &Path,
    assume_yes: bool,
    test: bool,
) -> Result<Vec<PathBuf>, Error> {
    if !assume_yes {
        return Err(Error::ConfirmationRequired(root.to_owned()));
    }

    let mut removed = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if contains_executable(&path) {
            continue;
        }

        log::info!("sweeping {path:?}");
        if test {
            log::info!("[test] would remove {path:?}");
        } else {
            fs::remove_dir_all(&path)?;
        }
        removed.push(path);
    }
    Ok(removed)
}

fn contains_executable(dir: &Path) -> bool {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .any(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| {
                        let ext = ext.to_string_lossy().to_ascii_lowercase();
                        ext == "com" || ext == "exe"
                    })
                    .unwrap_or(false)
        })
}
