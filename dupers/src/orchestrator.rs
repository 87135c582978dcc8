//! The `dupe` command as a sequence of plain functions threading an explicit
//! [`OperationContext`], one per named state of the
//! `Parsed -> BucketsResolved -> SourcesCollected -> Scanned -> Matched ->
//! Reported -> CleanedUp -> Terminated` pipeline. No step mutates shared
//! global state; each takes what it needs and returns what the next step
//! needs.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use fingerprint::Digest;
use index::{BucketName, Handle};
use scanner::{ComparisonMap, Scanner};

use crate::context::{Common, DeleteMode, OperationContext};
use crate::error::Error;

/// A duplicate found while matching sources against the compare map.
#[derive(Debug, Clone)]
pub struct Match {
    /// The source path that was hashed.
    pub source: PathBuf,
    /// The previously-indexed path sharing its digest.
    pub matched: PathBuf,
}

/// The full result of a `dupe` run: what matched, and what cleanup did.
#[derive(Debug, Default)]
pub struct DupeReport {
    /// Every duplicate found.
    pub matches: Vec<Match>,
    /// Paths removed by `remove_duplicates`, if cleanup ran.
    pub removed_duplicates: Vec<PathBuf>,
    /// Directories pruned by `clean_empty`, if cleanup ran.
    pub pruned_directories: Vec<PathBuf>,
    /// Directories swept by `sweep_non_executables`, if `--sensen` ran.
    pub swept_directories: Vec<PathBuf>,
}

/// `Parsed -> BucketsResolved`: `dupe` is a first-write path, not a read
/// path, so an unrecognised bucket name is not an error here — it is
/// created by the scan that follows. Buckets named on the command line are
/// taken as given; only when none were named do we fall back to the
/// store's existing buckets, refusing if the store has none either.
pub fn resolve_buckets(index: &Handle, ctx: &OperationContext) -> Result<Vec<BucketName>, Error> {
    if !ctx.requested_buckets.is_empty() {
        return Ok(ctx.requested_buckets.clone());
    }
    let existing = index.buckets()?;
    if existing.is_empty() {
        return Err(Error::NoArgs);
    }
    Ok(existing)
}

/// `BucketsResolved -> SourcesCollected`: turn the check path into a flat
/// list of source file paths, without indexing anything.
pub fn collect_sources(check_path: &Path) -> Result<Vec<PathBuf>, Error> {
    let absolute = pathkind::absolutise(check_path);
    if !absolute.existed {
        return Err(Error::InvalidCheckPath(check_path.to_owned()));
    }
    if absolute.path.is_file() {
        return Ok(vec![absolute.path]);
    }
    if !absolute.path.is_dir() {
        return Err(Error::InvalidCheckPath(check_path.to_owned()));
    }

    let mut sources = Vec::new();
    for entry in walkdir::WalkDir::new(&absolute.path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !matches!(pathkind::classify(entry), pathkind::Classification::SkipDir)
        })
        .filter_map(|entry| entry.ok())
    {
        if matches!(pathkind::classify(&entry), pathkind::Classification::Regular) {
            sources.push(entry.into_path());
        }
    }
    Ok(sources)
}

/// `SourcesCollected -> Scanned`, fast branch: load existing digests from
/// every resolved bucket into a fresh compare map without touching the
/// filesystem. Refuses if any named bucket has never been scanned.
pub fn load_fast(index: &Handle, buckets: &[BucketName]) -> Result<ComparisonMap, Error> {
    let mut compare = ComparisonMap::new();
    for bucket in buckets {
        if !index.exists(bucket)? {
            return Err(Error::FastModeRefused(bucket.clone()));
        }
        let entries = index.list(bucket)?;
        if entries.is_empty() {
            return Err(Error::FastModeRefused(bucket.clone()));
        }
        for (path, digest) in entries {
            compare.insert(digest, path);
        }
    }
    Ok(compare)
}

/// `SourcesCollected -> Scanned`, non-fast branch: drop stale entries from
/// every resolved bucket, then walk each bucket root, returning the
/// resulting compare map.
pub fn scan_buckets(
    index: &Handle,
    buckets: &[BucketName],
    skip: &HashSet<PathBuf>,
    common: &Common,
) -> Result<ComparisonMap, Error> {
    index.clean(Some(buckets), common.quiet, common.debug)?;

    let scanner = Scanner::new(index.clone());
    for bucket in buckets {
        scanner.walk_directory(Path::new(bucket.as_str()), skip)?;
    }
    Ok(scanner.compare_map())
}

/// `Scanned -> Matched`: hash every source and look it up in `compare`.
pub fn match_sources(sources: &[PathBuf], compare: &ComparisonMap) -> Result<Vec<Match>, Error> {
    let mut matches = Vec::new();
    for source in sources {
        let digest = fingerprint::hash_file(source)?;
        if digest == Digest::EMPTY {
            continue;
        }
        if let Some(matched) = compare.lookup_one(&digest) {
            matches.push(Match {
                source: source.clone(),
                matched: matched.to_owned(),
            });
        }
    }
    Ok(matches)
}

/// `Matched -> Reported`: render one line per match. Formatting only; the
/// caller decides whether to print it (respecting `--quiet`).
pub fn render_report(matches: &[Match]) -> String {
    if matches.is_empty() {
        return "no duplicates found".to_owned();
    }
    matches
        .iter()
        .map(|m| format!("{} duplicates {}", m.source.display(), m.matched.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Reported -> CleanedUp`: run the cleanup operations implied by
/// `ctx.delete`, against the compare map built during `Scanned`.
pub fn clean_up(
    matches: &[Match],
    compare: &ComparisonMap,
    bucket_roots: &[BucketName],
    ctx: &OperationContext,
    test: bool,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>, Vec<PathBuf>), Error> {
    if ctx.delete == DeleteMode::None {
        return Ok((Vec::new(), Vec::new(), Vec::new()));
    }

    let sources: Vec<PathBuf> = matches.iter().map(|m| m.source.clone()).collect();
    let removed = cleanup::remove_duplicates(&sources, compare, test)?;

    let mut swept = Vec::new();
    if ctx.delete == DeleteMode::Sensen {
        for bucket in bucket_roots {
            swept.extend(cleanup::sweep_non_executables(
                Path::new(bucket.as_str()),
                ctx.common.yes,
                test,
            )?);
        }
    }

    let mut pruned = Vec::new();
    if matches!(ctx.delete, DeleteMode::DeletePlus | DeleteMode::Sensen) {
        for bucket in bucket_roots {
            pruned.extend(cleanup::clean_empty(Path::new(bucket.as_str()), test)?);
        }
    }

    Ok((removed, swept, pruned))
}

/// Runs the full `dupe` pipeline against an already-open `index`, from
/// `Parsed` through `Terminated`. `test` gates the destructive cleanup step
/// exactly as in [`cleanup`]; the real CLI always passes `false`.
pub fn run_dupe(index: &Handle, ctx: &OperationContext, test: bool) -> Result<DupeReport, Error> {
    let buckets = resolve_buckets(index, ctx)?;
    let sources = collect_sources(&ctx.check_path)?;

    let skip: HashSet<PathBuf> = sources.iter().cloned().collect();
    let compare = if ctx.fast {
        load_fast(index, &buckets)?
    } else {
        scan_buckets(index, &buckets, &skip, &ctx.common)?
    };

    let matches = match_sources(&sources, &compare)?;
    let (removed_duplicates, swept_directories, pruned_directories) =
        clean_up(&matches, &compare, &buckets, ctx, test)?;

    Ok(DupeReport {
        matches,
        removed_duplicates,
        pruned_directories,
        swept_directories,
    })
}

/// Runs the `search` command: substring/exact/basename matching over the
/// index, scoped to `buckets` (every bucket, if empty).
pub fn run_search(
    index: &Handle,
    buckets: &[BucketName],
    term: &str,
    exact_case: bool,
    basename_only: bool,
) -> Result<HashMap<PathBuf, BucketName>, Error> {
    Ok(compare::search(index, buckets, term, exact_case, basename_only)?)
}
