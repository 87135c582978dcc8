//! Directory and archive walking, dispatching hashing work in parallel and
//! funnelling every index mutation through the scanner's single
//! [`index::Handle`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use fingerprint::Digest;
use index::{BucketName, Handle};
use rayon::prelude::*;
use rayon::ThreadPool;
use walkdir::WalkDir;

use crate::compare_map::ComparisonMap;
use crate::error::Error;
use crate::progress::Progress;

/// Separator joining an archive's absolute path to an entry name inside it
/// when storing the entry's composite index path. Opaque to everything but
/// the archive reader.
pub const ARCHIVE_ENTRY_SEPARATOR: &str = "::";

/// A bounded thread pool for archive-entry hashing, separate from the
/// global rayon pool used for the directory walk itself, so a single
/// archive-heavy bucket can't starve other work of threads.
fn archive_pool() -> &'static ThreadPool {
    static POOL: OnceLock<ThreadPool> = OnceLock::new();
    POOL.get_or_init(|| {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("build archive-entry thread pool")
    })
}

/// Walks directories and archives, hashing files and indexing the results.
///
/// Owns a [`ComparisonMap`] rebuilt for the scanner's own lifetime rather
/// than shared globally, and a pair of [`Progress`] counters the caller
/// polls to render status.
pub struct Scanner {
    index: Handle,
    compare: Mutex<ComparisonMap>,
    progress: Progress,
}

impl Scanner {
    /// Build a scanner over `index`, with a fresh, empty compare map.
    pub fn new(index: Handle) -> Self {
        Self {
            index,
            compare: Mutex::new(ComparisonMap::new()),
            progress: Progress::new(),
        }
    }

    /// Progress counters for the walk(s) run so far on this scanner.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// A snapshot of the compare map built up so far.
    pub fn compare_map(&self) -> ComparisonMap {
        self.compare.lock().expect("compare map poisoned").clone()
    }

    /// Walk `root` as a plain directory tree, hashing each regular file and
    /// indexing it under the bucket named after `root`. Archives within the
    /// tree are hashed as opaque files, not expanded. `skip` is the set of
    /// paths (the currently-tracked check-path sources) that must never be
    /// indexed, to avoid a scan accidentally indexing its own target.
    pub fn walk_directory(
        &self,
        root: &Path,
        skip: &HashSet<PathBuf>,
    ) -> Result<BucketName, Error> {
        self.walk(root, skip, false)
    }

    /// Same as [`Scanner::walk_directory`], but any file recognised as a
    /// supported archive is expanded and its entries are indexed under a
    /// composite path instead of the archive file itself.
    pub fn walk_archiver(&self, root: &Path, skip: &HashSet<PathBuf>) -> Result<BucketName, Error> {
        self.walk(root, skip, true)
    }

    fn walk(
        &self,
        root: &Path,
        skip: &HashSet<PathBuf>,
        expand_archives: bool,
    ) -> Result<BucketName, Error> {
        let absolute = pathkind::absolutise(root);
        if !absolute.existed || !absolute.path.is_dir() {
            return Err(Error::NotADirectory(root.to_owned()));
        }
        let bucket = BucketName::normalise(&absolute.path);
        self.index.register_bucket(&bucket)?;

        let entries: Vec<walkdir::DirEntry> = WalkDir::new(&absolute.path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !matches!(pathkind::classify(entry), pathkind::Classification::SkipDir)
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                matches!(pathkind::classify(entry), pathkind::Classification::Regular)
            })
            .collect();

        self.progress.add_total(entries.len());

        entries
            .into_par_iter()
            .try_for_each(|entry| -> Result<(), Error> {
                let path = entry.into_path();
                if skip.contains(&path) {
                    self.progress.advance();
                    return Ok(());
                }

                if expand_archives {
                    if matches!(archive::detect_file(&path), Ok(Some(_))) {
                        self.index_archive(&bucket, &path)?;
                        self.progress.advance();
                        return Ok(());
                    }
                }

                self.index_file(&bucket, &path)?;
                self.progress.advance();
                Ok(())
            })?;

        Ok(bucket)
    }

    /// Look up `path`'s existing digest in `bucket`; if present, record it in
    /// the compare map without re-hashing and report that the path already
    /// exists. This is what makes a repeat `walk_directory` call idempotent.
    fn walk_compare(&self, bucket: &BucketName, path: &Path) -> Result<bool, Error> {
        match self.index.get(bucket, path)? {
            Some(digest) => {
                self.compare
                    .lock()
                    .expect("compare map poisoned")
                    .insert(digest, path);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn index_file(&self, bucket: &BucketName, path: &Path) -> Result<(), Error> {
        if self.walk_compare(bucket, path)? {
            return Ok(());
        }

        let digest = fingerprint::hash_file(path)?;
        self.compare
            .lock()
            .expect("compare map poisoned")
            .insert(digest, path);
        if digest != Digest::EMPTY {
            self.index.put(bucket, path, digest)?;
        }
        Ok(())
    }

    fn index_archive(&self, bucket: &BucketName, archive_path: &Path) -> Result<(), Error> {
        let reader = match archive::Reader::open(archive_path) {
            Ok(reader) => reader,
            // Detected as a container by extension/magic but the decoder
            // rejected or panicked on it; fall back to indexing it whole.
            Err(_) => return self.index_file(bucket, archive_path),
        };

        let entries: Vec<archive::Entry> = reader
            .entries()
            .filter_map(|entry| entry.ok())
            .filter(archive::Entry::is_regular)
            .collect();

        let hashed: Vec<Result<(PathBuf, Digest), Error>> = archive_pool().install(|| {
            entries
                .into_par_iter()
                .map(|entry| -> Result<(PathBuf, Digest), Error> {
                    let mut file = entry.open()?;
                    let digest = fingerprint::hash_reader(&mut file)?;
                    let composite = format!(
                        "{}{}{}",
                        archive_path.display(),
                        ARCHIVE_ENTRY_SEPARATOR,
                        entry.name()
                    );
                    Ok((PathBuf::from(composite), digest))
                })
                .collect()
        });

        for result in hashed {
            let (composite, digest) = result?;
            self.compare
                .lock()
                .expect("compare map poisoned")
                .insert(digest, &composite);
            if digest != Digest::EMPTY {
                self.index.put(bucket, &composite, digest)?;
            }
        }
        Ok(())
    }
}
