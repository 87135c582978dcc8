//! Duplicate lookup and filename search over the index.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fingerprint::Digest;
use index::{BucketName, Handle};
use scanner::ComparisonMap;

use crate::Error;

/// Look up a previously-indexed path with the same digest, if any.
pub fn lookup_one<'a>(map: &'a ComparisonMap, digest: &Digest) -> Option<&'a Path> {
    map.lookup_one(digest)
}

/// Search the given buckets of `index` (or every bucket, if `buckets` is
/// empty) for paths matching `term`, combining `exact_case` and
/// `basename_only` into the four documented match flavors. An empty `term`
/// matches nothing.
pub fn search(
    index: &Handle,
    buckets: &[BucketName],
    term: &str,
    exact_case: bool,
    basename_only: bool,
) -> Result<HashMap<PathBuf, BucketName>, Error> {
    let mut results = HashMap::new();
    if term.is_empty() {
        return Ok(results);
    }

    let targets = index::resolve_targets(index, buckets)?;
    let needle = normalize(term, exact_case);

    for bucket in targets {
        for path in index.list(&bucket)?.into_keys() {
            let candidate = candidate_string(&path, basename_only);
            if normalize(&candidate, exact_case).contains(&needle) {
                results.insert(path, bucket.clone());
            }
        }
    }

    Ok(results)
}

fn candidate_string(path: &Path, basename_only: bool) -> String {
    if basename_only {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        path.to_string_lossy().into_owned()
    }
}

fn normalize(s: &str, exact_case: bool) -> String {
    if exact_case {
        s.to_owned()
    } else {
        s.to_ascii_lowercase()
    }
}

const HIGHLIGHT_START: &str = "\u{1b}[33m";
const HIGHLIGHT_END: &str = "\u{1b}[0m";

/// Wrap every match of `term` within `path` in ANSI color markers, for
/// display only. ASCII-lowercasing (rather than full Unicode lowercasing) is
/// used for the case-insensitive comparison so match byte offsets always
/// line up with the original string; the returned string is for rendering
/// only and must never be fed back into a lookup.
pub fn highlight(path: &str, term: &str, exact_case: bool) -> String {
    if term.is_empty() {
        return path.to_owned();
    }

    let haystack = normalize(path, exact_case);
    let needle = normalize(term, exact_case);

    let mut out = String::with_capacity(path.len());
    let mut cursor = 0;
    while let Some(pos) = haystack[cursor..].find(&needle) {
        let start = cursor + pos;
        let end = start + needle.len();
        out.push_str(&path[cursor..start]);
        out.push_str(HIGHLIGHT_START);
        out.push_str(&path[start..end]);
        out.push_str(HIGHLIGHT_END);
        cursor = end;
    }
    out.push_str(&path[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(dir: &tempfile::TempDir) -> Handle {
        Handle::open_write(dir.path().join("store.redb")).unwrap()
    }

    #[test]
    fn empty_term_matches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let index = handle(&dir);
        let bucket = BucketName::from_raw("photos");
        index
            .put(&bucket, Path::new("/a/photo.jpg"), Digest::EMPTY)
            .unwrap();

        let results = search(&index, &[], "", true, false).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn exact_case_full_path_match() {
        let dir = tempfile::tempdir().unwrap();
        let index = handle(&dir);
        let bucket = BucketName::from_raw("photos");
        index
            .put(&bucket, Path::new("/a/Photo.JPG"), Digest::EMPTY)
            .unwrap();

        let results = search(&index, &[], "Photo", true, false).unwrap();
        assert_eq!(results.len(), 1);

        let results = search(&index, &[], "photo", true, false).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn case_insensitive_basename_match() {
        let dir = tempfile::tempdir().unwrap();
        let index = handle(&dir);
        let bucket = BucketName::from_raw("photos");
        index
            .put(&bucket, Path::new("/a/b/PHOTO.jpg"), Digest::EMPTY)
            .unwrap();

        let results = search(&index, &[], "photo", false, true).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn basename_only_excludes_directory_match() {
        let dir = tempfile::tempdir().unwrap();
        let index = handle(&dir);
        let bucket = BucketName::from_raw("photos");
        index
            .put(&bucket, Path::new("/vacation/img.jpg"), Digest::EMPTY)
            .unwrap();

        let results = search(&index, &[], "vacation", false, true).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn highlight_wraps_match_without_changing_path_semantics() {
        let highlighted = highlight("/a/Photo.jpg", "photo", false);
        assert_eq!(highlighted, "/a/\u{1b}[33mPhoto\u{1b}[0m.jpg");
        // Stripping the markers recovers the original path exactly.
        let stripped = highlighted.replace(HIGHLIGHT_START, "").replace(HIGHLIGHT_END, "");
        assert_eq!(stripped, "/a/Photo.jpg");
    }

    #[test]
    fn lookup_one_reads_from_compare_map() {
        let mut map = ComparisonMap::new();
        let digest = Digest::from_bytes([3u8; 32]);
        map.insert(digest, "/a/b.bin");
        assert_eq!(lookup_one(&map, &digest), Some(Path::new("/a/b.bin")));
    }
}
