use std::path::Path;

use fingerprint::Digest;
use index::{BucketName, Handle};

fn handle(dir: &tempfile::TempDir) -> Handle {
    Handle::open_write(dir.path().join("store.redb")).unwrap()
}

#[test]
fn search_across_all_buckets_when_none_requested() {
    let dir = tempfile::tempdir().unwrap();
    let index = handle(&dir);

    let photos = BucketName::from_raw("photos");
    let docs = BucketName::from_raw("docs");
    index
        .put(&photos, Path::new("/a/vacation.jpg"), Digest::from_bytes([1u8; 32]))
        .unwrap();
    index
        .put(&docs, Path::new("/a/vacation.pdf"), Digest::from_bytes([2u8; 32]))
        .unwrap();

    let results = compare::search(&index, &[], "vacation", false, false).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[Path::new("/a/vacation.jpg")], photos);
    assert_eq!(results[Path::new("/a/vacation.pdf")], docs);
}

#[test]
fn search_scoped_to_requested_buckets() {
    let dir = tempfile::tempdir().unwrap();
    let index = handle(&dir);

    let photos = BucketName::from_raw("photos");
    let docs = BucketName::from_raw("docs");
    index
        .put(&photos, Path::new("/a/report.jpg"), Digest::from_bytes([1u8; 32]))
        .unwrap();
    index
        .put(&docs, Path::new("/a/report.pdf"), Digest::from_bytes([2u8; 32]))
        .unwrap();

    let results = compare::search(&index, &[docs.clone()], "report", false, false).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[Path::new("/a/report.pdf")], docs);
}

#[test]
fn lookup_one_finds_duplicate_via_scan() {
    let dir = tempfile::tempdir().unwrap();
    let store = handle(&dir);

    let tree = tempfile::tempdir().unwrap();
    std::fs::write(tree.path().join("a.txt"), b"same bytes").unwrap();
    std::fs::write(tree.path().join("b.txt"), b"same bytes").unwrap();

    let scanner = scanner::Scanner::new(store);
    let bucket = scanner
        .walk_directory(tree.path(), &std::collections::HashSet::new())
        .unwrap();

    let reopened = Handle::open_write(dir.path().join("store.redb")).unwrap();
    assert_eq!(reopened.count(&bucket).unwrap(), 2);

    let map = scanner.compare_map();
    let digest = fingerprint::hash_file(&tree.path().join("a.txt")).unwrap();
    let found = compare::lookup_one(&map, &digest).unwrap();
    assert!(found == tree.path().join("a.txt") || found == tree.path().join("b.txt"));
}
