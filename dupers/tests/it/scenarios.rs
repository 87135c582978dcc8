use std::fs;

use dupers::context::{Common, DeleteMode, OperationContext};
use dupers::orchestrator;
use index::{BucketName, Handle};

fn store(dir: &tempfile::TempDir) -> Handle {
    Handle::open_write(dir.path().join("store.redb")).unwrap()
}

/// S2: export a scanned bucket to CSV, drop the bucket, reimport it, and get
/// the same digests back.
#[test]
fn s2_csv_roundtrip() {
    let store_dir = tempfile::tempdir().unwrap();
    let index = store(&store_dir);

    let bucket_dir = tempfile::tempdir().unwrap();
    fs::write(bucket_dir.path().join("a"), b"payload-a").unwrap();
    fs::write(bucket_dir.path().join("b"), b"payload-b").unwrap();
    let bucket = BucketName::normalise(bucket_dir.path());

    let scanner = scanner::Scanner::new(index.clone());
    scanner
        .walk_directory(bucket_dir.path(), &Default::default())
        .unwrap();
    let before = index.list(&bucket).unwrap();
    assert_eq!(before.len(), 2);

    let csv_path = index.csv_export(&bucket).unwrap();
    index.delete_bucket(&bucket).unwrap();
    assert!(!index.exists(&bucket).unwrap());

    let rows = index.csv_import(&csv_path, false).unwrap();
    assert_eq!(rows, 2);
    let after = index.list(&bucket).unwrap();
    assert_eq!(after, before);
}

/// S5: renaming a bucket preserves its entries under the new name and leaves
/// none under the old one.
#[test]
fn s5_rename_bucket() {
    let store_dir = tempfile::tempdir().unwrap();
    let index = store(&store_dir);

    let bucket_dir = tempfile::tempdir().unwrap();
    fs::write(bucket_dir.path().join("f"), b"payload").unwrap();
    let old = BucketName::normalise(bucket_dir.path());

    let scanner = scanner::Scanner::new(index.clone());
    scanner
        .walk_directory(bucket_dir.path(), &Default::default())
        .unwrap();

    let new = BucketName::from_raw("renamed-bucket");
    index.rename_bucket(&old, &new).unwrap();

    assert!(!index.exists(&old).unwrap());
    assert_eq!(index.count(&new).unwrap(), 1);
}

/// S6: `--fast` against a bucket that was never scanned is refused rather
/// than silently treated as empty.
#[test]
fn s6_fast_mode_refuses_never_scanned_bucket() {
    let store_dir = tempfile::tempdir().unwrap();
    let index = store(&store_dir);

    let bucket_dir = tempfile::tempdir().unwrap();
    let check_dir = tempfile::tempdir().unwrap();
    fs::write(check_dir.path().join("f"), b"payload").unwrap();

    let ctx = OperationContext {
        requested_buckets: vec![BucketName::normalise(bucket_dir.path())],
        check_path: check_dir.path().to_owned(),
        fast: true,
        delete: DeleteMode::None,
        common: Common::default(),
    };

    let err = orchestrator::run_dupe(&index, &ctx, false).unwrap_err();
    assert!(matches!(err, dupers::Error::FastModeRefused(_)));
}

/// `--fast` against a bucket that has already been scanned answers from the
/// store alone, without re-walking the bucket directory.
#[test]
fn fast_mode_answers_from_existing_index() {
    let store_dir = tempfile::tempdir().unwrap();
    let index = store(&store_dir);

    let bucket_dir = tempfile::tempdir().unwrap();
    let payload = b"fast-mode-payload";
    fs::write(bucket_dir.path().join("stored"), payload).unwrap();
    let bucket = BucketName::normalise(bucket_dir.path());

    let scanner = scanner::Scanner::new(index.clone());
    scanner
        .walk_directory(bucket_dir.path(), &Default::default())
        .unwrap();

    // Remove the bucket file from disk; fast mode must not need it.
    fs::remove_file(bucket_dir.path().join("stored")).unwrap();

    let check_dir = tempfile::tempdir().unwrap();
    fs::write(check_dir.path().join("check"), payload).unwrap();

    let ctx = OperationContext {
        requested_buckets: vec![bucket],
        check_path: check_dir.path().to_owned(),
        fast: true,
        delete: DeleteMode::None,
        common: Common::default(),
    };

    let report = orchestrator::run_dupe(&index, &ctx, false).unwrap();
    assert_eq!(report.matches.len(), 1);
}

/// Searching scoped to a single requested bucket does not surface matches
/// from another indexed bucket.
#[test]
fn search_is_scoped_to_requested_buckets() {
    let store_dir = tempfile::tempdir().unwrap();
    let index = store(&store_dir);

    let one = tempfile::tempdir().unwrap();
    fs::write(one.path().join("report.txt"), b"one").unwrap();
    let two = tempfile::tempdir().unwrap();
    fs::write(two.path().join("report.txt"), b"two").unwrap();

    let scanner = scanner::Scanner::new(index.clone());
    scanner.walk_directory(one.path(), &Default::default()).unwrap();
    scanner.walk_directory(two.path(), &Default::default()).unwrap();

    let bucket_one = BucketName::normalise(one.path());
    let results =
        orchestrator::run_search(&index, &[bucket_one], "report", false, true).unwrap();
    assert_eq!(results.len(), 1);
}
