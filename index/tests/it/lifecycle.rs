use std::fs;
use std::path::PathBuf;

use fingerprint::Digest;
use index::{BucketName, Handle};

#[test]
fn full_bucket_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let handle = Handle::open_write(dir.path().join("store.redb")).unwrap();

    let photos = BucketName::from_raw("photos");
    let docs = BucketName::from_raw("docs");

    handle
        .put(&photos, &PathBuf::from("/a/one.jpg"), Digest::EMPTY)
        .unwrap();
    handle
        .put(&photos, &PathBuf::from("/a/two.jpg"), Digest::from_bytes([7u8; 32]))
        .unwrap();
    handle
        .put(&docs, &PathBuf::from("/a/report.pdf"), Digest::EMPTY)
        .unwrap();

    let mut buckets = handle.buckets().unwrap();
    buckets.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(buckets, vec![docs.clone(), photos.clone()]);

    assert_eq!(handle.count(&photos).unwrap(), 2);
    assert_eq!(handle.count(&docs).unwrap(), 1);

    let renamed = BucketName::from_raw("documents");
    handle.rename_bucket(&docs, &renamed).unwrap();
    assert!(!handle.exists(&docs).unwrap());
    assert_eq!(handle.count(&renamed).unwrap(), 1);

    handle.delete_bucket(&renamed).unwrap();
    assert!(!handle.exists(&renamed).unwrap());

    let report = handle.info().unwrap();
    assert!(report.contains("photos"));

    handle.compact().unwrap();
    assert_eq!(handle.count(&photos).unwrap(), 2);

    let (backup_path, bytes) = handle.backup().unwrap();
    assert!(bytes > 0);
    fs::remove_file(backup_path).ok();
}

#[test]
fn clean_is_scoped_to_requested_buckets() {
    let dir = tempfile::tempdir().unwrap();
    let handle = Handle::open_write(dir.path().join("store.redb")).unwrap();

    let keep = BucketName::from_raw("keep");
    let sweep = BucketName::from_raw("sweep");

    handle
        .put(&keep, &missing_path(), Digest::EMPTY)
        .unwrap();
    handle
        .put(&sweep, &missing_path(), Digest::EMPTY)
        .unwrap();

    handle.clean(Some(&[sweep.clone()]), true, false).unwrap();

    assert_eq!(handle.count(&sweep).unwrap(), 0);
    assert_eq!(handle.count(&keep).unwrap(), 1);
}

fn missing_path() -> PathBuf {
    PathBuf::from("/this/path/does/not/exist.bin")
}
