use std::fs;

#[test]
fn s3_empty_prune() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a")).unwrap();
    fs::create_dir_all(dir.path().join("b")).unwrap();
    fs::write(dir.path().join("b/file"), b"x").unwrap();

    cleanup::clean_empty(dir.path(), false).unwrap();

    assert!(!dir.path().join("a").exists());
    assert!(dir.path().join("b/file").exists());
}

#[test]
fn s4_sensen() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("keepme")).unwrap();
    fs::write(dir.path().join("keepme/app.exe"), b"x").unwrap();
    fs::create_dir_all(dir.path().join("tossme")).unwrap();
    fs::write(dir.path().join("tossme/readme.txt"), b"x").unwrap();

    cleanup::sweep_non_executables(dir.path(), true, false).unwrap();

    assert!(dir.path().join("keepme").exists());
    assert!(!dir.path().join("tossme").exists());
}

#[test]
fn property_8_test_mode_mutates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a")).unwrap();
    fs::create_dir_all(dir.path().join("keepme")).unwrap();
    fs::write(dir.path().join("keepme/app.exe"), b"x").unwrap();
    fs::create_dir_all(dir.path().join("tossme")).unwrap();
    fs::write(dir.path().join("tossme/readme.txt"), b"x").unwrap();

    let kept = dir.path().join("kept.txt");
    let dup = dir.path().join("dup.txt");
    fs::write(&kept, b"same bytes").unwrap();
    fs::write(&dup, b"same bytes").unwrap();
    let mut compare = scanner::ComparisonMap::new();
    compare.insert(fingerprint::hash_file(&kept).unwrap(), &kept);

    cleanup::remove_duplicates(&[dup.clone()], &compare, true).unwrap();
    cleanup::clean_empty(dir.path(), true).unwrap();
    cleanup::sweep_non_executables(dir.path(), true, true).unwrap();

    assert!(dup.exists());
    assert!(dir.path().join("a").exists());
    assert!(dir.path().join("tossme").exists());
}
