use std::collections::HashSet;
use std::io::Write;

use index::Handle;
use scanner::Scanner;
use zip::write::FileOptions;
use zip::ZipWriter;

fn build_zip(path: &std::path::Path, files: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn walk_archiver_indexes_archive_entries_under_composite_paths() {
    let store_dir = tempfile::tempdir().unwrap();
    let scanner = Scanner::new(Handle::open_write(store_dir.path().join("store.redb")).unwrap());

    let tree = tempfile::tempdir().unwrap();
    let archive_path = tree.path().join("bundle.zip");
    build_zip(
        &archive_path,
        &[("one.txt", b"first"), ("two.txt", b"second")],
    );

    let bucket = scanner
        .walk_archiver(tree.path(), &HashSet::new())
        .unwrap();

    // Two archive entries, neither the archive file itself.
    assert_eq!(
        index::Handle::open_write(store_dir.path().join("store.redb"))
            .unwrap()
            .count(&bucket)
            .unwrap(),
        2
    );

    let map = scanner.compare_map();
    assert_eq!(map.len(), 2);
}

#[test]
fn walk_directory_does_not_expand_archives() {
    let store_dir = tempfile::tempdir().unwrap();
    let scanner = Scanner::new(Handle::open_write(store_dir.path().join("store.redb")).unwrap());

    let tree = tempfile::tempdir().unwrap();
    let archive_path = tree.path().join("bundle.zip");
    build_zip(&archive_path, &[("one.txt", b"first")]);

    let bucket = scanner
        .walk_directory(tree.path(), &HashSet::new())
        .unwrap();

    // The archive itself is indexed as a single opaque file.
    let reopened = Handle::open_write(store_dir.path().join("store.redb")).unwrap();
    assert_eq!(reopened.count(&bucket).unwrap(), 1);
}
