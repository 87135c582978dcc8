//! Extracts a constructed zip and walks its entries end to end through the public API.

use std::collections::HashMap;
use std::io::{Read, Write};

use archive::Reader;
use zip::write::FileOptions;
use zip::ZipWriter;

fn build_zip(path: &std::path::Path, files: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn extracts_nested_directories() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("nested.zip");
    build_zip(
        &archive_path,
        &[
            ("top.txt", b"top level"),
            ("sub/inner.txt", b"nested content"),
            ("sub/deeper/leaf.txt", b"leaf content"),
        ],
    );

    let reader = Reader::open(&archive_path).expect("open archive");
    let mut contents: HashMap<String, Vec<u8>> = HashMap::new();
    for entry in reader.entries() {
        let entry = entry.expect("entry");
        if !entry.is_regular() {
            continue;
        }
        let mut buf = Vec::new();
        entry.open().unwrap().read_to_end(&mut buf).unwrap();
        contents.insert(entry.name().replace('\\', "/"), buf);
    }

    assert_eq!(contents.get("top.txt").map(Vec::as_slice), Some(&b"top level"[..]));
    assert_eq!(
        contents.get("sub/inner.txt").map(Vec::as_slice),
        Some(&b"nested content"[..])
    );
    assert_eq!(
        contents.get("sub/deeper/leaf.txt").map(Vec::as_slice),
        Some(&b"leaf content"[..])
    );
}

#[test]
fn rejects_plain_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"just some notes").unwrap();

    let err = Reader::open(&path).unwrap_err();
    assert!(matches!(err, archive::Error::Unsupported { .. }));
}
