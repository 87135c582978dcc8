//! A digest is a content-addressed fingerprint for a file's bytes.
//!
//! Digests are SHA-256 hashes of raw file contents. Two files with the same
//! digest are, for the purposes of this tool, the same file: this is the
//! signal the duplicate detector and the index store are built around.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

use std::{
    fmt::Display,
    fs::File,
    io::{self, Read},
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use thiserror::Error;

/// Errors encountered while computing a digest.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A generic IO error occurred while reading the content to be hashed.
    #[error("i/o error: {0}")]
    IO(#[from] io::Error),

    /// A hex string did not decode to a 32-byte digest.
    #[error("invalid digest hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A decoded value was not exactly 32 bytes.
    #[error("digest must be exactly 32 bytes, got {0}")]
    WrongLength(usize),
}

/// Size, in bytes, of the buffer used to stream content through the hasher.
/// Bounds memory use for very large files.
const BUFFER_SIZE: usize = 1 << 20;

/// A fixed-width 32-byte SHA-256 digest of a file's contents.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Digest([u8; 32]);

impl Digest {
    /// The digest of the empty byte stream. Reserved: never stored in the index.
    pub const EMPTY: Digest = Digest([
        0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99, 0x6f, 0xb9,
        0x24, 0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95, 0x99, 0x1b, 0x78, 0x52,
        0xb8, 0x55,
    ]);

    /// View the digest as raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Construct a digest from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Digest(bytes)
    }

    fn from_hasher(hasher: Sha256) -> Self {
        let bytes: [u8; 32] = hasher.finalize().into();
        Digest(bytes)
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let len = bytes.len();
        let fixed: [u8; 32] = bytes.try_into().map_err(|_| Error::WrongLength(len))?;
        Ok(Digest(fixed))
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Digest::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash the file at `path` incrementally, bounding memory with a 1 MiB buffer.
pub fn hash_file(path: &Path) -> Result<Digest, Error> {
    let mut file = File::open(path)?;
    hash_reader(&mut file)
}

/// Hash an arbitrary byte stream incrementally, bounding memory with a 1 MiB buffer.
pub fn hash_reader<R: Read>(reader: &mut R) -> Result<Digest, Error> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUFFER_SIZE];
    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(Digest::from_hasher(hasher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn empty_stream_matches_known_constant() {
        let digest = hash_reader(&mut Cursor::new(&[])).expect("must hash");
        assert_eq!(digest, Digest::EMPTY);
    }

    #[test]
    fn determinism() {
        let a = hash_reader(&mut Cursor::new(b"hello-world-payload-")).expect("must hash");
        let b = hash_reader(&mut Cursor::new(b"hello-world-payload-")).expect("must hash");
        assert_eq!(a, b);
    }

    #[test]
    fn differing_content_differs() {
        let a = hash_reader(&mut Cursor::new(b"alpha")).expect("must hash");
        let b = hash_reader(&mut Cursor::new(b"beta")).expect("must hash");
        assert_ne!(a, b);
    }

    #[test]
    fn display_and_parse_round_trip() {
        let digest = hash_reader(&mut Cursor::new(b"round-trip")).expect("must hash");
        let rendered = digest.to_string();
        assert_eq!(rendered.len(), 64);
        let parsed: Digest = rendered.parse().expect("must parse");
        assert_eq!(digest, parsed);
    }

    #[test]
    fn hash_file_matches_hash_reader() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("file.bin");
        let mut file = File::create(&path).expect("create");
        file.write_all(b"hello-world-payload-").expect("write");
        drop(file);

        let from_file = hash_file(&path).expect("hash_file");
        let from_reader =
            hash_reader(&mut Cursor::new(b"hello-world-payload-")).expect("hash_reader");
        assert_eq!(from_file, from_reader);
    }

    #[test]
    fn buffer_larger_than_single_chunk() {
        let data = vec![0x5Au8; BUFFER_SIZE * 2 + 17];
        let a = hash_reader(&mut Cursor::new(&data)).expect("must hash");
        let b = hash_reader(&mut Cursor::new(&data)).expect("must hash");
        assert_eq!(a, b);
    }
}
