//! Container format detection: by filename extension first, then by magic bytes.

use std::ffi::OsStr;
use std::path::Path;

/// A container format this crate knows how to (or deliberately declines to)
/// open.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Format {
    /// 7-Zip.
    SevenZip,
    /// Zip.
    Zip,
    /// Plain, uncompressed tar.
    Tar,
    /// Tar wrapped in gzip.
    TarGz,
    /// Tar wrapped in bzip2.
    TarBz2,
    /// Tar wrapped in xz.
    TarXz,
    /// Tar wrapped in lz4.
    TarLz4,
    /// Tar wrapped in zstd.
    TarZstd,
    /// Tar wrapped in snappy.
    TarSnappy,
    /// Tar wrapped in brotli.
    TarBrotli,
    /// Bare gzip stream (not necessarily containing a tar).
    Gzip,
    /// Bare bzip2 stream.
    Bzip2,
    /// Bare xz stream.
    Xz,
    /// Bare lz4 stream.
    Lz4,
    /// Bare zstd stream.
    Zstd,
    /// Bare snappy stream.
    Snappy,
    /// Bare brotli stream.
    Brotli,
    /// RAR.
    Rar,
}

impl Format {
    /// Whether this crate can actually extract this format. Every variant
    /// constructed by [`detect`] is supported; this exists so callers that
    /// build a `Format` from other sources (none currently do) stay honest.
    pub fn is_supported(self) -> bool {
        true
    }
}

/// A format recognised as a container, but one this crate does not support
/// extracting.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Reason {
    /// Microsoft Cabinet.
    Cab,
    /// Unix `ar` archive.
    Ar,
    /// Lzip.
    Lzip,
    /// Legacy Unix `compress` (`.Z`).
    LegacyCompress,
    /// Recognised as *something*, but not specifically identifiable.
    Unknown,
}

/// Detect the container format of `path`, trying the filename extension
/// first (including compound extensions like `.tar.xz` and its aliases),
/// then falling back to sniffing magic bytes from `lead`, the first bytes of
/// the file, when the extension is absent or unrecognised.
///
/// Returns `Ok(None)` if the path does not look like any known container at
/// all (a plain regular file). Returns `Err(Reason)` if it is identifiably a
/// container format this crate declines to extract.
pub fn detect(path: &Path, lead: &[u8]) -> Result<Option<Format>, Reason> {
    if let Some(format) = detect_by_extension(path) {
        return Ok(Some(format));
    }
    sniff(lead)
}

fn detect_by_extension(path: &Path) -> Option<Format> {
    let name = path.file_name().and_then(OsStr::to_str)?.to_lowercase();

    // Compound extensions first, since `.tar.gz` also ends in `.gz`.
    const TAR_COMPOUND: &[(&str, Format)] = &[
        (".tar.gz", Format::TarGz),
        (".tgz", Format::TarGz),
        (".tar.bz2", Format::TarBz2),
        (".tbz", Format::TarBz2),
        (".tbz2", Format::TarBz2),
        (".tar.xz", Format::TarXz),
        (".txz", Format::TarXz),
        (".tar.lz4", Format::TarLz4),
        (".tar.zst", Format::TarZstd),
        (".tar.zstd", Format::TarZstd),
        (".tar.sz", Format::TarSnappy),
        (".tar.br", Format::TarBrotli),
    ];
    for (suffix, format) in TAR_COMPOUND {
        if name.ends_with(suffix) {
            return Some(*format);
        }
    }

    let ext = Path::new(&name).extension().and_then(OsStr::to_str)?;
    Some(match ext {
        "7z" => Format::SevenZip,
        "zip" => Format::Zip,
        "tar" => Format::Tar,
        "gz" => Format::Gzip,
        "bz2" => Format::Bzip2,
        "xz" => Format::Xz,
        "lz4" => Format::Lz4,
        "zst" | "zstd" => Format::Zstd,
        "sz" => Format::Snappy,
        "br" => Format::Brotli,
        "rar" => Format::Rar,
        _ => return None,
    })
}

/// Magic-byte signatures for formats this crate supports, checked in order.
const SUPPORTED_MAGIC: &[(&[u8], Format)] = &[
    (&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C], Format::SevenZip),
    (&[0x50, 0x4B, 0x03, 0x04], Format::Zip),
    (&[0x50, 0x4B, 0x05, 0x06], Format::Zip),
    (&[0x50, 0x4B, 0x07, 0x08], Format::Zip),
    (&[0x1F, 0x8B], Format::Gzip),
    (b"BZh", Format::Bzip2),
    (&[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00], Format::Xz),
    (&[0x04, 0x22, 0x4D, 0x18], Format::Lz4),
    (&[0x28, 0xB5, 0x2F, 0xFD], Format::Zstd),
    (b"Rar!\x1a\x07\x00", Format::Rar),
    (b"Rar!\x1a\x07\x01\x00", Format::Rar),
];

/// Magic-byte signatures for containers this crate recognises but refuses to
/// extract.
const UNSUPPORTED_MAGIC: &[(&[u8], Reason)] = &[
    (b"MSCF", Reason::Cab),
    (b"!<arch>\n", Reason::Ar),
    (b"LZIP", Reason::Lzip),
    (&[0x1F, 0x9D], Reason::LegacyCompress),
];

/// Offset and signature of the tar `ustar` marker, present in every
/// POSIX-conformant tar header.
const USTAR_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8] = b"ustar";

/// Identify a format purely from its leading bytes.
pub fn sniff(lead: &[u8]) -> Result<Option<Format>, Reason> {
    for (magic, format) in SUPPORTED_MAGIC {
        if lead.starts_with(magic) {
            return Ok(Some(*format));
        }
    }
    for (magic, reason) in UNSUPPORTED_MAGIC {
        if lead.starts_with(magic) {
            return Err(*reason);
        }
    }
    if lead.len() >= USTAR_OFFSET + USTAR_MAGIC.len()
        && &lead[USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len()] == USTAR_MAGIC
    {
        return Ok(Some(Format::Tar));
    }
    Ok(None)
}
