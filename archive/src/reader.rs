//! Lazy extraction and entry iteration over a detected archive.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use compress_tools::Ownership;
use tempfile::{tempdir, TempDir};
use walkdir::WalkDir;

use crate::error::Error;
use crate::format::{self, Format};

/// Number of leading bytes read to sniff magic bytes when the extension
/// alone does not identify a format (covers the tar `ustar` marker at
/// offset 257).
const SNIFF_LEN: usize = 512;

/// A single entry discovered while walking an extracted archive.
#[derive(Clone, Debug)]
pub struct Entry {
    /// The entry's name as it appeared inside the archive, relative to the
    /// archive root.
    name: String,
    is_dir: bool,
    is_regular: bool,
    concrete: PathBuf,
}

impl Entry {
    /// The entry's path relative to the archive root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Whether this entry is a regular file (as opposed to a directory,
    /// symlink, device, or other non-regular node).
    pub fn is_regular(&self) -> bool {
        self.is_regular
    }

    /// Open the extracted file backing this entry for reading.
    pub fn open(&self) -> Result<File, Error> {
        Ok(File::open(&self.concrete)?)
    }
}

/// Read the first [`SNIFF_LEN`] bytes of `file` without disturbing its
/// position for the caller, who still needs the whole file afterward.
fn read_lead(file: &mut File) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; SNIFF_LEN];
    let read = file.read(&mut buf)?;
    buf.truncate(read);
    file.seek(SeekFrom::Start(0))?;
    Ok(buf)
}

/// Detect whether `path` is a supported archive, without opening it for
/// extraction. Callers that want to decide whether to pay the cost of
/// [`Reader::open`]'s extraction use this first.
pub fn detect_file(path: &Path) -> Result<Option<Format>, crate::format::Reason> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return Ok(None),
    };
    let lead = match read_lead(&mut file) {
        Ok(lead) => lead,
        Err(_) => return Ok(None),
    };
    format::detect(path, &lead)
}

/// A lazily-extracted archive. Extraction happens once, eagerly, at `open`
/// time (there is no lower-level streaming entry API available here); the
/// temporary directory is then walked lazily by [`Reader::entries`], and is
/// removed when the `Reader` is dropped.
pub struct Reader {
    root: PathBuf,
    _tempdir: TempDir,
}

impl Reader {
    /// Open `path` as an archive, extracting it to a fresh temporary
    /// directory. Returns [`Error::Unsupported`] if the format is not one
    /// this crate extracts.
    ///
    /// A panic from the underlying decoder is caught and converted into
    /// [`Error::DecoderPanic`]; it never unwinds into the caller.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let mut file = File::open(path)?;
        let lead = read_lead(&mut file)?;
        format::detect(path, &lead).map_err(|reason| Error::Unsupported {
            path: path.to_owned(),
            reason,
        })?;

        let dir = tempdir()?;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            compress_tools::uncompress_archive(&mut file, dir.path(), Ownership::Ignore)
        }));

        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(Error::Libarchive(err)),
            Err(_) => {
                return Err(Error::DecoderPanic {
                    path: path.to_owned(),
                })
            }
        }

        Ok(Self {
            root: dir.path().to_owned(),
            _tempdir: dir,
        })
    }

    /// Iterate the entries extracted from the archive. Directory entries and
    /// non-regular entries (symlinks, devices) are yielded too; callers
    /// decide whether to skip them via [`Entry::is_dir`] / [`Entry::is_regular`].
    ///
    /// Corrupt entries encountered mid-walk are reported as an `Err` item;
    /// the iterator continues past them rather than aborting the whole walk.
    pub fn entries(&self) -> impl Iterator<Item = Result<Entry, Error>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter(|entry| {
                // The root directory itself is not a meaningful entry.
                entry
                    .as_ref()
                    .map(|e| e.path() != self.root)
                    .unwrap_or(true)
            })
            .map(move |entry| {
                let entry = entry?;
                let relative = entry
                    .path()
                    .strip_prefix(&self.root)
                    .unwrap_or(entry.path());
                let file_type = entry.file_type();
                Ok(Entry {
                    name: relative.to_string_lossy().into_owned(),
                    is_dir: file_type.is_dir(),
                    is_regular: file_type.is_file(),
                    concrete: entry.into_path(),
                })
            })
    }
}
