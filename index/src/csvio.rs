//! CSV export/import for bucket contents.

use std::fs::File;
use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use fingerprint::Digest;

use crate::{BucketName, Error, Handle};

impl Handle {
    /// Write every `(digest, path)` entry of `bucket` to a CSV text file,
    /// returning its path. The first line is a `#bucket:<name>` comment
    /// identifying the bucket the file came from, so [`Handle::csv_import`]
    /// can round-trip it without a separate bucket argument.
    pub fn csv_export(&self, bucket: &BucketName) -> Result<PathBuf, Error> {
        let entries = self.list(bucket)?;
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dest =
            std::env::temp_dir().join(format!("{}-{stamp}.csv", sanitize(bucket.as_str())));

        let mut file = File::create(&dest)?;
        writeln!(file, "#bucket:{}", bucket.as_str())?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        for (path, digest) in entries {
            writer.write_record([digest.to_string(), path.to_string_lossy().into_owned()])?;
        }
        writer.flush()?;
        Ok(dest)
    }

    /// Import `digest,path` rows from `path`, creating the target bucket if
    /// needed. The bucket is identified by a leading `#bucket:<name>`
    /// comment line if present, falling back to the file's stem. Refuses to
    /// overwrite an existing bucket unless `assume_yes` is set, returning
    /// [`Error::ConfirmationRequired`] so the caller can prompt and retry.
    pub fn csv_import(&self, path: &Path, assume_yes: bool) -> Result<usize, Error> {
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;

        let bucket = contents
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("#bucket:"))
            .map(|name| BucketName::from_raw(name.trim().to_owned()))
            .unwrap_or_else(|| {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("imported");
                BucketName::from_raw(stem.to_owned())
            });

        if self.exists(&bucket)? && !assume_yes {
            return Err(Error::ConfirmationRequired(bucket));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .from_reader(contents.as_bytes());

        let mut imported = 0usize;
        for record in reader.records() {
            let record = record?;
            let digest_str = record
                .get(0)
                .ok_or_else(|| Error::Corrupt(path.to_owned(), "missing digest column".into()))?;
            let path_str = record
                .get(1)
                .ok_or_else(|| Error::Corrupt(path.to_owned(), "missing path column".into()))?;
            let digest: Digest = digest_str.parse()?;
            if digest == Digest::EMPTY {
                continue;
            }
            self.put(&bucket, Path::new(path_str), digest)?;
            imported += 1;
        }
        Ok(imported)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
