//! The bucketed index store.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use fingerprint::Digest;
use log::debug;
use redb::{Database, ReadableTable, TableDefinition};

use crate::{BucketName, Error};

/// The table that tracks which buckets exist. Individual bucket data lives
/// in its own dynamically-named table; this one just lists them, since redb
/// has no first-class "list every table" query this crate wants to rely on.
const REGISTRY: TableDefinition<&str, u8> = TableDefinition::new("__buckets__");

fn data_table(bucket: &str) -> TableDefinition<'_, &str, Vec<u8>> {
    TableDefinition::new(bucket)
}

lazy_static::lazy_static! {
    /// Databases already opened by this process, keyed by their absolutised
    /// path. redb expects at most one live `Database` per file per process;
    /// this cache is what makes `open_read`/`open_write` idempotent rather
    /// than erroring (or silently corrupting redb's internal lock state) on
    /// a second open of the same store.
    static ref OPEN: Mutex<HashMap<PathBuf, Arc<Mutex<Database>>>> = Mutex::new(HashMap::new());
}

fn cache_key(path: &Path) -> PathBuf {
    pathkind::absolutise(path).path
}

/// A handle to an open index store.
#[derive(Clone)]
pub struct Handle {
    db: Arc<Mutex<Database>>,
    path: PathBuf,
}

impl Handle {
    /// Open the store at `path` for reading. The store must already exist.
    pub fn open_read(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let key = cache_key(path);
        let mut open = OPEN.lock().expect("index open-handle registry poisoned");
        if let Some(db) = open.get(&key) {
            return Ok(Self {
                db: db.clone(),
                path: key,
            });
        }
        let db = Arc::new(Mutex::new(Database::open(path)?));
        open.insert(key.clone(), db.clone());
        Ok(Self { db, path: key })
    }

    /// Open the store at `path` for writing, creating it if absent.
    pub fn open_write(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let key = cache_key(path);
        let mut open = OPEN.lock().expect("index open-handle registry poisoned");
        if let Some(db) = open.get(&key) {
            return Ok(Self {
                db: db.clone(),
                path: key,
            });
        }
        let db = Arc::new(Mutex::new(Database::create(path)?));
        open.insert(key.clone(), db.clone());
        Ok(Self { db, path: key })
    }

    /// The path this handle was opened against.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All bucket names currently tracked by the store.
    pub fn buckets(&self) -> Result<Vec<BucketName>, Error> {
        let db = self.db.lock().expect("database mutex poisoned");
        let txn = db.begin_read()?;
        let registry = match txn.open_table(REGISTRY) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut names = Vec::new();
        for entry in registry.iter()? {
            let (key, _) = entry?;
            names.push(BucketName::from_raw(key.value().to_owned()));
        }
        Ok(names)
    }

    /// Whether `name` exists as a bucket in the store.
    pub fn exists(&self, name: &BucketName) -> Result<bool, Error> {
        let db = self.db.lock().expect("database mutex poisoned");
        let txn = db.begin_read()?;
        let registry = match txn.open_table(REGISTRY) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        Ok(registry.get(name.as_str())?.is_some())
    }

    fn require_bucket(&self, name: &BucketName) -> Result<(), Error> {
        if self.exists(name)? {
            Ok(())
        } else {
            Err(Error::BucketNotFound(name.clone()))
        }
    }

    /// The number of entries stored in `name`.
    pub fn count(&self, name: &BucketName) -> Result<usize, Error> {
        self.require_bucket(name)?;
        let db = self.db.lock().expect("database mutex poisoned");
        let txn = db.begin_read()?;
        let table = match txn.open_table(data_table(name.as_str())) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(0),
            Err(err) => return Err(err.into()),
        };
        Ok(table.len()? as usize)
    }

    /// The digest stored for `path` in bucket `name`, if any. Unlike
    /// [`Handle::list`], a missing bucket is not an error here: it simply
    /// means `path` has never been indexed, which is the common case while a
    /// scan is still populating a fresh bucket.
    pub fn get(&self, name: &BucketName, path: &Path) -> Result<Option<Digest>, Error> {
        let db = self.db.lock().expect("database mutex poisoned");
        let txn = db.begin_read()?;
        let table = match txn.open_table(data_table(name.as_str())) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match table.get(path.to_string_lossy().as_ref())? {
            Some(guard) => Ok(Some(bytes_to_digest(&guard.value())?)),
            None => Ok(None),
        }
    }

    /// All `(path, digest)` entries stored in `name`. Insertion order is not
    /// preserved.
    pub fn list(&self, name: &BucketName) -> Result<HashMap<PathBuf, Digest>, Error> {
        self.require_bucket(name)?;
        let db = self.db.lock().expect("database mutex poisoned");
        let txn = db.begin_read()?;
        let table = match txn.open_table(data_table(name.as_str())) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(HashMap::new()),
            Err(err) => return Err(err.into()),
        };
        let mut out = HashMap::new();
        for entry in table.iter()? {
            let (path, digest) = entry?;
            let digest = bytes_to_digest(&digest.value())?;
            out.insert(PathBuf::from(path.value()), digest);
        }
        Ok(out)
    }

    /// Register `name` as an existing bucket, with no data entries of its
    /// own. Idempotent. Lets a scan of a directory with no non-empty files
    /// still mark the bucket as scanned, since [`Handle::put`] skips the
    /// data-table insert entirely for the empty-stream digest.
    pub fn register_bucket(&self, name: &BucketName) -> Result<(), Error> {
        let db = self.db.lock().expect("database mutex poisoned");
        let txn = db.begin_write()?;
        {
            let mut registry = txn.open_table(REGISTRY)?;
            registry.insert(name.as_str(), 0u8)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Store `digest` for `path` in bucket `name`, creating the bucket if it
    /// does not yet exist. Overwrites any prior digest for the same path.
    /// The empty-stream digest is never stored: the bucket is still
    /// registered (an all-empty directory still counts as scanned), but no
    /// data-table entry is written for `path`.
    pub fn put(&self, name: &BucketName, path: &Path, digest: Digest) -> Result<(), Error> {
        let db = self.db.lock().expect("database mutex poisoned");
        let txn = db.begin_write()?;
        {
            let mut registry = txn.open_table(REGISTRY)?;
            registry.insert(name.as_str(), 0u8)?;

            if digest != Digest::EMPTY {
                let mut table = txn.open_table(data_table(name.as_str()))?;
                table.insert(path.to_string_lossy().as_ref(), digest.as_bytes().to_vec())?;
            }
        }
        txn.commit()?;
        debug!("put {path:?} -> bucket {name}");
        Ok(())
    }

    /// Remove bucket `name` and all its entries entirely.
    pub fn delete_bucket(&self, name: &BucketName) -> Result<(), Error> {
        self.require_bucket(name)?;
        let db = self.db.lock().expect("database mutex poisoned");
        let txn = db.begin_write()?;
        txn.delete_table(data_table(name.as_str()))?;
        {
            let mut registry = txn.open_table(REGISTRY)?;
            registry.remove(name.as_str())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Rename bucket `old` to `new`, moving every entry across.
    pub fn rename_bucket(&self, old: &BucketName, new: &BucketName) -> Result<(), Error> {
        if old == new {
            return Err(Error::SameName(old.clone()));
        }
        self.require_bucket(old)?;

        let db = self.db.lock().expect("database mutex poisoned");
        let txn = db.begin_write()?;
        let entries: Vec<(String, Vec<u8>)> = {
            let old_table = txn.open_table(data_table(old.as_str()))?;
            old_table
                .iter()?
                .map(|entry| entry.map(|(k, v)| (k.value().to_owned(), v.value())))
                .collect::<Result<_, _>>()?
        };
        {
            let mut new_table = txn.open_table(data_table(new.as_str()))?;
            for (path, digest) in entries {
                new_table.insert(path.as_str(), digest)?;
            }
        }
        txn.delete_table(data_table(old.as_str()))?;
        {
            let mut registry = txn.open_table(REGISTRY)?;
            registry.remove(old.as_str())?;
            registry.insert(new.as_str(), 0u8)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Remove entries whose stored path no longer exists on disk. Restricted
    /// to `buckets` when given, otherwise applied to every bucket.
    pub fn clean(
        &self,
        buckets: Option<&[BucketName]>,
        quiet: bool,
        debug_log: bool,
    ) -> Result<(), Error> {
        let targets = match buckets {
            Some(named) => named.to_vec(),
            None => self.buckets()?,
        };

        let db = self.db.lock().expect("database mutex poisoned");
        let txn = db.begin_write()?;
        for bucket in &targets {
            let stale: Vec<String> = {
                let table = match txn.open_table(data_table(bucket.as_str())) {
                    Ok(table) => table,
                    Err(redb::TableError::TableDoesNotExist(_)) => continue,
                    Err(err) => return Err(err.into()),
                };
                table
                    .iter()?
                    .filter_map(|entry| entry.ok())
                    .map(|(k, _)| k.value().to_owned())
                    .filter(|path| !Path::new(path).try_exists().unwrap_or(false))
                    .collect()
            };

            if stale.is_empty() {
                continue;
            }
            let mut table = txn.open_table(data_table(bucket.as_str()))?;
            for path in stale {
                table.remove(path.as_str())?;
                if debug_log {
                    debug!("removed stale entry {path} from bucket {bucket}");
                } else if !quiet {
                    debug!("removed stale entry from bucket {bucket}");
                }
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Rewrite the store to reclaim free space. May change on-disk layout.
    pub fn compact(&self) -> Result<(), Error> {
        let mut db = self.db.lock().expect("database mutex poisoned");
        db.compact()?;
        Ok(())
    }

    /// Copy the live store file to a timestamped backup next to the user's
    /// home directory. Returns the backup's path and byte length.
    pub fn backup(&self) -> Result<(PathBuf, u64), Error> {
        let home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let dest = home.join(format!(".dupers-backup-{}.redb", since_epoch.as_secs()));
        let bytes = fs::copy(&self.path, &dest)?;
        Ok((dest, bytes))
    }

    /// Human-readable store statistics: bucket count, per-bucket entry
    /// count, and file size.
    pub fn info(&self) -> Result<String, Error> {
        let buckets = self.buckets()?;
        let size = fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);

        let mut out = format!(
            "store: {:?}\nsize: {size} bytes\nbuckets: {}\n",
            self.path,
            buckets.len()
        );
        for bucket in &buckets {
            let count = self.count(bucket).unwrap_or(0);
            out.push_str(&format!("  {bucket}: {count} entries\n"));
        }
        Ok(out)
    }
}

fn bytes_to_digest(bytes: &[u8]) -> Result<Digest, Error> {
    let array: [u8; 32] = bytes
        .try_into()
        .map_err(|_| Error::Corrupt(PathBuf::new(), format!("digest has {} bytes", bytes.len())))?;
    Ok(Digest::from_bytes(array))
}

/// Which buckets a search or clean operation should scan.
pub fn resolve_targets(handle: &Handle, requested: &[BucketName]) -> Result<Vec<BucketName>, Error> {
    if requested.is_empty() {
        handle.buckets()
    } else {
        let known: HashSet<BucketName> = handle.buckets()?.into_iter().collect();
        requested
            .iter()
            .map(|name| {
                if known.contains(name) {
                    Ok(name.clone())
                } else {
                    Err(Error::BucketNotFound(name.clone()))
                }
            })
            .collect()
    }
}
