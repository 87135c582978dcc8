//! Bucket naming.

use std::fmt;
use std::path::Path;

use pathkind::absolutise;

/// The name of a bucket within an index store.
///
/// Buckets are named after the absolutised path of the directory they track,
/// so that two different invocations pointed at the same directory (however
/// the user spelled it) land in the same bucket.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct BucketName(String);

impl BucketName {
    /// Normalise `path` into a bucket name.
    pub fn normalise(path: &Path) -> Self {
        let absolute = absolutise(path).path;
        Self(absolute.to_string_lossy().into_owned())
    }

    /// Build a bucket name directly from an already-normalised string, e.g.
    /// one read back from the store's table listing.
    pub fn from_raw(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// This bucket's name as it is stored on disk.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalise_is_stable() {
        let a = BucketName::normalise(Path::new("./a/b"));
        let b = BucketName::normalise(Path::new("a/b/"));
        assert_eq!(a, b);
    }

    #[test]
    fn display_matches_as_str() {
        let name = BucketName::from_raw("/tmp/foo");
        assert_eq!(format!("{name}"), "/tmp/foo");
        assert_eq!(name.as_str(), "/tmp/foo");
    }
}
