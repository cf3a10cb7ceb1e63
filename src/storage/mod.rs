//! Persistence of finished artifacts.
//!
//! Each item is stored as `{identifier}.png`. Writing the same identifier
//! twice overwrites the earlier file. Identifiers must be plain file names so
//! every artifact lands directly inside the output directory.

use crate::core::error::WriteError;
use log::info;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// File extension of stored artifacts.
pub const OUTPUT_EXTENSION: &str = "png";

/// Reject identifiers that are not a single plain file name: empty, absolute,
/// `.`/`..`, or containing a path separator.
pub fn check_identifier(identifier: &str) -> Result<(), WriteError> {
    let mut components = Path::new(identifier).components();
    let plain = !identifier.contains(['/', '\\'])
        && matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
    if plain {
        Ok(())
    } else {
        Err(WriteError::InvalidIdentifier {
            identifier: identifier.to_string(),
        })
    }
}

/// Capability to persist encoded artifacts by identifier.
pub trait AssetStorage: Send + Sync {
    /// Make the storage ready for writes. Idempotent.
    fn prepare(&self) -> Result<(), WriteError>;

    /// Store `bytes` for `identifier`, replacing any previous artifact.
    /// Returns the location written.
    fn write(&self, identifier: &str, bytes: &[u8]) -> Result<PathBuf, WriteError>;
}

/// Stores artifacts as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    /// Storage rooted at `root`. Nothing is created until [`prepare`](AssetStorage::prepare).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an identifier is written to, always directly under [`root`](Self::root).
    pub fn path_for(&self, identifier: &str) -> Result<PathBuf, WriteError> {
        check_identifier(identifier)?;
        Ok(self.root.join(format!("{}.{}", identifier, OUTPUT_EXTENSION)))
    }
}

impl AssetStorage for DirectoryStorage {
    fn prepare(&self) -> Result<(), WriteError> {
        if self.root.is_dir() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.root).map_err(|source| WriteError::Io {
            path: self.root.clone(),
            source,
        })?;
        info!("Created output folder: {}", self.root.display());
        Ok(())
    }

    fn write(&self, identifier: &str, bytes: &[u8]) -> Result<PathBuf, WriteError> {
        let path = self.path_for(identifier)?;
        std::fs::write(&path, bytes).map_err(|source| WriteError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Keeps artifacts in memory, keyed by identifier.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored for `identifier`.
    pub fn get(&self, identifier: &str) -> Option<Vec<u8>> {
        self.files.lock().get(identifier).cloned()
    }

    /// Stored identifiers in sorted order.
    pub fn identifiers(&self) -> Vec<String> {
        self.files.lock().keys().cloned().collect()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

impl AssetStorage for MemoryStorage {
    fn prepare(&self) -> Result<(), WriteError> {
        Ok(())
    }

    fn write(&self, identifier: &str, bytes: &[u8]) -> Result<PathBuf, WriteError> {
        check_identifier(identifier)?;
        self.files.lock().insert(identifier.to_string(), bytes.to_vec());
        Ok(PathBuf::from(format!("{}.{}", identifier, OUTPUT_EXTENSION)))
    }
}

impl<S: AssetStorage + ?Sized> AssetStorage for &S {
    fn prepare(&self) -> Result<(), WriteError> {
        (**self).prepare()
    }

    fn write(&self, identifier: &str, bytes: &[u8]) -> Result<PathBuf, WriteError> {
        (**self).write(identifier, bytes)
    }
}

impl<S: AssetStorage + ?Sized> AssetStorage for std::sync::Arc<S> {
    fn prepare(&self) -> Result<(), WriteError> {
        (**self).prepare()
    }

    fn write(&self, identifier: &str, bytes: &[u8]) -> Result<PathBuf, WriteError> {
        (**self).write(identifier, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_creates_nested_dir_idempotently() {
        let temp = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(temp.path().join("a").join("b"));
        storage.prepare().unwrap();
        storage.prepare().unwrap();
        assert!(storage.root().is_dir());
    }

    #[test]
    fn test_write_and_overwrite() {
        let temp = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(temp.path());
        storage.prepare().unwrap();

        let path = storage.write("25", b"first").unwrap();
        assert_eq!(path, temp.path().join("25.png"));
        storage.write("25", b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let temp = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(temp.path().join("missing"));
        let err = storage.write("1", b"x").unwrap_err();
        assert!(err.to_string().contains("1.png"));
    }

    #[test]
    fn test_identifiers_cannot_leave_output_dir() {
        let temp = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(temp.path().join("out"));
        storage.prepare().unwrap();

        let outside = temp.path().join("escaped");
        let absolute = outside.to_str().unwrap().to_string();
        for identifier in [absolute.as_str(), "../escaped", "a/b", "a\\b", "..", ".", ""] {
            let err = storage.write(identifier, b"x").unwrap_err();
            assert!(
                matches!(err, WriteError::InvalidIdentifier { .. }),
                "{:?} should be rejected",
                identifier
            );
        }
        assert!(!temp.path().join("escaped.png").exists());
        assert_eq!(std::fs::read_dir(storage.root()).unwrap().count(), 0);
    }

    #[test]
    fn test_plain_identifiers_accepted() {
        for identifier in ["25", "mr-mime", "farfetch'd", "a.b", "..."] {
            assert!(check_identifier(identifier).is_ok(), "{}", identifier);
        }
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());
        storage.write("b", b"1").unwrap();
        storage.write("a", b"2").unwrap();
        storage.write("b", b"3").unwrap();
        assert_eq!(storage.identifiers(), vec!["a", "b"]);
        assert_eq!(storage.get("b").unwrap(), b"3");
    }
}
