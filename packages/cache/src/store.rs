//! Key/value blob storage behind the caches.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Whole-value storage addressed by string keys.
///
/// Writes replace the previous value entirely; there is no append.
pub trait BlobStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the value exists but cannot be read.
    fn read(&self, key: &str) -> std::io::Result<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the value cannot be written.
    fn write(&self, key: &str, contents: &str) -> std::io::Result<()>;
}

/// Stores each key as a file under a root directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl BlobStore for FsBlobStore {
    fn read(&self, key: &str) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, contents: &str) -> std::io::Result<()> {
        crate::paths::ensure_dir(&self.root)?;
        std::fs::write(self.path_for(key), contents)
    }
}

/// Keeps values in memory and counts writes.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: Mutex<BTreeMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: bool,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write with a permission error.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seeds `key` without counting it as a write.
    #[must_use]
    pub fn with_entry(self, key: &str, contents: &str) -> Self {
        self.lock().insert(key.to_owned(), contents.to_owned());
        self
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> std::io::Result<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, contents: &str) -> std::io::Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "store is read-only",
            ));
        }
        self.lock().insert(key.to_owned(), contents.to_owned());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
