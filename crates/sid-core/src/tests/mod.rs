mod store;

use crate::error::{Result, StorageError};
use crate::storage::KeyValueStorage;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Storage wrapper that counts surface accesses, for asserting which store
/// operations actually touch storage.
pub(crate) struct CountingStorage<S> {
    inner: S,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl<S> CountingStorage<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl<S: KeyValueStorage> KeyValueStorage for CountingStorage<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

/// Storage whose operations always fail, for exercising the non-fatal
/// failure policy.
pub(crate) struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(StorageError::file_read(
            PathBuf::from("/unavailable"),
            std::io::Error::other("storage offline"),
        ))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StorageError::file_write(
            PathBuf::from("/unavailable"),
            std::io::Error::other("storage offline"),
        ))
    }
}
