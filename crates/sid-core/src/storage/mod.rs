pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::Result;

use std::sync::Arc;

/// A host-provided key-value surface for small string values.
///
/// The contract is deliberately narrow: `get` returns whatever string is
/// stored under a key (or `None`), and `set` durably replaces it. There is
/// no remove - callers that need to record absence write a sentinel value
/// instead.
pub trait KeyValueStorage {
    /// Look up the value stored under `key`.
    ///
    /// `Ok(None)` means the key has never been written; errors mean the
    /// surface itself could not be consulted.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Durably associate `value` with `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// An `Arc`-shared surface is itself a surface, so a store and its embedder
/// can hold handles to the same backend.
impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
