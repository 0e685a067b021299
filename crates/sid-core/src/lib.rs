pub mod error;
pub mod storage;
pub mod store;

pub use error::{Result, StorageError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{ABSENT_USER_VALUE, USER_ID_KEY, UserIdentityStore};

#[cfg(test)]
mod tests;
