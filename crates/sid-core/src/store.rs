//! The user identity store: one optional identifier, written through to a
//! persistent key-value surface.
//!
//! The store is the single source of truth for "who is the current user"
//! while the application runs; the storage surface makes the answer survive
//! restarts. Every mutation updates the in-memory value first and then
//! mirrors it to storage under [`USER_ID_KEY`], so the two only drift for
//! the duration of a failed write (which is logged and repaired by the next
//! successful set).
//!
//! ## Absence encoding
//!
//! Clearing the user writes the literal string `"null"` to storage rather
//! than removing the key, and initialization reads whatever is stored back
//! verbatim - a previously written `"null"` comes back as that string, not
//! as "no user". Stored data from existing deployments depends on this
//! round trip, so both halves are kept exactly as they are.

use crate::storage::KeyValueStorage;

use log::{debug, info, warn};

/// Storage key the identifier is persisted under.
pub const USER_ID_KEY: &str = "userId";

/// Literal written to storage when the user is cleared.
///
/// Note the asymmetry: this sentinel is written on clear but never decoded
/// on load - [`UserIdentityStore::new`] returns it verbatim.
pub const ABSENT_USER_VALUE: &str = "null";

/// Holds the current user identifier and keeps a persistent key-value
/// surface in sync with it.
///
/// Construct one per application session and hand it to whatever needs the
/// identity; there is no global instance. The identifier is only readable
/// through [`user_id`](Self::user_id) and only writable through
/// [`set_user_id`](Self::set_user_id).
pub struct UserIdentityStore<S> {
    storage: S,
    user_id: Option<String>,
}

impl<S: KeyValueStorage> UserIdentityStore<S> {
    /// Creates a store over `storage`, initializing the in-memory value
    /// from the persisted one.
    ///
    /// An absent key and an unreadable surface both initialize to "no
    /// user"; read failures are logged, never surfaced. Whatever string is
    /// persisted is adopted as-is, including the [`ABSENT_USER_VALUE`]
    /// sentinel left behind by an earlier clear.
    pub fn new(storage: S) -> Self {
        let user_id = match storage.get(USER_ID_KEY) {
            Ok(Some(id)) => {
                info!("Loaded persisted user id: {id}");
                Some(id)
            }
            Ok(None) => {
                info!("No persisted user id (first run)");
                None
            }
            Err(e) => {
                warn!("Failed to read persisted user id, starting without one: {e}");
                None
            }
        };

        Self { storage, user_id }
    }

    /// Current user identifier, if one is set.
    ///
    /// Answers from memory only; the storage surface is never consulted
    /// here.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Sets or clears the user identifier and writes it through to storage.
    ///
    /// The in-memory value is updated unconditionally. If the durable write
    /// fails, the failure is logged and the session continues with the
    /// in-memory value as the authority; the next successful set repairs
    /// the persisted copy. Clearing writes the [`ABSENT_USER_VALUE`]
    /// sentinel rather than removing the key.
    pub fn set_user_id(&mut self, id: Option<String>) {
        self.user_id = id;

        let value = self.user_id.as_deref().unwrap_or(ABSENT_USER_VALUE);
        match self.storage.set(USER_ID_KEY, value) {
            Ok(()) => debug!("Persisted user id: {value}"),
            Err(e) => {
                warn!("Failed to persist user id, keeping in-memory value: {e}");
                if !e.is_transient() {
                    warn!("Storage hint: {}", e.recovery_hint());
                }
            }
        }
    }

    /// The storage surface this store writes through to.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
