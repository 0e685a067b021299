use crate::storage::{KeyValueStorage, MemoryStorage};
use crate::store::{ABSENT_USER_VALUE, USER_ID_KEY, UserIdentityStore};
use crate::tests::{CountingStorage, FailingStorage};

use std::sync::Arc;

use googletest::assert_that;
use googletest::prelude::{eq, none, some};

// =========================================================================
// Write-Through Tests
// =========================================================================

#[test]
fn given_empty_storage_when_set_user_id_then_memory_and_storage_agree() {
    // Given
    let mut store = UserIdentityStore::new(MemoryStorage::new());
    assert_that!(store.user_id(), none());

    // When
    store.set_user_id(Some("u-123".to_string()));

    // Then
    assert_that!(store.user_id(), some(eq("u-123")));
    assert_that!(
        store.storage().get(USER_ID_KEY).unwrap(),
        some(eq("u-123"))
    );
}

#[test]
fn given_existing_id_when_set_new_id_then_storage_holds_latest() {
    // Given
    let mut store = UserIdentityStore::new(MemoryStorage::new());
    store.set_user_id(Some("u-old".to_string()));

    // When
    store.set_user_id(Some("u-new".to_string()));

    // Then
    assert_that!(store.user_id(), some(eq("u-new")));
    assert_that!(
        store.storage().get(USER_ID_KEY).unwrap(),
        some(eq("u-new"))
    );
}

#[test]
fn given_set_user_when_cleared_then_storage_holds_null_literal() {
    // Given
    let mut store = UserIdentityStore::new(MemoryStorage::new());
    store.set_user_id(Some("u-123".to_string()));

    // When
    store.set_user_id(None);

    // Then: memory says "no user", storage says the literal sentinel
    assert_that!(store.user_id(), none());
    assert_that!(
        store.storage().get(USER_ID_KEY).unwrap(),
        some(eq(ABSENT_USER_VALUE))
    );
}

#[test]
fn given_same_id_when_set_twice_then_state_matches_single_set() {
    // Given
    let mut once = UserIdentityStore::new(MemoryStorage::new());
    once.set_user_id(Some("u-42".to_string()));

    // When
    let mut twice = UserIdentityStore::new(MemoryStorage::new());
    twice.set_user_id(Some("u-42".to_string()));
    twice.set_user_id(Some("u-42".to_string()));

    // Then
    assert_that!(twice.user_id(), eq(once.user_id()));
    assert_that!(
        twice.storage().get(USER_ID_KEY).unwrap(),
        eq(&once.storage().get(USER_ID_KEY).unwrap())
    );
}

// =========================================================================
// Initialization Tests
// =========================================================================

#[test]
fn given_empty_storage_when_constructed_then_no_user() {
    // Given
    let storage = MemoryStorage::new();

    // When
    let store = UserIdentityStore::new(storage);

    // Then
    assert_that!(store.user_id(), none());
}

#[test]
fn given_persisted_id_when_constructed_then_available_immediately() {
    // Given
    let storage = MemoryStorage::new();
    storage.set(USER_ID_KEY, "u-persisted").unwrap();

    // When
    let store = UserIdentityStore::new(storage);

    // Then: no set_user_id call was needed
    assert_that!(store.user_id(), some(eq("u-persisted")));
}

#[test]
fn given_persisted_null_literal_when_constructed_then_user_id_is_the_string_null() {
    // Given: a surface left behind by an earlier clear
    let storage = MemoryStorage::new();
    storage.set(USER_ID_KEY, ABSENT_USER_VALUE).unwrap();

    // When
    let store = UserIdentityStore::new(storage);

    // Then: the sentinel is adopted verbatim, not decoded back to absence
    assert_that!(store.user_id(), some(eq("null")));
}

// =========================================================================
// Storage Access Tests
// =========================================================================

#[test]
fn given_constructed_store_when_reading_user_id_then_storage_untouched() {
    // Given: construction performs the single initialization read
    let store = UserIdentityStore::new(CountingStorage::new(MemoryStorage::new()));
    assert_that!(store.storage().reads(), eq(1));
    assert_that!(store.storage().writes(), eq(0));

    // When
    let _ = store.user_id();
    let _ = store.user_id();

    // Then
    assert_that!(store.storage().reads(), eq(1));
    assert_that!(store.storage().writes(), eq(0));
}

#[test]
fn given_constructed_store_when_set_user_id_then_exactly_one_write() {
    // Given
    let mut store = UserIdentityStore::new(CountingStorage::new(MemoryStorage::new()));

    // When
    store.set_user_id(Some("u-7".to_string()));

    // Then
    assert_that!(store.storage().writes(), eq(1));
    assert_that!(store.storage().reads(), eq(1));
}

// =========================================================================
// Failure Policy Tests
// =========================================================================

#[test]
fn given_unavailable_storage_when_constructed_then_starts_without_user() {
    // When
    let store = UserIdentityStore::new(FailingStorage);

    // Then
    assert_that!(store.user_id(), none());
}

#[test]
fn given_unavailable_storage_when_set_user_id_then_in_memory_value_kept() {
    // Given
    let mut store = UserIdentityStore::new(FailingStorage);

    // When: the durable write fails silently
    store.set_user_id(Some("u-offline".to_string()));

    // Then: the session keeps working with the in-memory value
    assert_that!(store.user_id(), some(eq("u-offline")));
}

// =========================================================================
// Session Lifecycle Tests
// =========================================================================

#[test]
fn given_full_session_when_store_reconstructed_then_identity_survives() {
    let storage = Arc::new(MemoryStorage::new());

    // Given: a fresh session with no persisted identity
    let mut store = UserIdentityStore::new(Arc::clone(&storage));
    assert_that!(store.user_id(), none());

    // When: the user logs in and the session restarts
    store.set_user_id(Some("u-123".to_string()));
    assert_that!(store.user_id(), some(eq("u-123")));
    drop(store);

    // Then: the reconstructed store picks the identity back up
    let restarted = UserIdentityStore::new(Arc::clone(&storage));
    assert_that!(restarted.user_id(), some(eq("u-123")));
}
