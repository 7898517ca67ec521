//! Durable key-value storage and the two-tier token slot.
//!
//! The slot keeps the token in memory and mirrors it to a durable store.
//! Consistency rule: once memory is populated (or cleared by logout) it is
//! authoritative; the durable store is only consulted while the slot is
//! still uninitialized.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Synchronous key-value storage surviving reloads (localStorage, a file, ...).
///
/// Adapters log their own failures; callers treat every operation as
/// infallible.
pub trait KeyValueStore {
    fn set(&self, key: &str, value: &str);
    fn get(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Arc<K> {
    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

/// Process-local store, used natively and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}

/// Lifecycle of the in-memory token cache
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotState {
    /// Nothing read yet, or the durable store had no token
    #[default]
    Uninitialized,
    /// Token cached in memory
    Loaded(String),
    /// Cleared by logout
    Cleared,
}

#[derive(Debug, Default)]
struct SlotInner {
    state: SlotState,
    epoch: u64,
}

/// Single-slot token cache in front of a durable store
#[derive(Debug)]
pub struct TokenSlot<S> {
    store: S,
    key: String,
    inner: Mutex<SlotInner>,
}

impl<S: KeyValueStore> TokenSlot<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            inner: Mutex::new(SlotInner::default()),
        }
    }

    fn inner(&self) -> MutexGuard<'_, SlotInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Durable storage key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying durable store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current lifecycle state
    pub fn state(&self) -> SlotState {
        self.inner().state.clone()
    }

    /// Number of clears so far
    pub fn epoch(&self) -> u64 {
        self.inner().epoch
    }

    /// Write through to the durable store and cache in memory
    pub fn save(&self, token: &str) {
        let mut inner = self.inner();
        self.store.set(&self.key, token);
        inner.state = SlotState::Loaded(token.to_string());
        tracing::debug!(key = %self.key, "token saved");
    }

    /// Save only if no clear happened since `epoch` was read.
    ///
    /// Returns `false` (and leaves both tiers untouched) for a stale epoch.
    pub fn save_if_current(&self, epoch: u64, token: &str) -> bool {
        let mut inner = self.inner();
        if inner.epoch != epoch {
            return false;
        }
        self.store.set(&self.key, token);
        inner.state = SlotState::Loaded(token.to_string());
        tracing::debug!(key = %self.key, "token saved");
        true
    }

    /// Cached token, reading through to the durable store while uninitialized.
    /// An empty token is reported as absent.
    pub fn load(&self) -> Option<String> {
        let mut inner = self.inner();
        match &inner.state {
            SlotState::Loaded(token) if token.is_empty() => return None,
            SlotState::Loaded(token) => return Some(token.clone()),
            SlotState::Cleared => return None,
            SlotState::Uninitialized => {}
        }
        let token = self.store.get(&self.key).filter(|token| !token.is_empty())?;
        inner.state = SlotState::Loaded(token.clone());
        tracing::debug!(key = %self.key, "token loaded from durable storage");
        Some(token)
    }

    /// Drop the token from both tiers and start a new epoch
    pub fn clear(&self) {
        let mut inner = self.inner();
        self.store.remove(&self.key);
        inner.state = SlotState::Cleared;
        inner.epoch += 1;
        tracing::debug!(key = %self.key, epoch = inner.epoch, "token cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "usertoken";

    #[test]
    fn test_memory_store_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", "1");
        store.set("a", "2");
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.remove("a");
        store.remove("missing");
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_empty_slot_loads_nothing() {
        let slot = TokenSlot::new(MemoryStore::new(), KEY);

        assert_eq!(slot.load(), None);
        assert_eq!(slot.state(), SlotState::Uninitialized);
    }

    #[test]
    fn test_save_writes_both_tiers() {
        let store = Arc::new(MemoryStore::new());
        let slot = TokenSlot::new(Arc::clone(&store), KEY);

        slot.save("h.p.s");

        assert_eq!(slot.state(), SlotState::Loaded("h.p.s".to_string()));
        assert_eq!(store.get(KEY).as_deref(), Some("h.p.s"));
        assert_eq!(slot.load().as_deref(), Some("h.p.s"));
    }

    #[test]
    fn test_load_survives_restart() {
        let store = Arc::new(MemoryStore::new());
        TokenSlot::new(Arc::clone(&store), KEY).save("first");

        let restarted = TokenSlot::new(Arc::clone(&store), KEY);
        assert_eq!(restarted.state(), SlotState::Uninitialized);
        assert_eq!(restarted.load().as_deref(), Some("first"));
        assert_eq!(restarted.state(), SlotState::Loaded("first".to_string()));
    }

    #[test]
    fn test_memory_is_authoritative_once_loaded() {
        let store = Arc::new(MemoryStore::new());
        let slot = TokenSlot::new(Arc::clone(&store), KEY);
        slot.save("cached");

        store.set(KEY, "written-elsewhere");

        assert_eq!(slot.load().as_deref(), Some("cached"));
    }

    #[test]
    fn test_uninitialized_slot_rereads_durable_store() {
        let store = Arc::new(MemoryStore::new());
        let slot = TokenSlot::new(Arc::clone(&store), KEY);
        assert_eq!(slot.load(), None);

        store.set(KEY, "late");

        assert_eq!(slot.load().as_deref(), Some("late"));
    }

    #[test]
    fn test_empty_token_is_absent() {
        let store = Arc::new(MemoryStore::new());
        let slot = TokenSlot::new(Arc::clone(&store), KEY);

        slot.save("");

        assert_eq!(store.get(KEY).as_deref(), Some(""));
        assert_eq!(slot.load(), None);
    }

    #[test]
    fn test_empty_durable_value_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store.set(KEY, "");
        let slot = TokenSlot::new(Arc::clone(&store), KEY);

        assert_eq!(slot.load(), None);
        assert_eq!(slot.state(), SlotState::Uninitialized);

        store.set(KEY, "h.p.s");
        assert_eq!(slot.load().as_deref(), Some("h.p.s"));
    }

    #[test]
    fn test_clear_removes_both_tiers_and_bumps_epoch() {
        let store = Arc::new(MemoryStore::new());
        let slot = TokenSlot::new(Arc::clone(&store), KEY);
        slot.save("h.p.s");
        assert_eq!(slot.epoch(), 0);

        slot.clear();

        assert_eq!(slot.state(), SlotState::Cleared);
        assert_eq!(slot.epoch(), 1);
        assert_eq!(slot.load(), None);
        assert_eq!(store.get(KEY), None);
    }

    #[test]
    fn test_cleared_slot_ignores_durable_store() {
        let store = Arc::new(MemoryStore::new());
        let slot = TokenSlot::new(Arc::clone(&store), KEY);
        slot.clear();

        store.set(KEY, "written-elsewhere");

        assert_eq!(slot.load(), None);
    }

    #[test]
    fn test_save_after_clear_reloads() {
        let slot = TokenSlot::new(MemoryStore::new(), KEY);
        slot.save("one");
        slot.clear();
        slot.save("two");

        assert_eq!(slot.load().as_deref(), Some("two"));
    }

    #[test]
    fn test_save_if_current_rejects_stale_epoch() {
        let store = Arc::new(MemoryStore::new());
        let slot = TokenSlot::new(Arc::clone(&store), KEY);
        let epoch = slot.epoch();

        slot.clear();

        assert!(!slot.save_if_current(epoch, "stale"));
        assert_eq!(slot.load(), None);
        assert_eq!(store.get(KEY), None);

        assert!(slot.save_if_current(slot.epoch(), "fresh"));
        assert_eq!(slot.load().as_deref(), Some("fresh"));
    }
}
