//! Registry of live entry managers
//!
//! The registry owns the set of currently-live backend handles, keyed by
//! logical name plus qualifier. At most one handle is visible per key at any
//! instant; a swap replaces the mapping atomically, so concurrent readers see
//! either the old or the new handle, never a gap.
//!
//! The registry never destroys a handle itself. `install` and `remove` hand
//! the displaced handle back to the caller, which destroys it once no
//! in-flight consumer relies on it (ordering owned by the lifecycle
//! controller).

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

use dirstore_core::{BackendHandle, StoreQualifier};

/// Registry key: logical store name plus instance qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub logical_name: String,
    pub qualifier: StoreQualifier,
}

impl EntryKey {
    pub fn new(logical_name: impl Into<String>, qualifier: StoreQualifier) -> Self {
        Self {
            logical_name: logical_name.into(),
            qualifier,
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.logical_name, self.qualifier)
    }
}

/// Owns the currently-live entry managers
pub struct EntryManagerRegistry {
    entries: RwLock<HashMap<EntryKey, BackendHandle>>,
}

impl EntryManagerRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the handle installed under `key`, if any
    pub fn get(&self, key: &EntryKey) -> Option<BackendHandle> {
        let handle = self.entries.read().get(key).cloned();
        if handle.is_none() {
            tracing::debug!(entry = %key, "entry manager not found in registry");
        }
        handle
    }

    /// Atomically install `handle` under `key`, returning the displaced
    /// handle if one was present.
    ///
    /// The displaced handle is NOT destroyed here; the caller destroys it
    /// after the swap so that the key never resolves to nothing while in
    /// active use.
    pub fn install(&self, key: EntryKey, handle: BackendHandle) -> Option<BackendHandle> {
        tracing::debug!(entry = %key, instance = %handle.instance_id(), "installing entry manager");
        self.entries.write().insert(key, handle)
    }

    /// Detach and return the handle under `key` without destroying it
    pub fn remove(&self, key: &EntryKey) -> Option<BackendHandle> {
        let handle = self.entries.write().remove(key);
        if let Some(handle) = &handle {
            tracing::debug!(entry = %key, instance = %handle.instance_id(), "removed entry manager");
        }
        handle
    }

    /// Detach every handle, returning them with their keys. Used at shutdown.
    pub fn drain(&self) -> Vec<(EntryKey, BackendHandle)> {
        self.entries.write().drain().collect()
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Keys of all installed entries
    pub fn keys(&self) -> Vec<EntryKey> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for EntryManagerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
