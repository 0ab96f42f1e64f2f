//! Durable key-value media the collections are persisted into.
//!
//! A medium is shared by every [`StoreContext`](crate::StoreContext) of one
//! shopper profile, the way a browser's local storage is shared by all tabs
//! of an origin. Besides get/set/remove it provides the native change signal:
//! a write made by one context is announced to watchers in every *other*
//! context, never to the writer itself.
//!
//! # Implementations
//!
//! - [`MemoryStorage`] - in-process map, the default for tests and embedding
//! - [`FileStorage`] - one JSON file per key, survives restarts

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::fmt;

use crate::error::{Result, StorageError};
use crate::notifier::{Notifier, Subscription};
use crate::state::ContextId;

/// Native change signal raised by a medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Key that changed, or `None` when the whole medium was cleared.
    pub key: Option<String>,
    /// Context that performed the write.
    pub origin: ContextId,
}

impl StorageEvent {
    /// Whether this event may have changed `key`.
    #[must_use]
    pub fn affects(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|k| k == key)
    }
}

/// Listener invoked for cross-context storage events.
pub type StorageListener = Box<dyn Fn(&StorageEvent) + Send + Sync>;

/// A synchronous, string-keyed, durable key-value slot.
pub trait StorageMedium: Send + Sync + fmt::Debug {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key` on behalf of `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium rejects the write.
    fn set_item(&self, origin: ContextId, key: &str, value: &str) -> Result<()>;

    /// Delete `key` on behalf of `origin`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium rejects the delete.
    fn remove_item(&self, origin: ContextId, key: &str) -> Result<()>;

    /// Watch for writes made by contexts other than `context`.
    #[must_use = "dropping the subscription stops watching"]
    fn watch(&self, context: ContextId, listener: StorageListener) -> Subscription;
}

/// Cross-context fan-out shared by the medium implementations.
#[derive(Debug, Clone, Default)]
pub(crate) struct CrossContextSignal {
    notifier: Notifier<StorageEvent>,
}

impl CrossContextSignal {
    pub(crate) fn watch(&self, context: ContextId, listener: StorageListener) -> Subscription {
        self.notifier.subscribe(move |event: &StorageEvent| {
            if event.origin != context {
                listener(event);
            }
        })
    }

    pub(crate) fn fire(&self, origin: ContextId, key: Option<&str>) {
        self.notifier.publish(&StorageEvent {
            key: key.map(str::to_string),
            origin,
        });
    }

    #[cfg(test)]
    pub(crate) fn watcher_count(&self) -> usize {
        self.notifier.listener_count()
    }
}

/// Maximum length of a storage key.
pub const MAX_KEY_LENGTH: usize = 128;

/// Check that `key` is usable by every medium: 1-128 characters from
/// `[A-Za-z0-9_.-]`, not starting with a dot.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] otherwise.
pub fn validate_key(key: &str) -> Result<()> {
    let valid_chars = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if key.is_empty() || key.len() > MAX_KEY_LENGTH || !valid_chars || key.starts_with('.') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
