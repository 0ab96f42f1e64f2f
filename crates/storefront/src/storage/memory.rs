//! In-process storage medium.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::{CrossContextSignal, StorageListener, StorageMedium};
use crate::error::Result;
use crate::notifier::Subscription;
use crate::state::ContextId;

/// A shared in-memory key-value medium.
///
/// Clones share the same map and the same change signal, so contexts built
/// over clones of one `MemoryStorage` behave like tabs of one browser profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<MemoryStorageInner>,
}

#[derive(Debug, Default)]
struct MemoryStorageInner {
    items: RwLock<HashMap<String, String>>,
    signal: CrossContextSignal,
}

impl MemoryStorage {
    /// Create an empty medium.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wipe every key, as a user clearing site data would.
    ///
    /// Every watching context is told; no context is the origin.
    pub fn clear(&self) {
        self.inner
            .items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!("memory storage cleared");
        self.inner.signal.fire(ContextId::EXTERNAL, None);
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageMedium for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .inner
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set_item(&self, origin: ContextId, key: &str, value: &str) -> Result<()> {
        self.inner
            .items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self.inner.signal.fire(origin, Some(key));
        Ok(())
    }

    fn remove_item(&self, origin: ContextId, key: &str) -> Result<()> {
        let removed = self
            .inner
            .items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some();
        if removed {
            self.inner.signal.fire(origin, Some(key));
        }
        Ok(())
    }

    fn watch(&self, context: ContextId, listener: StorageListener) -> Subscription {
        self.inner.signal.watch(context, listener)
    }
}
