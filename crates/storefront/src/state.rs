//! Per-context store state shared by every consumer in that context.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::cart::Cart;
use crate::config::StoreConfig;
use crate::notices::{NoticeSink, TracingNotices};
use crate::notifier::Notifier;
use crate::persisted::{ChangeEvent, PersistedCollection};
use crate::storage::StorageMedium;
use crate::wishlist::Wishlist;

/// Identity of one browsing context (tab, window, process).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Origin of writes that no context made, such as an external wipe.
    pub const EXTERNAL: Self = Self(Uuid::nil());

    /// A fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One browsing context's view of the shared storage medium.
///
/// This struct is cheaply cloneable via `Arc`. Every [`Cart`] and
/// [`Wishlist`] created from it shares its same-context change notifier, so
/// a mutation through one consumer re-syncs all of them. Contexts built over
/// the same medium (or clones of it) converge through the medium's native
/// change signal instead.
#[derive(Clone)]
pub struct StoreContext {
    inner: Arc<StoreContextInner>,
}

struct StoreContextInner {
    id: ContextId,
    config: StoreConfig,
    medium: Arc<dyn StorageMedium>,
    events: Notifier<ChangeEvent>,
    notices: Arc<dyn NoticeSink>,
}

impl StoreContext {
    /// Create a context whose notices are logged through `tracing`.
    #[must_use]
    pub fn new(config: StoreConfig, medium: Arc<dyn StorageMedium>) -> Self {
        Self::with_notices(config, medium, Arc::new(TracingNotices))
    }

    /// Create a context delivering notices to `notices`.
    #[must_use]
    pub fn with_notices(
        config: StoreConfig,
        medium: Arc<dyn StorageMedium>,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        let id = ContextId::new();
        tracing::debug!(context = %id, "store context created");

        Self {
            inner: Arc::new(StoreContextInner {
                id,
                config,
                medium,
                events: Notifier::new(),
                notices,
            }),
        }
    }

    /// This context's identity.
    #[must_use]
    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    /// Get a reference to the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Get a reference to the shared storage medium.
    #[must_use]
    pub fn medium(&self) -> &Arc<dyn StorageMedium> {
        &self.inner.medium
    }

    /// Same-context change notifier.
    #[must_use]
    pub fn events(&self) -> &Notifier<ChangeEvent> {
        &self.inner.events
    }

    /// Get a reference to the notice sink.
    #[must_use]
    pub fn notices(&self) -> &Arc<dyn NoticeSink> {
        &self.inner.notices
    }

    /// Raw persisted collection under `key`.
    #[must_use]
    pub fn collection<T>(&self, key: impl Into<String>) -> PersistedCollection<T> {
        PersistedCollection::new(self.clone(), key)
    }

    /// A new cart consumer, subscribed until dropped.
    #[must_use]
    pub fn cart(&self) -> Cart {
        Cart::attach(self)
    }

    /// A new wishlist consumer, subscribed until dropped.
    #[must_use]
    pub fn wishlist(&self) -> Wishlist {
        Wishlist::attach(self)
    }
}

impl fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreContext")
            .field("id", &self.inner.id)
            .field("config", &self.inner.config)
            .field("medium", &self.inner.medium)
            .field("listeners", &self.inner.events.listener_count())
            .finish_non_exhaustive()
    }
}
