//! In-memory view of a persisted collection that follows every change.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use pantry_core::{Keyed, ProductId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::notifier::Subscription;
use crate::persisted::{ChangeEvent, PersistedCollection};
use crate::storage::StorageEvent;

type View<T> = RwLock<Vec<T>>;

/// A consumer's copy of one persisted collection.
///
/// On creation it loads the collection and subscribes to both the
/// same-context notifier and the medium's cross-context signal. On either
/// signal for its key it reloads and replaces its copy wholesale. Dropping it
/// releases both subscriptions.
pub struct LiveCollection<T> {
    store: PersistedCollection<T>,
    view: Arc<View<T>>,
    _local: Subscription,
    _remote: Subscription,
}

impl<T> LiveCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub(crate) fn attach(store: PersistedCollection<T>) -> Self {
        let view = Arc::new(RwLock::new(store.load()));
        let context = store.context();

        let local = {
            let store = store.clone();
            let view = Arc::downgrade(&view);
            context.events().subscribe(move |event: &ChangeEvent| {
                if event.key == store.key() {
                    resync(&store, &view);
                }
            })
        };

        let remote = {
            let store = store.clone();
            let view = Arc::downgrade(&view);
            context.medium().watch(
                context.id(),
                Box::new(move |event: &StorageEvent| {
                    if event.affects(store.key()) {
                        resync(&store, &view);
                    }
                }),
            )
        };

        Self {
            store,
            view,
            _local: local,
            _remote: remote,
        }
    }

    /// Run `apply` against the latest persisted value; see
    /// [`PersistedCollection::mutate`]. The view is refreshed by the
    /// resulting change signal, before this returns.
    pub fn mutate<F>(&self, apply: F) -> bool
    where
        F: FnOnce(&mut Vec<T>) -> bool,
    {
        self.store.mutate(apply)
    }

    /// Re-read the persisted value into the view.
    pub fn reload(&self) {
        *self.view.write().unwrap_or_else(PoisonError::into_inner) = self.store.load();
    }
}

impl<T> LiveCollection<T> {
    /// Borrow the current view.
    pub fn with<R>(&self, read: impl FnOnce(&[T]) -> R) -> R {
        let guard = self.view.read().unwrap_or_else(PoisonError::into_inner);
        read(guard.as_slice())
    }

    /// The storage key this view follows.
    #[must_use]
    pub fn key(&self) -> &str {
        self.store.key()
    }
}

impl<T: Clone> LiveCollection<T> {
    /// Clone of the current view.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.with(<[T]>::to_vec)
    }
}

impl<T: Keyed> LiveCollection<T> {
    /// Whether the view holds an entry for `id`.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.with(|items| items.iter().any(|item| item.product_id() == id))
    }
}

impl<T> fmt::Debug for LiveCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveCollection")
            .field("key", &self.store.key())
            .field(
                "len",
                &self.view.read().unwrap_or_else(PoisonError::into_inner).len(),
            )
            .finish_non_exhaustive()
    }
}

fn resync<T>(store: &PersistedCollection<T>, view: &Weak<View<T>>)
where
    T: Serialize + DeserializeOwned,
{
    if let Some(view) = view.upgrade() {
        let latest = store.load();
        trace!(key = store.key(), len = latest.len(), "resynced view");
        *view.write().unwrap_or_else(PoisonError::into_inner) = latest;
    }
}

/// Find the entry keyed by `id`.
pub(crate) fn find_mut<'a, T: Keyed>(items: &'a mut [T], id: &ProductId) -> Option<&'a mut T> {
    items.iter_mut().find(|item| item.product_id() == id)
}

/// Remove the entry keyed by `id`; returns whether one was removed.
pub(crate) fn remove_keyed<T: Keyed>(items: &mut Vec<T>, id: &ProductId) -> bool {
    let before = items.len();
    items.retain(|item| item.product_id() != id);
    items.len() != before
}
