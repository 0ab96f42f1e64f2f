//! Observer registry used for change signals.
//!
//! A [`Notifier`] is a tiny synchronous pub-sub: listeners register with
//! [`Notifier::subscribe`] and receive every event passed to
//! [`Notifier::publish`] until their [`Subscription`] is dropped.
//!
//! Publishing never holds the registry lock while a listener runs, so a
//! listener may itself subscribe, unsubscribe, or publish.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<E> = dyn Fn(&E) + Send + Sync;

struct Listener<E> {
    id: u64,
    active: AtomicBool,
    callback: Box<Callback<E>>,
}

struct Registry<E> {
    next_id: AtomicU64,
    listeners: Mutex<Vec<Arc<Listener<E>>>>,
}

impl<E> Registry<E> {
    fn listeners(&self) -> MutexGuard<'_, Vec<Arc<Listener<E>>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, id: u64) {
        let mut listeners = self.listeners();
        if let Some(pos) = listeners.iter().position(|l| l.id == id) {
            let listener = listeners.swap_remove(pos);
            listener.active.store(false, Ordering::Release);
        }
    }
}

/// Synchronous observer registry for events of type `E`.
///
/// Cloning a `Notifier` yields another handle to the same registry.
pub struct Notifier<E> {
    registry: Arc<Registry<E>>,
}

impl<E: 'static> Notifier<E> {
    /// Create a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register a listener. It stays registered until the returned
    /// [`Subscription`] is dropped or cancelled.
    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.listeners().push(Arc::new(Listener {
            id,
            active: AtomicBool::new(true),
            callback: Box::new(callback),
        }));

        let registry: Weak<Registry<E>> = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.release(id);
            }
        })
    }

    /// Deliver `event` to every registered listener, in registration order.
    ///
    /// A listener released while the publish is in flight is skipped.
    pub fn publish(&self, event: &E) {
        let mut snapshot = self.registry.listeners().clone();
        snapshot.sort_by_key(|l| l.id);
        for listener in snapshot {
            if listener.active.load(Ordering::Acquire) {
                (listener.callback)(event);
            }
        }
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.listeners().len()
    }
}

impl<E: 'static> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Notifier<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.registry.listeners().len())
            .finish()
    }
}

/// Registration handle returned by a subscribe call.
///
/// Dropping it releases the listener.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Release the listener now.
    pub fn cancel(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
