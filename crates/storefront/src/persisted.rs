//! JSON collections persisted under a fixed storage key.
//!
//! The persisted value is a JSON array of entities. Reading is tolerant: an
//! absent key, an unreadable medium or malformed JSON all read as an empty
//! collection. Writing always goes through [`PersistedCollection::save`], which
//! announces the change to every consumer in the same context (the medium
//! announces it to the other contexts).

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::error::PersistError;
use crate::state::StoreContext;

/// Same-context change signal published after every successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Storage key that was written.
    pub key: String,
}

/// A collection of `T` stored as JSON under one key of the context's medium.
pub struct PersistedCollection<T> {
    context: StoreContext,
    key: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> PersistedCollection<T> {
    pub(crate) fn new(context: StoreContext, key: impl Into<String>) -> Self {
        Self {
            context,
            key: key.into(),
            _entity: PhantomData,
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The owning context.
    #[must_use]
    pub const fn context(&self) -> &StoreContext {
        &self.context
    }
}

impl<T> PersistedCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Read the latest persisted collection.
    ///
    /// Never fails: anything unreadable is logged and treated as empty.
    #[must_use]
    pub fn load(&self) -> Vec<T> {
        match self.try_load() {
            Ok(items) => items,
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding unreadable persisted collection");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<T>, PersistError> {
        match self.context.medium().get_item(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the persisted collection and notify this context.
    ///
    /// Returns whether the write went through. A write the medium rejects is
    /// logged and leaves both the stored value and every consumer untouched.
    pub fn save(&self, items: &[T]) -> bool {
        match self.try_save(items) {
            Ok(()) => {
                debug!(key = %self.key, len = items.len(), context = %self.context.id(), "saved collection");
                self.context.events().publish(&ChangeEvent {
                    key: self.key.clone(),
                });
                true
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to persist collection");
                false
            }
        }
    }

    fn try_save(&self, items: &[T]) -> Result<(), PersistError> {
        let raw = serde_json::to_string(items)?;
        self.context
            .medium()
            .set_item(self.context.id(), &self.key, &raw)?;
        Ok(())
    }

    /// Read the latest value, let `apply` edit it, and save if it reports a change.
    ///
    /// Returns whether anything was saved: `false` when `apply` made no
    /// change or the medium rejected the write. There is no lock across
    /// contexts: when two contexts mutate concurrently the later save wins.
    pub fn mutate<F>(&self, apply: F) -> bool
    where
        F: FnOnce(&mut Vec<T>) -> bool,
    {
        let mut items = self.load();
        apply(&mut items) && self.save(&items)
    }
}

impl<T> Clone for PersistedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            key: self.key.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> fmt::Debug for PersistedCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedCollection")
            .field("key", &self.key)
            .field("context", &self.context.id())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::DateTime;
    use pantry_core::{CartLineItem, Price, ProductId, ProductSnapshot, WishlistEntry};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;
    use crate::config::StoreConfig;
    use crate::error::StorageError;
    use crate::notifier::Subscription;
    use crate::state::ContextId;
    use crate::storage::testing::RejectWrites;
    use crate::storage::{MemoryStorage, StorageListener, StorageMedium};

    fn line(id: &str, qty: u32) -> CartLineItem {
        let product = ProductSnapshot::new(ProductId::parse(id).unwrap(), id, Price::from(10), 9);
        CartLineItem::from_snapshot(&product, qty)
    }

    fn context() -> (MemoryStorage, StoreContext) {
        let storage = MemoryStorage::new();
        let ctx = StoreContext::new(StoreConfig::default(), Arc::new(storage.clone()));
        (storage, ctx)
    }

    #[derive(Debug)]
    struct ReadOnlyStorage;

    impl StorageMedium for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> crate::error::Result<Option<String>> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn set_item(&self, _: ContextId, _: &str, _: &str) -> crate::error::Result<()> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove_item(&self, _: ContextId, _: &str) -> crate::error::Result<()> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn watch(&self, _: ContextId, _: StorageListener) -> Subscription {
            Subscription::new(|| {})
        }
    }

    #[test]
    fn test_absent_key_loads_empty() {
        let (_, ctx) = context();
        let cart = ctx.collection::<CartLineItem>("cart");
        assert!(cart.load().is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let (_, ctx) = context();
        let cart = ctx.collection::<CartLineItem>("cart");

        let items = vec![line("p1", 1), line("p2", 3)];
        assert!(cart.save(&items));
        assert_eq!(cart.load(), items);

        assert!(cart.save(&[]));
        assert!(cart.load().is_empty());
    }

    #[test]
    fn test_malformed_value_loads_empty() {
        let (storage, ctx) = context();
        let cart = ctx.collection::<CartLineItem>("cart");

        for raw in ["not json", "{\"productId\":\"p1\"}", "[{\"bogus\":true}]", ""] {
            storage.set_item(ContextId::EXTERNAL, "cart", raw).unwrap();
            assert!(cart.load().is_empty(), "expected empty for {raw:?}");
        }
    }

    #[test]
    fn test_unavailable_medium_is_tolerated() {
        let ctx = StoreContext::new(StoreConfig::default(), Arc::new(ReadOnlyStorage));
        let cart = ctx.collection::<CartLineItem>("cart");
        let published = Arc::new(AtomicUsize::new(0));
        let _sub = {
            let published = Arc::clone(&published);
            ctx.events().subscribe(move |_| {
                published.fetch_add(1, Ordering::SeqCst);
            })
        };

        assert!(cart.load().is_empty());
        assert!(!cart.save(&[line("p1", 1)]));
        assert_eq!(published.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_mutate_reports_rejected_write() {
        let storage = RejectWrites::new();
        let ctx = StoreContext::new(StoreConfig::default(), Arc::new(storage.clone()));
        let cart = ctx.collection::<CartLineItem>("cart");

        let saved = cart.mutate(|items| {
            items.push(line("p1", 1));
            true
        });

        assert!(!saved);
        assert!(cart.load().is_empty());
        assert!(storage.inner().is_empty());
    }

    #[test]
    fn test_save_publishes_same_context_event() {
        let (_, ctx) = context();
        let cart = ctx.collection::<CartLineItem>("cart");
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let _sub = {
            let seen = Arc::clone(&seen);
            ctx.events()
                .subscribe(move |e: &ChangeEvent| seen.lock().unwrap().push(e.key.clone()))
        };

        cart.save(&[line("p1", 1)]);
        assert_eq!(*seen.lock().unwrap(), vec!["cart".to_string()]);
    }

    #[test]
    fn test_mutate_skips_save_when_unchanged() {
        let (storage, ctx) = context();
        let cart = ctx.collection::<CartLineItem>("cart");

        assert!(!cart.mutate(|_| false));
        assert!(storage.is_empty());

        assert!(cart.mutate(|items| {
            items.push(line("p1", 2));
            true
        }));
        assert_eq!(cart.load(), vec![line("p1", 2)]);
    }

    #[test]
    fn test_mutate_reads_latest_persisted_value() {
        let (storage, ctx) = context();
        let cart = ctx.collection::<CartLineItem>("cart");
        cart.save(&[line("p1", 1)]);

        let other = serde_json::to_string(&vec![line("p2", 4)]).unwrap();
        storage.set_item(ContextId::EXTERNAL, "cart", &other).unwrap();

        cart.mutate(|items| {
            items.push(line("p3", 1));
            true
        });
        assert_eq!(cart.load(), vec![line("p2", 4), line("p3", 1)]);
    }

    fn price() -> impl Strategy<Value = Price> {
        (0..10_000_000i64, 0..6u32).prop_map(|(mantissa, scale)| Price::new(Decimal::new(mantissa, scale)))
    }

    fn snapshot() -> impl Strategy<Value = ProductSnapshot> {
        (
            "[a-z0-9]{1,12}",
            "\\PC{0,24}",
            price(),
            proptest::option::of("/img/[a-z-]{1,16}\\.png"),
            "[a-z-]{0,16}",
            any::<u32>(),
        )
            .prop_map(|(id, name, price, image, slug, stock)| {
                let mut product = ProductSnapshot::new(ProductId::parse(&id).unwrap(), name, price, stock)
                    .with_slug(slug);
                product.image = image;
                product
            })
    }

    fn cart_line() -> impl Strategy<Value = CartLineItem> {
        (snapshot(), 1..=u32::MAX).prop_map(|(product, qty)| CartLineItem::from_snapshot(&product, qty))
    }

    fn wishlist_entry() -> impl Strategy<Value = WishlistEntry> {
        (snapshot(), 0..4_000_000_000i64, 0..1_000_000_000u32).prop_map(|(product, secs, nanos)| {
            WishlistEntry::from_snapshot(&product, DateTime::from_timestamp(secs, nanos).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_cart_roundtrip(items in prop::collection::vec(cart_line(), 0..8)) {
            let (_, ctx) = context();
            let cart = ctx.collection::<CartLineItem>("cart");
            prop_assert!(cart.save(&items));
            prop_assert_eq!(cart.load(), items);
        }

        #[test]
        fn prop_wishlist_roundtrip(entries in prop::collection::vec(wishlist_entry(), 0..8)) {
            let (_, ctx) = context();
            let wishlist = ctx.collection::<WishlistEntry>("wishlist");
            prop_assert!(wishlist.save(&entries));
            prop_assert_eq!(wishlist.load(), entries);
        }
    }
}
