//! Wishlist consumer.

use std::sync::Arc;

use chrono::Utc;
use pantry_core::{ProductId, ProductSnapshot, WishlistEntry};
use tracing::instrument;

use crate::live::{LiveCollection, remove_keyed};
use crate::notices::{Notice, NoticeSink};
use crate::state::StoreContext;

/// A live view of the wishlist with its mutation API.
#[derive(Debug)]
pub struct Wishlist {
    entries: LiveCollection<WishlistEntry>,
    notices: Arc<dyn NoticeSink>,
}

impl Wishlist {
    pub(crate) fn attach(context: &StoreContext) -> Self {
        let key = context.config().wishlist_key.clone();
        Self {
            entries: LiveCollection::attach(context.collection(key)),
            notices: Arc::clone(context.notices()),
        }
    }

    /// Save `product`, stamped with the current time.
    ///
    /// A product already on the wishlist is left untouched and reported with
    /// [`Notice::AlreadyInWishlist`]. No notice is raised when the write fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_wishlist(&self, product: &ProductSnapshot) {
        let mut already_saved = false;
        let added = self.entries.mutate(|entries| {
            if entries.iter().any(|e| e.product_id == product.id) {
                already_saved = true;
                return false;
            }
            entries.push(WishlistEntry::from_snapshot(product, Utc::now()));
            true
        });

        if already_saved {
            self.notices.notify(&Notice::AlreadyInWishlist {
                product_id: product.id.clone(),
            });
        } else if added {
            self.notices.notify(&Notice::AddedToWishlist {
                product_id: product.id.clone(),
                name: product.name.clone(),
            });
        }
    }

    /// Drop `product_id` from the wishlist, if present.
    #[instrument(skip(self))]
    pub fn remove_from_wishlist(&self, product_id: &ProductId) {
        if self.entries.mutate(|entries| remove_keyed(entries, product_id)) {
            self.notices.notify(&Notice::RemovedFromWishlist {
                product_id: product_id.clone(),
            });
        }
    }

    /// Remove `product` if it is saved, otherwise save it.
    pub fn toggle_wishlist(&self, product: &ProductSnapshot) {
        if self.is_in_wishlist(&product.id) {
            self.remove_from_wishlist(&product.id);
        } else {
            self.add_to_wishlist(product);
        }
    }

    /// Empty the wishlist.
    #[instrument(skip(self))]
    pub fn clear_wishlist(&self) {
        self.entries.mutate(|entries| {
            entries.clear();
            true
        });
    }

    /// Whether `product_id` is saved.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.entries.contains(product_id)
    }

    /// Saved entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<WishlistEntry> {
        self.entries.snapshot()
    }

    /// Number of saved entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.with(<[WishlistEntry]>::len)
    }

    /// Force a re-read of the persisted wishlist.
    pub fn reload(&self) {
        self.entries.reload();
    }
}
