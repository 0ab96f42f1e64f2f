//! Integration tests for Pantry.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pantry-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cross_context` - several tabs of one shopper profile sharing a medium
//! - `file_persistence` - carts and wishlists surviving a restart on disk
//!
//! The helpers below model one shopper profile (a shared storage medium) and
//! the tabs opened on it.

use std::sync::Arc;

use pantry_core::{Price, ProductId, ProductSnapshot};
use pantry_storefront::{MemoryStorage, RecordingNotices, StorageMedium, StoreConfig, StoreContext};

/// A browser profile: one storage medium shared by every tab.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub storage: MemoryStorage,
}

impl Profile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new tab on this profile.
    #[must_use]
    pub fn open_tab(&self) -> Tab {
        open_tab(Arc::new(self.storage.clone()))
    }
}

/// One browsing context plus the notices it raised.
#[derive(Debug, Clone)]
pub struct Tab {
    pub context: StoreContext,
    pub notices: RecordingNotices,
}

/// Open a tab over an arbitrary medium.
#[must_use]
pub fn open_tab(medium: Arc<dyn StorageMedium>) -> Tab {
    let notices = RecordingNotices::new();
    let context =
        StoreContext::with_notices(StoreConfig::default(), medium, Arc::new(notices.clone()));
    Tab { context, notices }
}

/// Build a product id, panicking on blank input.
///
/// # Panics
///
/// Panics if `raw` is blank.
#[must_use]
#[allow(clippy::expect_used)]
pub fn pid(raw: &str) -> ProductId {
    ProductId::parse(raw).expect("test product id")
}

/// Apple, 180 per unit, 5 in stock.
#[must_use]
pub fn apple() -> ProductSnapshot {
    ProductSnapshot::new(pid("p1"), "Apple", Price::from(180), 5).with_slug("apple")
}

/// Banana, 90 per unit, 12 in stock.
#[must_use]
pub fn banana() -> ProductSnapshot {
    ProductSnapshot::new(pid("p2"), "Banana", Price::from(90), 12).with_slug("banana")
}

/// Whole milk, 60 per unit, 10 in stock.
#[must_use]
pub fn milk() -> ProductSnapshot {
    ProductSnapshot::new(pid("p3"), "Whole Milk", Price::from(60), 10).with_slug("whole-milk")
}
