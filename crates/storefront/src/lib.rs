//! Pantry Storefront library.
//!
//! Client-side cart and wishlist store. Collections are persisted as JSON
//! into a shared key-value [`storage`] medium, and every live consumer
//! ([`Cart`], [`Wishlist`]) re-syncs whenever the collection changes, whether
//! the change came from its own context or from another one.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use pantry_core::{Price, ProductId, ProductSnapshot};
//! use pantry_storefront::{MemoryStorage, StoreConfig, StoreContext};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let tab = StoreContext::new(StoreConfig::default(), storage);
//! let cart = tab.cart();
//!
//! let apple = ProductSnapshot::new(ProductId::parse("p1").unwrap(), "Apple", Price::from(180), 5);
//! cart.add_to_cart(&apple, 1);
//!
//! assert_eq!(cart.cart_total(), Price::from(180));
//! assert_eq!(cart.cart_count(), 1);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod live;
pub mod notices;
pub mod notifier;
pub mod persisted;
pub mod state;
pub mod storage;
pub mod wishlist;

pub use cart::Cart;
pub use config::{ConfigError, StoreConfig};
pub use error::{PersistError, StorageError};
pub use notices::{Notice, NoticeLevel, NoticeSink, RecordingNotices, TracingNotices};
pub use notifier::{Notifier, Subscription};
pub use persisted::{ChangeEvent, PersistedCollection};
pub use state::{ContextId, StoreContext};
pub use storage::{FileStorage, MemoryStorage, StorageEvent, StorageMedium};
pub use wishlist::Wishlist;
