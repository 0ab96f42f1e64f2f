//! User-facing notices raised by cart and wishlist operations.
//!
//! Operations never fail towards their caller. When something deserves the
//! shopper's attention (stock ceiling hit, product already saved) a
//! [`Notice`] is handed to the context's [`NoticeSink`] instead, the way a
//! storefront would pop a toast.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use pantry_core::ProductId;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Something the shopper should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A product was added to the cart (or its quantity raised).
    AddedToCart {
        product_id: ProductId,
        name: String,
        quantity: u32,
    },
    /// A quantity change was refused because it would exceed the stock snapshot.
    StockLimitReached {
        product_id: ProductId,
        stock_limit: u32,
    },
    /// A product was saved to the wishlist.
    AddedToWishlist { product_id: ProductId, name: String },
    /// The product is already on the wishlist; nothing changed.
    AlreadyInWishlist { product_id: ProductId },
    /// A product was removed from the wishlist.
    RemovedFromWishlist { product_id: ProductId },
}

impl Notice {
    /// Severity used for display and logging.
    #[must_use]
    pub const fn level(&self) -> NoticeLevel {
        match self {
            Self::AddedToCart { .. } | Self::AddedToWishlist { .. } => NoticeLevel::Success,
            Self::StockLimitReached { .. } => NoticeLevel::Error,
            Self::AlreadyInWishlist { .. } | Self::RemovedFromWishlist { .. } => {
                NoticeLevel::Info
            }
        }
    }

    /// Product the notice is about.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        match self {
            Self::AddedToCart { product_id, .. }
            | Self::StockLimitReached { product_id, .. }
            | Self::AddedToWishlist { product_id, .. }
            | Self::AlreadyInWishlist { product_id }
            | Self::RemovedFromWishlist { product_id } => product_id,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddedToCart { name, quantity, .. } => {
                write!(f, "Added {quantity} × {name} to cart")
            }
            Self::StockLimitReached { stock_limit, .. } => {
                write!(f, "Only {stock_limit} in stock")
            }
            Self::AddedToWishlist { name, .. } => write!(f, "Saved {name} to wishlist"),
            Self::AlreadyInWishlist { .. } => f.write_str("Already in wishlist"),
            Self::RemovedFromWishlist { .. } => f.write_str("Removed from wishlist"),
        }
    }
}

/// Receiver of notices.
pub trait NoticeSink: Send + Sync + fmt::Debug {
    /// Deliver one notice. Must not call back into the store.
    fn notify(&self, notice: &Notice);
}

/// Logs each notice through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotices;

impl NoticeSink for TracingNotices {
    fn notify(&self, notice: &Notice) {
        let product_id = notice.product_id().as_str();
        match notice.level() {
            NoticeLevel::Error => tracing::warn!(product_id, "{notice}"),
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!(product_id, "{notice}"),
        }
    }
}

/// Keeps notices in memory until drained.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotices {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotices {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return everything recorded so far.
    #[must_use]
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NoticeSink for RecordingNotices {
    fn notify(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}
