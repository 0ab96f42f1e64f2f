//! Shopping cart consumer.
//!
//! Every mutation reads the latest persisted cart, edits it, saves it and
//! lets the change signal refresh every consumer (this one included). Totals
//! are computed from the in-memory view on each call and never stored.

use std::sync::Arc;

use pantry_core::{CartLineItem, OrderItem, Price, ProductId, ProductSnapshot};
use tracing::{debug, instrument};

use crate::live::{LiveCollection, find_mut, remove_keyed};
use crate::notices::{Notice, NoticeSink};
use crate::state::StoreContext;

/// A live view of the cart with its mutation API.
#[derive(Debug)]
pub struct Cart {
    lines: LiveCollection<CartLineItem>,
    notices: Arc<dyn NoticeSink>,
}

impl Cart {
    pub(crate) fn attach(context: &StoreContext) -> Self {
        let key = context.config().cart_key.clone();
        Self {
            lines: LiveCollection::attach(context.collection(key)),
            notices: Arc::clone(context.notices()),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`.
    ///
    /// An existing line has its quantity raised without checking stock; a new
    /// line copies the snapshot fields. A zero quantity is ignored.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(&self, product: &ProductSnapshot, quantity: u32) {
        if quantity == 0 {
            debug!("ignoring add of zero units");
            return;
        }

        let saved = self.lines.mutate(|lines| {
            match find_mut(lines, &product.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(quantity),
                None => lines.push(CartLineItem::from_snapshot(product, quantity)),
            }
            true
        });
        if !saved {
            return;
        }

        self.notices.notify(&Notice::AddedToCart {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity,
        });
    }

    /// Drop the line for `product_id`, if any.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&self, product_id: &ProductId) {
        self.lines.mutate(|lines| remove_keyed(lines, product_id));
    }

    /// Set the quantity of an existing line.
    ///
    /// Zero is ignored. A quantity above the line's stock snapshot is refused
    /// with [`Notice::StockLimitReached`].
    #[instrument(skip(self))]
    pub fn update_quantity(&self, product_id: &ProductId, quantity: u32) {
        if quantity < 1 {
            debug!("ignoring quantity below one");
            return;
        }

        let mut refused_at = None;
        self.lines.mutate(|lines| {
            let Some(line) = find_mut(lines, product_id) else {
                return false;
            };
            if quantity > line.stock_limit {
                refused_at = Some(line.stock_limit);
                return false;
            }
            if line.quantity == quantity {
                return false;
            }
            line.quantity = quantity;
            true
        });

        if let Some(stock_limit) = refused_at {
            self.stock_limit_reached(product_id, stock_limit);
        }
    }

    /// Add one unit, unless the line is already at its stock snapshot.
    #[instrument(skip(self))]
    pub fn increment_quantity(&self, product_id: &ProductId) {
        let mut refused_at = None;
        self.lines.mutate(|lines| {
            let Some(line) = find_mut(lines, product_id) else {
                return false;
            };
            if line.at_stock_limit() {
                refused_at = Some(line.stock_limit);
                return false;
            }
            line.quantity += 1;
            true
        });

        if let Some(stock_limit) = refused_at {
            self.stock_limit_reached(product_id, stock_limit);
        }
    }

    /// Remove one unit. A line at quantity one is left as is; removal is
    /// only ever explicit.
    #[instrument(skip(self))]
    pub fn decrement_quantity(&self, product_id: &ProductId) {
        self.lines.mutate(|lines| match find_mut(lines, product_id) {
            Some(line) if line.quantity > 1 => {
                line.quantity -= 1;
                true
            }
            _ => false,
        });
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear_cart(&self) {
        self.lines.mutate(|lines| {
            lines.clear();
            true
        });
    }

    fn stock_limit_reached(&self, product_id: &ProductId, stock_limit: u32) {
        debug!(stock_limit, "quantity change refused");
        self.notices.notify(&Notice::StockLimitReached {
            product_id: product_id.clone(),
            stock_limit,
        });
    }

    // =========================================================================
    // Derived
    // =========================================================================

    /// Current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.lines.snapshot()
    }

    /// `Σ price × quantity`.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.lines
            .with(|lines| lines.iter().map(CartLineItem::line_total).sum())
    }

    /// `Σ quantity`.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.lines
            .with(|lines| lines.iter().map(|l| u64::from(l.quantity)).sum())
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.lines.with(<[CartLineItem]>::len)
    }

    /// Whether `product_id` has a line.
    #[must_use]
    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.lines.contains(product_id)
    }

    /// Quantity on the line for `product_id`, or 0 without one.
    #[must_use]
    pub fn get_item_quantity(&self, product_id: &ProductId) -> u32 {
        self.lines.with(|lines| {
            lines
                .iter()
                .find(|l| &l.product_id == product_id)
                .map_or(0, |l| l.quantity)
        })
    }

    /// The cart in the shape the order service accepts.
    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lines
            .with(|lines| lines.iter().map(OrderItem::from).collect())
    }

    /// Force a re-read of the persisted cart.
    pub fn reload(&self) {
        self.lines.reload();
    }
}
