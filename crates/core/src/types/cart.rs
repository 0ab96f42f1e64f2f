//! Cart line items and the order projection.

use serde::{Deserialize, Serialize};

use super::{Keyed, Price, ProductId, ProductSnapshot};

/// One product in the cart.
///
/// Display fields are a snapshot taken when the product was first added;
/// they are not refreshed from the catalog afterwards.
///
/// ## Invariants
///
/// - At most one line per `product_id` within a cart.
/// - `quantity >= 1`. A line never sits at zero; it is removed instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub slug: String,
    pub quantity: u32,
    /// Stock available at add time. Advisory; the order service has the final say.
    #[serde(default, rename = "stock", alias = "stockLimit")]
    pub stock_limit: u32,
}

impl CartLineItem {
    /// Build a new line from a catalog snapshot.
    #[must_use]
    pub fn from_snapshot(product: &ProductSnapshot, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            slug: product.slug.clone(),
            quantity,
            stock_limit: product.stock,
        }
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// Whether another unit would exceed the stock snapshot.
    #[must_use]
    pub const fn at_stock_limit(&self) -> bool {
        self.quantity >= self.stock_limit
    }
}

impl Keyed for CartLineItem {
    fn product_id(&self) -> &ProductId {
        &self.product_id
    }
}

/// The minimal line shape the order-submission service expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: ProductId,
    pub title: String,
    pub price: Price,
    pub qty: u32,
}

impl From<&CartLineItem> for OrderItem {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product: line.product_id.clone(),
            title: line.name.clone(),
            price: line.price,
            qty: line.quantity,
        }
    }
}
