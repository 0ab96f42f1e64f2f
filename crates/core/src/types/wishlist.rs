//! Wishlist entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Keyed, Price, ProductId, ProductSnapshot};

/// A saved product.
///
/// Membership is set semantics over `product_id`; the remaining fields are
/// display metadata copied at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub slug: String,
    pub added_at: DateTime<Utc>,
}

impl WishlistEntry {
    /// Build an entry from a catalog snapshot.
    #[must_use]
    pub fn from_snapshot(product: &ProductSnapshot, added_at: DateTime<Utc>) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            slug: product.slug.clone(),
            added_at,
        }
    }
}

impl Keyed for WishlistEntry {
    fn product_id(&self) -> &ProductId {
        &self.product_id
    }
}
