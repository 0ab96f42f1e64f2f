//! Catalog product snapshot.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// The catalog fields copied into the cart or wishlist at add time.
///
/// Shaped like the catalog service's product payload (`_id`, `name`, ...) so a
/// product fetched from the API can be handed over as-is. The store treats
/// these values as opaque and never re-validates them against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub slug: String,
    /// Units in stock when the snapshot was taken.
    #[serde(default)]
    pub stock: u32,
}

impl ProductSnapshot {
    /// Create a snapshot with no image and an empty slug.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price, stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
            slug: String::new(),
            stock,
        }
    }

    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
