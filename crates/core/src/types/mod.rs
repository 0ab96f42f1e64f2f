//! Core types for Pantry.
//!
//! This module provides type-safe wrappers for the shopper-side domain:
//! what the catalog hands us at add time, and what we keep afterwards.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod wishlist;

pub use cart::{CartLineItem, OrderItem};
pub use id::{Keyed, ProductId, ProductIdError};
pub use price::Price;
pub use product::ProductSnapshot;
pub use wishlist::WishlistEntry;
