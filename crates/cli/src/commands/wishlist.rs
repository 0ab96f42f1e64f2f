//! Wishlist commands.

use pantry_storefront::Wishlist;
use tracing::info;

use super::{CommandError, ProductArgs, product_id};

/// Log every saved entry.
pub fn show(wishlist: &Wishlist) {
    let entries = wishlist.entries();
    if entries.is_empty() {
        info!("Wishlist is empty");
        return;
    }

    for entry in &entries {
        info!(
            "  {} ({}) @ {}  saved {}",
            entry.name,
            entry.product_id,
            entry.price,
            entry.added_at.format("%Y-%m-%d %H:%M")
        );
    }
    info!("{} saved item(s)", wishlist.count());
}

/// Save a product.
///
/// # Errors
///
/// Returns an error if the product id is blank.
pub fn add(wishlist: &Wishlist, product: ProductArgs) -> Result<(), CommandError> {
    wishlist.add_to_wishlist(&product.into_snapshot()?);
    Ok(())
}

/// Drop a saved product.
///
/// # Errors
///
/// Returns an error if the product id is blank.
pub fn remove(wishlist: &Wishlist, id: &str) -> Result<(), CommandError> {
    wishlist.remove_from_wishlist(&product_id(id)?);
    Ok(())
}

/// Save the product if absent, drop it otherwise.
///
/// # Errors
///
/// Returns an error if the product id is blank.
pub fn toggle(wishlist: &Wishlist, product: ProductArgs) -> Result<(), CommandError> {
    wishlist.toggle_wishlist(&product.into_snapshot()?);
    Ok(())
}

/// Empty the wishlist.
pub fn clear(wishlist: &Wishlist) {
    wishlist.clear_wishlist();
    info!("Wishlist cleared");
}
