//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! pantry cart add --id p1 --name Apple --price 180 --stock 5
//! pantry cart inc p1
//! pantry cart show
//! pantry cart order
//! ```

use pantry_storefront::Cart;
use tracing::info;

use super::{CommandError, ProductArgs, product_id};

/// Log every line and the totals.
pub fn show(cart: &Cart) {
    let items = cart.items();
    if items.is_empty() {
        info!("Cart is empty");
        return;
    }

    for line in &items {
        info!(
            "  {} × {} ({}) @ {} = {}  [stock {}]",
            line.quantity,
            line.name,
            line.product_id,
            line.price,
            line.line_total(),
            line.stock_limit
        );
    }
    info!(
        "{} item(s), {} unit(s), total {}",
        cart.item_count(),
        cart.cart_count(),
        cart.cart_total()
    );
}

/// Add a product.
///
/// # Errors
///
/// Returns an error if the product id is blank.
pub fn add(cart: &Cart, product: ProductArgs, qty: u32) -> Result<(), CommandError> {
    let product = product.into_snapshot()?;
    cart.add_to_cart(&product, qty);
    show(cart);
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the product id is blank.
pub fn remove(cart: &Cart, id: &str) -> Result<(), CommandError> {
    cart.remove_from_cart(&product_id(id)?);
    show(cart);
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the product id is blank.
pub fn set(cart: &Cart, id: &str, qty: u32) -> Result<(), CommandError> {
    cart.update_quantity(&product_id(id)?, qty);
    show(cart);
    Ok(())
}

/// Add one unit to a line.
///
/// # Errors
///
/// Returns an error if the product id is blank.
pub fn increment(cart: &Cart, id: &str) -> Result<(), CommandError> {
    cart.increment_quantity(&product_id(id)?);
    show(cart);
    Ok(())
}

/// Remove one unit from a line.
///
/// # Errors
///
/// Returns an error if the product id is blank.
pub fn decrement(cart: &Cart, id: &str) -> Result<(), CommandError> {
    cart.decrement_quantity(&product_id(id)?);
    show(cart);
    Ok(())
}

/// Empty the cart.
pub fn clear(cart: &Cart) {
    cart.clear_cart();
    info!("Cart cleared");
}

/// Print the order-submission payload as JSON on stdout.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn order(cart: &Cart) -> Result<(), CommandError> {
    println!("{}", order_payload(cart)?);
    Ok(())
}

fn order_payload(cart: &Cart) -> Result<String, CommandError> {
    Ok(serde_json::to_string_pretty(&cart.order_items())?)
}
