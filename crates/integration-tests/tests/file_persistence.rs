//! Carts and wishlists persisted to disk through `FileStorage`.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::sync::Arc;

use pantry_core::{CartLineItem, Price};
use pantry_integration_tests::{apple, banana, milk, open_tab, pid};
use pantry_storefront::FileStorage;
use serde_json::Value;
use tempfile::TempDir;

fn file_tab(dir: &TempDir) -> pantry_integration_tests::Tab {
    open_tab(Arc::new(FileStorage::new(dir.path())))
}

#[test]
fn test_cart_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let tab = file_tab(&dir);
        let cart = tab.context.cart();
        cart.add_to_cart(&apple(), 2);
        cart.add_to_cart(&milk(), 1);
    }

    let tab = file_tab(&dir);
    let cart = tab.context.cart();
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.cart_count(), 3);
    assert_eq!(cart.cart_total(), Price::from(180 * 2 + 60));
}

#[test]
fn test_wishlist_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let tab = file_tab(&dir);
        tab.context.wishlist().add_to_wishlist(&banana());
    }

    let tab = file_tab(&dir);
    let wishlist = tab.context.wishlist();
    assert!(wishlist.is_in_wishlist(&pid("p2")));
    assert_eq!(wishlist.entries()[0].name, "Banana");
}

#[test]
fn test_persisted_layout() {
    let dir = TempDir::new().unwrap();
    let tab = file_tab(&dir);
    tab.context.cart().add_to_cart(&apple(), 1);

    let raw = fs::read_to_string(dir.path().join("cart.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    let line = &value[0];

    assert_eq!(line["productId"], "p1");
    assert_eq!(line["name"], "Apple");
    assert_eq!(line["price"], "180");
    assert_eq!(line["quantity"], 1);
    assert_eq!(line["stock"], 5);
    assert_eq!(line["slug"], "apple");
}

#[test]
fn test_corrupt_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cart.json"), "not json at all").unwrap();

    let tab = file_tab(&dir);
    let cart = tab.context.cart();
    assert_eq!(cart.item_count(), 0);

    cart.add_to_cart(&apple(), 1);
    assert_eq!(cart.item_count(), 1);

    let reopened = file_tab(&dir);
    assert_eq!(reopened.context.cart().get_item_quantity(&pid("p1")), 1);
}

#[test]
fn test_hand_written_file_with_legacy_fields() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("cart.json"),
        r#"[{"productId":"p4","name":"Rye Bread","price":3.5,"quantity":2,"stockLimit":4}]"#,
    )
    .unwrap();

    let tab = file_tab(&dir);
    let cart = tab.context.cart();
    let items: Vec<CartLineItem> = cart.items();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].stock_limit, 4);
    assert_eq!(cart.cart_total(), Price::from(7));
}

#[test]
fn test_tabs_sharing_one_file_storage_sync() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    let tab_a = open_tab(storage.clone());
    let tab_b = open_tab(storage);
    let cart_a = tab_a.context.cart();
    let cart_b = tab_b.context.cart();

    cart_a.add_to_cart(&banana(), 3);
    assert_eq!(cart_b.get_item_quantity(&pid("p2")), 3);

    cart_b.clear_cart();
    assert_eq!(cart_a.item_count(), 0);
}

#[test]
fn test_separate_instances_see_changes_on_reload() {
    let dir = TempDir::new().unwrap();
    let tab_a = file_tab(&dir);
    let tab_b = file_tab(&dir);
    let cart_a = tab_a.context.cart();
    let cart_b = tab_b.context.cart();

    cart_a.add_to_cart(&apple(), 1);
    assert_eq!(cart_b.item_count(), 0);

    cart_b.reload();
    assert_eq!(cart_b.item_count(), 1);
}
