//! Several tabs of one shopper profile sharing a storage medium.
//!
//! There is no locking between tabs: every tab re-reads on change signals,
//! and when two tabs write from stale views the later write wins.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use pantry_core::{CartLineItem, Price, ProductSnapshot};
use pantry_integration_tests::{Profile, apple, banana, milk, pid};
use pantry_storefront::{ContextId, Notice, StorageMedium};
use rust_decimal::Decimal;

#[test]
fn test_add_in_one_tab_shows_in_another() {
    let profile = Profile::new();
    let tab_a = profile.open_tab();
    let tab_b = profile.open_tab();
    let cart_a = tab_a.context.cart();
    let cart_b = tab_b.context.cart();

    cart_a.add_to_cart(&apple(), 1);

    assert_eq!(cart_b.get_item_quantity(&pid("p1")), 1);
    assert_eq!(cart_b.cart_total(), Price::from(180));
}

#[test]
fn test_last_writer_wins() {
    let profile = Profile::new();
    let tab_a = profile.open_tab();
    let cart_a = tab_a.context.cart();
    cart_a.add_to_cart(&apple(), 1);

    // Tab B writes from a view it built before A's change.
    let tab_b = profile.open_tab();
    let stale_b = tab_b.context.collection::<CartLineItem>("cart");
    let mut b_view = stale_b.load();
    assert_eq!(b_view[0].quantity, 1);

    cart_a.update_quantity(&pid("p1"), 3);
    assert_eq!(cart_a.get_item_quantity(&pid("p1")), 3);

    b_view[0].quantity = 2;
    assert!(stale_b.save(&b_view));

    assert_eq!(stale_b.load()[0].quantity, 2);
    assert_eq!(cart_a.get_item_quantity(&pid("p1")), 2);
}

#[test]
fn test_concurrent_adds_of_different_products_lose_one() {
    let profile = Profile::new();
    let tab_a = profile.open_tab();
    let tab_b = profile.open_tab();
    let raw_a = tab_a.context.collection::<CartLineItem>("cart");
    let raw_b = tab_b.context.collection::<CartLineItem>("cart");

    // Both read the empty cart, then each saves its own addition.
    let mut view_a = raw_a.load();
    let mut view_b = raw_b.load();
    view_a.push(CartLineItem::from_snapshot(&apple(), 1));
    view_b.push(CartLineItem::from_snapshot(&banana(), 1));
    assert!(raw_a.save(&view_a));
    assert!(raw_b.save(&view_b));

    let cart = tab_a.context.cart();
    assert!(!cart.is_in_cart(&pid("p1")));
    assert!(cart.is_in_cart(&pid("p2")));
}

#[test]
fn test_mutations_read_latest_state_before_writing() {
    let profile = Profile::new();
    let tab_a = profile.open_tab();
    let tab_b = profile.open_tab();
    let cart_a = tab_a.context.cart();
    let cart_b = tab_b.context.cart();

    cart_a.add_to_cart(&apple(), 1);
    cart_b.add_to_cart(&banana(), 1);
    cart_a.add_to_cart(&milk(), 2);

    for cart in [&cart_a, &cart_b] {
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.cart_count(), 4);
        assert_eq!(cart.cart_total(), Price::from(180 + 90 + 120));
    }
}

#[test]
fn test_stock_notice_only_in_acting_tab() {
    let profile = Profile::new();
    let tab_a = profile.open_tab();
    let tab_b = profile.open_tab();
    let cart_a = tab_a.context.cart();
    let _cart_b = tab_b.context.cart();

    cart_a.add_to_cart(&apple(), 5);
    tab_a.notices.take();
    cart_a.increment_quantity(&pid("p1"));

    assert_eq!(
        tab_a.notices.take(),
        vec![Notice::StockLimitReached {
            product_id: pid("p1"),
            stock_limit: 5
        }]
    );
    assert!(tab_b.notices.take().is_empty());
}

#[test]
fn test_increment_scenario_caps_at_stock() {
    let profile = Profile::new();
    let tab = profile.open_tab();
    let cart = tab.context.cart();

    cart.add_to_cart(&apple(), 1);
    tab.notices.take();

    let mut refused_on = Vec::new();
    for attempt in 1..=6 {
        cart.increment_quantity(&pid("p1"));
        if tab
            .notices
            .take()
            .iter()
            .any(|n| matches!(n, Notice::StockLimitReached { .. }))
        {
            refused_on.push(attempt);
        }
    }

    assert_eq!(refused_on, vec![5, 6]);
    assert_eq!(cart.get_item_quantity(&pid("p1")), 5);
}

#[test]
fn test_wishlist_toggle_converges_across_tabs() {
    let profile = Profile::new();
    let tab_a = profile.open_tab();
    let tab_b = profile.open_tab();
    let wishlist_a = tab_a.context.wishlist();
    let wishlist_b = tab_b.context.wishlist();

    wishlist_a.add_to_wishlist(&banana());
    assert!(wishlist_b.is_in_wishlist(&pid("p2")));

    wishlist_b.toggle_wishlist(&banana());
    assert!(!wishlist_a.is_in_wishlist(&pid("p2")));
    assert!(!wishlist_b.is_in_wishlist(&pid("p2")));
}

#[test]
fn test_duplicate_wishlist_add_from_second_tab() {
    let profile = Profile::new();
    let tab_a = profile.open_tab();
    let tab_b = profile.open_tab();
    let wishlist_a = tab_a.context.wishlist();
    let wishlist_b = tab_b.context.wishlist();

    wishlist_a.add_to_wishlist(&banana());
    wishlist_b.add_to_wishlist(&banana());

    assert_eq!(wishlist_a.count(), 1);
    assert_eq!(
        tab_b.notices.take(),
        vec![Notice::AlreadyInWishlist {
            product_id: pid("p2")
        }]
    );
}

#[test]
fn test_external_wipe_empties_every_tab() {
    let profile = Profile::new();
    let tab_a = profile.open_tab();
    let tab_b = profile.open_tab();
    let cart_a = tab_a.context.cart();
    let wishlist_b = tab_b.context.wishlist();

    cart_a.add_to_cart(&apple(), 2);
    wishlist_b.add_to_wishlist(&banana());

    profile.storage.clear();

    assert_eq!(cart_a.item_count(), 0);
    assert_eq!(wishlist_b.count(), 0);
}

#[test]
fn test_corrupt_write_from_elsewhere_reads_as_empty() {
    let profile = Profile::new();
    let tab = profile.open_tab();
    let cart = tab.context.cart();
    cart.add_to_cart(&apple(), 1);

    profile
        .storage
        .set_item(ContextId::EXTERNAL, "cart", "[{\"productId\":")
        .unwrap();

    assert_eq!(cart.item_count(), 0);
    assert_eq!(cart.cart_total(), Price::ZERO);
}

#[test]
fn test_closed_tab_stops_listening() {
    let profile = Profile::new();
    let tab_a = profile.open_tab();
    let tab_b = profile.open_tab();
    let cart_a = tab_a.context.cart();

    {
        let cart_b = tab_b.context.cart();
        let wishlist_b = tab_b.context.wishlist();
        assert_eq!(tab_b.context.events().listener_count(), 2);
        drop((cart_b, wishlist_b));
    }
    assert_eq!(tab_b.context.events().listener_count(), 0);

    cart_a.add_to_cart(&apple(), 1);
    assert_eq!(cart_a.item_count(), 1);
}

#[test]
fn test_fractional_prices_total_exactly() {
    let profile = Profile::new();
    let tab = profile.open_tab();
    let cart = tab.context.cart();

    let herbs = ProductSnapshot::new(
        pid("p9"),
        "Fresh Basil",
        Price::new(Decimal::from_str("0.10").unwrap()),
        50,
    );
    cart.add_to_cart(&herbs, 3);

    let other_tab = profile.open_tab();
    assert_eq!(
        other_tab.context.cart().cart_total(),
        Price::new(Decimal::from_str("0.30").unwrap())
    );
}
