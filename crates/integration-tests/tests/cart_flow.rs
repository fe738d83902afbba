//! Shopper flows driven through `ShopState`.
//!
//! Covers browsing the catalog, building a cart, saving and comparing
//! products, and checking out.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use yasira_core::{ProductId, ProductSnapshot, VariantSelection};
use yasira_integration_tests::{CATALOG_JSON, detached_state, lipstick, product};
use yasira_storefront::{
    CartError, Catalog, CatalogQuery, CatalogSort, CheckoutError, CollectionError, JsonCatalog,
    LineKey, OrderSummary, PricingPolicy, ToggleAction,
};

// ============================================================================
// Cart
// ============================================================================

#[test]
fn test_repeat_add_merges_into_one_line() {
    let mut state = detached_state();
    state.add_to_cart(lipstick(), VariantSelection::none(), 1).unwrap();
    let quantity = state.add_to_cart(lipstick(), VariantSelection::none(), 2).unwrap();

    assert_eq!(quantity, 3);
    assert_eq!(state.cart().lines().len(), 1);
    assert_eq!(state.cart().total(), Decimal::new(8697, 2));
    assert_eq!(state.cart().item_count(), 3);
}

#[test]
fn test_variants_are_separate_lines_but_remove_item_drops_all() {
    let mut state = detached_state();
    state
        .add_to_cart(lipstick(), VariantSelection::none().color("Red"), 1)
        .unwrap();
    state
        .add_to_cart(lipstick(), VariantSelection::none().color("Blue"), 1)
        .unwrap();
    assert_eq!(state.cart().lines().len(), 2);

    assert_eq!(state.remove_from_cart(ProductId::new(1)), 2);
    assert!(state.cart().is_empty());
}

#[test]
fn test_remove_line_keeps_other_variants() {
    let mut state = detached_state();
    state
        .add_to_cart(lipstick(), VariantSelection::none().color("Red"), 1)
        .unwrap();
    state
        .add_to_cart(lipstick(), VariantSelection::none().color("Blue"), 2)
        .unwrap();

    let red = LineKey::new(ProductId::new(1), VariantSelection::none().color("Red"));
    assert!(state.remove_cart_line(&red));

    let remaining = state.cart().lines();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].selected_color(), Some("Blue"));
    assert_eq!(state.cart().item_count(), 2);
}

#[test]
fn test_update_quantity_zero_matches_remove() {
    let mut updated = detached_state();
    let mut removed = detached_state();
    for state in [&mut updated, &mut removed] {
        state.add_to_cart(product(7, 1500), VariantSelection::none(), 2).unwrap();
    }

    updated.update_cart_quantity(ProductId::new(7), 0).unwrap();
    removed.remove_from_cart(ProductId::new(7));

    assert_eq!(updated.cart(), removed.cart());
    assert!(updated.cart().is_empty());
}

#[test]
fn test_rejected_add_leaves_cart_untouched() {
    let mut state = detached_state();
    state.add_to_cart(product(1, 1000), VariantSelection::none(), 1).unwrap();

    assert!(state.add_to_cart(product(2, -100), VariantSelection::none(), 1).is_err());
    assert!(state.add_to_cart(product(3, 1000), VariantSelection::none(), 0).is_err());
    assert_eq!(state.cart().lines().len(), 1);
}

#[test]
fn test_out_of_range_cart_is_rejected_before_checkout() {
    let mut state = detached_state();
    let vault = ProductSnapshot::new(ProductId::new(8), "Vault", "YASIRA BEAUTY", Decimal::MAX);

    assert_eq!(
        state.add_to_cart(vault.clone(), VariantSelection::none(), 2),
        Err(CartError::Overflow(ProductId::new(8)))
    );
    state.add_to_cart(vault, VariantSelection::none(), 1).unwrap();
    assert_eq!(
        state.update_cart_quantity(ProductId::new(8), 3),
        Err(CartError::Overflow(ProductId::new(8)))
    );

    state.login("user@yasira.com", "user123").unwrap();
    let confirmation = state.place_order(&PricingPolicy::default()).unwrap();
    assert_eq!(confirmation.summary.subtotal.amount, Decimal::MAX);
}

// ============================================================================
// Wishlist and compare
// ============================================================================

#[test]
fn test_wishlist_toggle_round_trip() {
    let mut state = detached_state();
    assert!(state.toggle_wishlist(product(2, 2299)));
    assert!(state.wishlist().is_in_wishlist(ProductId::new(2)));

    assert!(!state.toggle_wishlist(product(2, 2299)));
    assert!(!state.wishlist().is_in_wishlist(ProductId::new(2)));
    assert_eq!(state.wishlist().count(), 0);
}

#[test]
fn test_compare_rejects_fifth_product() {
    let mut state = detached_state();
    for id in 1..=4 {
        state.add_to_compare(product(id, 1000)).unwrap();
    }

    let err = state.add_to_compare(product(5, 1000)).unwrap_err();
    assert_eq!(err, CollectionError::CapacityExceeded { capacity: 4 });

    let ids: Vec<i64> = state
        .compare()
        .entries()
        .iter()
        .map(|entry| entry.product().id.as_i64())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert!(!state.compare().can_add_more());
}

#[test]
fn test_compare_toggle_when_full() {
    let mut state = detached_state();
    for id in 1..=4 {
        state.add_to_compare(product(id, 1000)).unwrap();
    }

    let outcome = state.toggle_compare(product(5, 1000));
    assert_eq!(outcome.action, ToggleAction::Added);
    assert!(!outcome.succeeded());

    let outcome = state.toggle_compare(product(2, 1000));
    assert_eq!(outcome.action, ToggleAction::Removed);
    assert!(outcome.succeeded());
    assert!(state.compare().can_add_more());
}

// ============================================================================
// Catalog to checkout
// ============================================================================

#[test]
fn test_free_shipping_remaining_for_45() {
    let mut state = detached_state();
    state.add_to_cart(product(9, 4500), VariantSelection::none(), 1).unwrap();

    let summary = OrderSummary::for_cart(state.cart(), &PricingPolicy::default());
    assert_eq!(summary.subtotal.amount, Decimal::new(4500, 2));
    assert_eq!(
        summary.free_shipping_remaining.map(|p| p.amount),
        Some(Decimal::new(500, 2))
    );
}

#[test]
fn test_catalog_to_confirmation() {
    let catalog = JsonCatalog::from_json(CATALOG_JSON).unwrap();
    let mut state = detached_state();

    let lipstick = catalog.product(ProductId::new(1)).cloned().unwrap();
    let selection = lipstick.default_selection();
    assert_eq!(selection.color.as_deref(), Some("Ruby Red"));
    state.add_to_cart(lipstick, selection, 1).unwrap();
    let palette = catalog.product(ProductId::new(5)).cloned().unwrap();
    state.add_to_cart(palette, VariantSelection::none(), 1).unwrap();

    assert_eq!(state.place_order(&PricingPolicy::default()), Err(CheckoutError::NotAuthenticated));

    state.login("user@yasira.com", "user123").unwrap();
    let confirmation = state.place_order(&PricingPolicy::default()).unwrap();

    // 28.99 + 52.99 = 81.98, ships free, 20% tax = 16.396
    assert_eq!(confirmation.summary.subtotal.amount, Decimal::new(8198, 2));
    assert!(confirmation.summary.ships_free());
    assert_eq!(confirmation.summary.total.display(), "€98.38");
    assert_eq!(confirmation.lines.len(), 2);
    assert!(state.cart().is_empty());
    assert_eq!(state.place_order(&PricingPolicy::default()), Err(CheckoutError::EmptyCart));
}

#[test]
fn test_search_then_wishlist() {
    let catalog = JsonCatalog::from_json(CATALOG_JSON).unwrap();
    let mut state = detached_state();

    for found in catalog.search("foundation", None) {
        state.add_to_wishlist(found.clone());
    }
    assert_eq!(state.wishlist().count(), 2);
    assert!(state.wishlist().is_in_wishlist(ProductId::new(3)));
    assert!(state.wishlist().is_in_wishlist(ProductId::new(4)));
}

#[test]
fn test_filtered_catalog_to_compare() {
    let catalog = JsonCatalog::from_json(CATALOG_JSON).unwrap();
    let mut state = detached_state();

    let query = CatalogQuery {
        price_range: Some(Decimal::new(30, 0)..=Decimal::new(60, 0)),
        sort: CatalogSort::PriceHigh,
        ..CatalogQuery::default()
    };
    let found = catalog.filter(&query);
    assert!(!found.is_empty());
    assert!(found.windows(2).all(|pair| pair[0].price >= pair[1].price));

    for product in found {
        let _ = state.add_to_compare(product.clone());
    }
    assert!(state.compare().count() <= 4);
    assert!(
        state
            .compare()
            .entries()
            .iter()
            .all(|entry| query.matches(entry.product()))
    );
}

#[test]
fn test_quick_search_caps_results() {
    let catalog = JsonCatalog::from_json(CATALOG_JSON).unwrap();
    let everything = catalog.search("yasira", None);
    let capped = catalog.search("yasira", Some(2));

    assert!(everything.len() > 2);
    assert_eq!(capped, everything[..2]);
}
