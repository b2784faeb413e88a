//! Cart flows across restarts and pricing against the catalog.
//!
//! Self-contained: uses a file-backed store in the temp directory.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use bistro_core::{Customization, LanguageCode, Price, Quantity};
use bistro_integration_tests::{CLASSIC, CLASSIC_MENU, catalog, menu, scratch_path};
use bistro_storefront::cart::{CartChange, CartService, ManualClock};
use bistro_storefront::storage::{FileStore, KeyValueStore, MemoryStore, keys};

const START: i64 = 1_700_000_000_000;

fn cart_in(store: Arc<FileStore>, clock: Arc<ManualClock>) -> CartService<Arc<FileStore>> {
    let mut cart = CartService::restore_with_clock(store, clock);
    cart.set_catalog(catalog());
    cart
}

#[test]
fn test_cart_survives_restart() {
    let path = scratch_path("state.json");
    let clock = Arc::new(ManualClock::new(START));
    let products = menu(LanguageCode::De);
    let classic = products.product(CLASSIC).unwrap();

    {
        let store = Arc::new(FileStore::open(&path));
        let mut cart = cart_in(store, Arc::clone(&clock));
        cart.add_item(
            classic,
            Quantity::new(2).unwrap(),
            Customization::none().with_sauce("bbq").with_extra("cheese"),
        );
        clock.advance(5);
        cart.add_item(classic, Quantity::ONE, Customization::none().with_fries("none"));
        assert_eq!(cart.item_count(), 3);
    }

    let store = Arc::new(FileStore::open(&path));
    let restored = cart_in(store, clock);
    assert_eq!(restored.lines().len(), 2);
    assert_eq!(restored.item_count(), 3);
    // 2 x (9.99 + 0.30) + 9.99
    assert_eq!(restored.subtotal(), Price::from_cents(3057));
}

#[test]
fn test_pricing_examples() {
    let store = Arc::new(FileStore::open(scratch_path("pricing.json")));
    let mut cart = cart_in(store, Arc::new(ManualClock::new(START)));
    let products = menu(LanguageCode::En);

    let large = cart.add_item(
        products.product(CLASSIC).unwrap(),
        Quantity::new(2).unwrap(),
        Customization::none().with_fries("large-fries"),
    );
    let CartChange::Appended(large_id) = large.change else {
        panic!("expected a new line");
    };
    let line = cart.cart().get(&large_id).unwrap().clone();
    assert_eq!(cart.item_total(&line), Price::from_cents(2298));

    cart.clear();
    let included = cart.add_item(
        products.product(CLASSIC_MENU).unwrap(),
        Quantity::new(2).unwrap(),
        Customization::none().with_fries("regular-fries"),
    );
    let CartChange::Appended(included_id) = included.change else {
        panic!("expected a new line");
    };
    let line = cart.cart().get(&included_id).unwrap().clone();
    assert_eq!(cart.item_total(&line), Price::from_cents(1998));
    assert_eq!(cart.subtotal(), Price::from_cents(1998));
}

#[test]
fn test_line_ids_embed_product_and_timestamp() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(START));
    let mut cart = CartService::restore_with_clock(store, clock);
    let products = menu(LanguageCode::De);

    let update = cart.add_item(
        products.product(CLASSIC).unwrap(),
        Quantity::ONE,
        Customization::none(),
    );
    let CartChange::Appended(id) = update.change else {
        panic!("expected a new line");
    };
    let id = id.as_str().to_string();
    assert!(id.starts_with("1-"));
    assert!(id.ends_with(&format!("-{START}")));
}

#[test]
fn test_quantity_round_trip_and_removal() {
    let store = Arc::new(MemoryStore::new());
    let mut cart = CartService::restore_with_clock(Arc::clone(&store), Arc::new(ManualClock::new(START)));
    let products = menu(LanguageCode::De);

    let update = cart.add_item(
        products.product(CLASSIC).unwrap(),
        Quantity::new(3).unwrap(),
        Customization::none(),
    );
    let CartChange::Appended(id) = update.change else {
        panic!("expected a new line");
    };

    cart.update_quantity(&id, 200).unwrap();
    assert_eq!(cart.item_count(), 99);

    cart.update_quantity(&id, -99).unwrap();
    assert!(cart.is_empty());
    assert_eq!(store.get(keys::CART_STATE).unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_corrupt_state_file_starts_empty() {
    let path = scratch_path("corrupt.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{{{ definitely not json").unwrap();

    let store = Arc::new(FileStore::open(&path));
    let cart = CartService::restore(Arc::clone(&store));
    assert!(cart.is_empty());
}

#[test]
fn test_malformed_cart_entry_starts_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set(keys::CART_STATE, r#"[{"id": 5}]"#).unwrap();
    store.set(keys::LANGUAGE_PREFERENCE, "en").unwrap();

    let cart = CartService::restore(Arc::clone(&store));
    assert!(cart.is_empty());
    assert_eq!(
        store.get(keys::LANGUAGE_PREFERENCE).unwrap().as_deref(),
        Some("en")
    );
}
