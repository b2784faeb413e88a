//! End-to-end command flows against an in-process fake backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use bistro_core::{Customization, LanguageCode, Price};
use bistro_integration_tests::{CLASSIC, CLASSIC_MENU, FakeBackend, SOLD_OUT, translations};
use bistro_storefront::error::CheckoutError;
use bistro_storefront::i18n::StaticSource;
use bistro_storefront::storage::MemoryStore;
use bistro_storefront::{AppError, Command, Outcome, Storefront};

async fn storefront(backend: &FakeBackend) -> Storefront<Arc<MemoryStore>, StaticSource> {
    let mut storefront = Storefront::new(Arc::new(MemoryStore::new()), translations())
        .with_backend(backend.client());
    storefront.start().await;
    storefront
}

fn add(product_id: bistro_core::ProductId, quantity: u32, customization: Customization) -> Command {
    Command::AddItem {
        product_id,
        quantity,
        customization,
    }
}

#[tokio::test]
async fn test_start_loads_catalog() {
    let backend = FakeBackend::spawn().await;
    let storefront = storefront(&backend).await;
    assert!(!storefront.cart().catalog().fries.is_empty());
}

#[tokio::test]
async fn test_add_by_product_id_uses_catalog_prices() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = storefront(&backend).await;

    storefront
        .dispatch(add(CLASSIC, 2, Customization::none().with_fries("large-fries")))
        .await
        .unwrap();

    let Outcome::Cart(summary) = storefront.dispatch(Command::ShowCart).await.unwrap() else {
        panic!("expected cart summary");
    };
    assert_eq!(summary.subtotal, Price::from_cents(2298));
    assert_eq!(summary.lines[0].item.name, "Klassiker");
}

#[tokio::test]
async fn test_unknown_and_sold_out_products() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = storefront(&backend).await;

    let err = storefront
        .dispatch(add(bistro_core::ProductId::new(99), 1, Customization::none()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ProductNotFound(_)));

    let err = storefront
        .dispatch(add(SOLD_OUT, 1, Customization::none()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ProductUnavailable(_)));
    assert!(storefront.cart().is_empty());
}

#[tokio::test]
async fn test_checkout_hands_off_and_clears() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = storefront(&backend).await;

    storefront
        .dispatch(add(CLASSIC_MENU, 2, Customization::none().with_fries("regular-fries")))
        .await
        .unwrap();

    let Outcome::CheckedOut(receipt) = storefront.dispatch(Command::Checkout).await.unwrap()
    else {
        panic!("expected checkout receipt");
    };
    assert_eq!(receipt.subtotal, Price::from_cents(1998));
    assert_eq!(receipt.confirmation.estimated_minutes, Some(15));
    assert!(storefront.cart().is_empty());

    let orders = backend.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].subtotal, Price::from_cents(1998));
    assert_eq!(orders[0].language, LanguageCode::De);
    assert_eq!(orders[0].lines[0].quantity.get(), 2);
}

#[tokio::test]
async fn test_checkout_refused_when_closed() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = storefront(&backend).await;
    storefront
        .dispatch(add(CLASSIC, 1, Customization::none()))
        .await
        .unwrap();

    backend.close(Some("Kitchen closed"));
    let err = storefront.dispatch(Command::Checkout).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Checkout(CheckoutError::NotAccepting(Some(ref m))) if m == "Kitchen closed"
    ));
    assert_eq!(storefront.cart().item_count(), 1);
    assert!(backend.orders().is_empty());
}

#[tokio::test]
async fn test_language_change_refreshes_menu() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = storefront(&backend).await;

    let Outcome::Menu { language, menu } = storefront.dispatch(Command::ShowMenu).await.unwrap()
    else {
        panic!("expected menu");
    };
    assert_eq!(language, LanguageCode::De);
    assert_eq!(menu.product(CLASSIC).unwrap().name, "Klassiker");
    let before = backend.menu_requests();

    storefront
        .dispatch(Command::SetLanguage {
            code: "en".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(backend.menu_requests(), before + 1);

    let Outcome::Menu { menu, .. } = storefront.dispatch(Command::ShowMenu).await.unwrap() else {
        panic!("expected menu");
    };
    assert_eq!(menu.product(CLASSIC).unwrap().name, "Classic");
    assert_eq!(backend.menu_requests(), before + 1, "served from cache");
}
