//! Live checks against a running backend.
//!
//! These tests require a backend reachable at `BISTRO_API_URL`
//! (default: <http://localhost:8080>).
//!
//! Run with: cargo test -p bistro-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use bistro_core::LanguageCode;
use bistro_storefront::backend::BackendClient;
use url::Url;

/// Backend base URL (configurable via environment).
fn backend() -> BackendClient {
    let base = std::env::var("BISTRO_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    BackendClient::new(reqwest::Client::new(), Url::parse(&base).unwrap())
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_customization_options_are_served() {
    let catalog = backend().customization_options().await.unwrap();
    assert!(
        catalog.fries.iter().all(|option| !option.slug.as_str().is_empty()),
        "every fries option has a slug"
    );
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_menu_in_every_language() {
    let backend = backend();
    for language in LanguageCode::ALL {
        let menu = backend.menu(language).await.unwrap();
        for product in &menu.products {
            assert!(product.price.amount().is_sign_positive(), "{} has a price", product.name);
        }
    }
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_order_status() {
    let status = backend().order_status().await.unwrap();
    if let Some(message) = status.message {
        assert!(!message.trim().is_empty(), "notice is not blank");
    }
}
