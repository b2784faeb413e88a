//! Integration tests for the Bistro ordering client.
//!
//! # Running Tests
//!
//! ```bash
//! # Flow tests (self-contained, start their own fake backend)
//! cargo test -p bistro-integration-tests
//!
//! # Live tests against a running backend
//! BISTRO_API_URL=http://localhost:8080 cargo test -p bistro-integration-tests -- --ignored
//! ```
//!
//! This library holds the shared fixtures: a customization catalog, a menu
//! in two languages, in-memory translations and [`FakeBackend`], an axum
//! server implementing the backend endpoints the client consumes and serving
//! translation files under `/locales/`.

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bistro_core::{
    CategoryId, CheckoutRequest, CustomizationCatalog, CustomizationOption, LanguageCode, Menu,
    MenuCategory, MenuProduct, OrderAcceptance, OrderConfirmation, OrderId, Price, ProductId,
};
use bistro_storefront::backend::BackendClient;
use bistro_storefront::i18n::StaticSource;
use url::Url;

pub const CLASSIC: ProductId = ProductId::new(1);
pub const CLASSIC_MENU: ProductId = ProductId::new(2);
pub const SOLD_OUT: ProductId = ProductId::new(3);

/// Sauces, fries and extras with add-on prices.
#[must_use]
pub fn catalog() -> CustomizationCatalog {
    let option = |slug: &str, name: &str, cents: Option<i64>| CustomizationOption {
        slug: slug.into(),
        name: name.to_string(),
        price: cents.map(Price::from_cents),
    };

    CustomizationCatalog {
        sauces: vec![option("bbq", "BBQ", None), option("truffle", "Truffle Mayo", Some(80))],
        fries: vec![
            option("none", "No fries", None),
            option("regular-fries", "Regular fries", Some(250)),
            option("large-fries", "Large fries", Some(150)),
        ],
        extras: vec![option("cheese", "Cheese", None), option("bacon", "Bacon", None)],
    }
}

/// The menu as served for `language`.
#[must_use]
pub fn menu(language: LanguageCode) -> Menu {
    let (burgers, classic, classic_menu, special) = match language {
        LanguageCode::De => ("Burger", "Klassiker", "Klassiker Menü", "Tagesburger"),
        LanguageCode::En | LanguageCode::Fr => ("Burgers", "Classic", "Classic Meal", "Daily special"),
    };
    let product = |id, name: &str, cents, includes_sides, available| MenuProduct {
        id,
        name: name.to_string(),
        description: None,
        price: Price::from_cents(cents),
        includes_sides,
        category_id: Some(CategoryId::new(1)),
        available,
    };

    Menu {
        categories: vec![MenuCategory {
            id: CategoryId::new(1),
            name: burgers.to_string(),
            position: 1,
        }],
        products: vec![
            product(CLASSIC, classic, 999, false, true),
            product(CLASSIC_MENU, classic_menu, 999, true, true),
            product(SOLD_OUT, special, 1250, false, false),
        ],
    }
}

const GERMAN: &str =
    r#"{"cart": {"title": "Warenkorb", "items": "{{count}} Artikel"}, "menu": {"title": "Speisekarte"}}"#;
const ENGLISH: &str =
    r#"{"cart": {"title": "Your cart", "items": "{{count}} items"}, "menu": {"title": "Menu"}}"#;

/// Translation JSON for `language`; French is deliberately absent.
#[must_use]
pub const fn translation_json(language: LanguageCode) -> Option<&'static str> {
    match language {
        LanguageCode::De => Some(GERMAN),
        LanguageCode::En => Some(ENGLISH),
        LanguageCode::Fr => None,
    }
}

/// German and English translations held in memory.
#[must_use]
pub fn translations() -> StaticSource {
    StaticSource::new()
        .with_json(LanguageCode::De, GERMAN)
        .expect("valid German fixture")
        .with_json(LanguageCode::En, ENGLISH)
        .expect("valid English fixture")
}

/// Directory of the bundled translation files.
#[must_use]
pub fn locales_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../locales")
}

/// A fresh path under the system temp directory.
#[must_use]
pub fn scratch_path(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir()
        .join(format!("bistro-it-{}-{n}", std::process::id()))
        .join(name)
}

// =============================================================================
// FakeBackend
// =============================================================================

/// How `/api/menu` misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFailure {
    /// Answer 500 with a text body.
    ServerError,
    /// Answer 200 with a body that is not JSON.
    Malformed,
}

#[derive(Default)]
struct BackendState {
    closed: AtomicBool,
    notice: Mutex<Option<String>>,
    menu_failure: Mutex<Option<MenuFailure>>,
    menu_requests: AtomicUsize,
    locale_requests: AtomicUsize,
    next_order: AtomicI32,
    orders: Mutex<Vec<CheckoutRequest>>,
}

/// In-process backend serving the fixtures above.
pub struct FakeBackend {
    url: Url,
    state: Arc<BackendState>,
}

impl FakeBackend {
    /// Bind to an ephemeral port and serve in the background.
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());

        let app = Router::new()
            .route("/api/customization-options", get(customization_options))
            .route("/api/menu", get(menu_handler))
            .route("/api/orders/status", get(order_status))
            .route("/api/orders", post(submit_order))
            .route("/locales/{file}", get(locale_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake backend error");
        });

        let url = Url::parse(&format!("http://{addr}/")).expect("valid backend URL");
        Self { url, state }
    }

    /// Base URL of the server.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Base URL of the translation files.
    #[must_use]
    pub fn locales_url(&self) -> Url {
        self.url.join("locales/").expect("valid locales URL")
    }

    /// A client pointed at this server.
    #[must_use]
    pub fn client(&self) -> BackendClient {
        BackendClient::new(reqwest::Client::new(), self.url.clone())
    }

    /// Stop accepting orders, with an optional notice.
    pub fn close(&self, notice: Option<&str>) {
        self.state.closed.store(true, Ordering::SeqCst);
        *self.state.notice.lock().expect("notice lock") = notice.map(str::to_string);
    }

    /// Orders received so far.
    #[must_use]
    pub fn orders(&self) -> Vec<CheckoutRequest> {
        self.state.orders.lock().expect("orders lock").clone()
    }

    /// Make `/api/menu` fail, or recover with `None`.
    pub fn fail_menu(&self, failure: Option<MenuFailure>) {
        *self.state.menu_failure.lock().expect("menu failure lock") = failure;
    }

    /// Number of menu requests served.
    #[must_use]
    pub fn menu_requests(&self) -> usize {
        self.state.menu_requests.load(Ordering::SeqCst)
    }

    /// Number of translation file requests served.
    #[must_use]
    pub fn locale_requests(&self) -> usize {
        self.state.locale_requests.load(Ordering::SeqCst)
    }
}

async fn customization_options() -> Json<CustomizationCatalog> {
    Json(catalog())
}

async fn menu_handler(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.menu_requests.fetch_add(1, Ordering::SeqCst);
    let failure = *state.menu_failure.lock().expect("menu failure lock");
    match failure {
        Some(MenuFailure::ServerError) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "kitchen display offline").into_response()
        }
        Some(MenuFailure::Malformed) => "<html>maintenance</html>".into_response(),
        None => {
            let language = params
                .get("lang")
                .and_then(|code| code.parse().ok())
                .unwrap_or_default();
            Json(menu(language)).into_response()
        }
    }
}

async fn locale_handler(
    State(state): State<Arc<BackendState>>,
    Path(file): Path<String>,
) -> Response {
    state.locale_requests.fetch_add(1, Ordering::SeqCst);
    let raw = file
        .strip_suffix(".json")
        .and_then(|code| code.parse::<LanguageCode>().ok())
        .and_then(translation_json);
    match raw {
        Some(raw) => ([(header::CONTENT_TYPE, "application/json")], raw).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn order_status(State(state): State<Arc<BackendState>>) -> Json<OrderAcceptance> {
    Json(OrderAcceptance {
        accepting: !state.closed.load(Ordering::SeqCst),
        message: state.notice.lock().expect("notice lock").clone(),
    })
}

async fn submit_order(
    State(state): State<Arc<BackendState>>,
    Json(request): Json<CheckoutRequest>,
) -> Json<OrderConfirmation> {
    state.orders.lock().expect("orders lock").push(request);
    let id = state.next_order.fetch_add(1, Ordering::SeqCst) + 1;
    Json(OrderConfirmation {
        order_id: OrderId::new(id),
        estimated_minutes: Some(15),
    })
}
