//! The storefront facade a view drives.
//!
//! [`Storefront`] owns the cart, the translation resolver and the optional
//! backend client. Views send [`Command`]s through [`Storefront::dispatch`]
//! and render the returned [`Outcome`]; change notifications are available
//! from the cart and resolver `subscribe` methods.

use std::sync::Arc;

use bistro_core::{CurrencyCode, Customization, MenuProduct, ProductId, Quantity};
use tracing::{debug, info, instrument, warn};

use crate::backend::{BackendClient, BackendError};
use crate::cart::{CartService, CartUpdate, Clock, SystemClock};
use crate::commands::{CartSummary, CartSummaryLine, CheckoutReceipt, Command, Outcome};
use crate::config::{StorefrontConfig, TranslationsLocation};
use crate::error::{AppError, CheckoutError, Result, add_breadcrumb};
use crate::i18n::{
    ConfiguredSource, DirectorySource, HttpSource, I18n, ResolverState, TranslationSource,
};
use crate::storage::{FileStore, KeyValueStore};

/// Cart, translations and backend bound together.
pub struct Storefront<S, T> {
    cart: CartService<S>,
    i18n: I18n<S, T>,
    backend: Option<BackendClient>,
    currency: CurrencyCode,
}

impl Storefront<Arc<FileStore>, ConfiguredSource> {
    /// Build a storefront from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built. An unreadable
    /// state file only costs the saved cart and language.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self> {
        let store = Arc::new(FileStore::open(&config.state_file));
        let http = config.http_client().map_err(BackendError::from)?;

        let source = match &config.translations {
            TranslationsLocation::Url(url) => {
                ConfiguredSource::Http(HttpSource::new(http.clone(), url.clone()))
            }
            TranslationsLocation::Dir(dir) => ConfiguredSource::Directory(DirectorySource::new(dir)),
        };

        let mut storefront = Self::new(store, source).with_currency(config.currency);
        if let Some(api_url) = &config.api_url {
            storefront = storefront.with_backend(BackendClient::new(http, api_url.clone()));
        }
        Ok(storefront)
    }
}

impl<S: KeyValueStore + Clone, T: TranslationSource> Storefront<S, T> {
    /// Restore the cart from `store` and prepare a resolver reading from
    /// `source`. Call [`start`](Self::start) before dispatching.
    #[must_use]
    pub fn new(store: S, source: T) -> Self {
        Self::with_clock(store, source, Arc::new(SystemClock))
    }

    /// Like [`new`](Self::new) with an explicit clock for line identities.
    #[must_use]
    pub fn with_clock(store: S, source: T, clock: Arc<dyn Clock>) -> Self {
        Self {
            cart: CartService::restore_with_clock(store.clone(), clock),
            i18n: I18n::new(store, source),
            backend: None,
            currency: CurrencyCode::default(),
        }
    }

    /// Use `backend` for the menu, add-on prices and checkout.
    #[must_use]
    pub fn with_backend(mut self, backend: BackendClient) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Display currency for totals.
    #[must_use]
    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }
}

impl<S: KeyValueStore, T: TranslationSource> Storefront<S, T> {
    /// Load translations and, with a backend, the customization catalog.
    ///
    /// Catalog failures are logged; add-ons are then priced at zero.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> ResolverState {
        let state = self.i18n.init().await;

        if let Some(backend) = &self.backend {
            match backend.customization_options().await {
                Ok(catalog) => self.cart.set_catalog(catalog),
                Err(e) => warn!(error = %e, "Failed to load customization options"),
            }
        }

        info!(language = %self.i18n.language(), lines = self.cart.lines().len(), "Storefront ready");
        state
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &CartService<S> {
        &self.cart
    }

    /// The cart, mutably.
    pub const fn cart_mut(&mut self) -> &mut CartService<S> {
        &mut self.cart
    }

    /// The translation resolver.
    #[must_use]
    pub const fn i18n(&self) -> &I18n<S, T> {
        &self.i18n
    }

    /// The translation resolver, mutably.
    pub const fn i18n_mut(&mut self) -> &mut I18n<S, T> {
        &mut self.i18n
    }

    /// The backend client, if configured.
    #[must_use]
    pub const fn backend(&self) -> Option<&BackendClient> {
        self.backend.as_ref()
    }

    /// Display currency.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Translate a key in the active language.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        self.i18n.translate(key)
    }

    /// Add a product the caller already holds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ProductUnavailable`] if the product is sold out.
    pub fn add_product(
        &mut self,
        product: &MenuProduct,
        quantity: Quantity,
        customization: Customization,
    ) -> Result<CartUpdate> {
        if !product.available {
            return Err(AppError::ProductUnavailable(product.id));
        }
        Ok(self.cart.add_item(product, quantity, customization))
    }

    /// Current cart with per-line totals.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            lines: self
                .cart
                .lines()
                .iter()
                .map(|item| CartSummaryLine {
                    total: self.cart.item_total(item),
                    item: item.clone(),
                })
                .collect(),
            item_count: self.cart.item_count(),
            subtotal: self.cart.subtotal(),
            currency: self.currency,
        }
    }

    /// Execute one command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected or a service call fails.
    /// Cart and language state are unchanged on error.
    #[instrument(skip(self, command), fields(command = command.name()))]
    pub async fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        add_breadcrumb("command", command.name(), None);

        match command {
            Command::AddItem {
                product_id,
                quantity,
                customization,
            } => {
                let quantity = Quantity::new(quantity)?;
                let product = self.find_product(product_id).await?;
                let update = self.add_product(&product, quantity, customization)?;
                Ok(Outcome::CartChanged(update))
            }
            Command::UpdateQuantity { line_id, delta } => {
                let update = self.cart.update_quantity(&line_id, delta)?;
                Ok(Outcome::CartChanged(update))
            }
            Command::RemoveItem { line_id } => {
                let update = self.cart.remove_item(&line_id)?;
                Ok(Outcome::CartChanged(update))
            }
            Command::ClearCart => Ok(Outcome::CartChanged(self.cart.clear())),
            Command::ShowCart => Ok(Outcome::Cart(self.summary())),
            Command::SetLanguage { code } => {
                let update = self.i18n.set_language(&code).await?;
                self.refresh_menu().await;
                Ok(Outcome::LanguageChanged(update))
            }
            Command::Translate { key, variables } => {
                let variables: Vec<(&str, &str)> = variables
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect();
                Ok(Outcome::Text(self.i18n.translate_with(&key, &variables)))
            }
            Command::ShowMenu => {
                let backend = self.backend.as_ref().ok_or(AppError::NoBackend)?;
                let language = self.i18n.language();
                let menu = backend.menu(language).await?;
                Ok(Outcome::Menu { language, menu })
            }
            Command::Checkout => self.checkout().await.map(Outcome::CheckedOut),
        }
    }

    async fn find_product(&self, product_id: ProductId) -> Result<MenuProduct> {
        let backend = self.backend.as_ref().ok_or(AppError::NoBackend)?;
        let menu = backend.menu(self.i18n.language()).await?;
        menu.product(product_id)
            .cloned()
            .ok_or(AppError::ProductNotFound(product_id))
    }

    /// Refetch language-bound menu data after a language change.
    async fn refresh_menu(&self) {
        let Some(backend) = &self.backend else {
            return;
        };
        match backend.refresh(self.i18n.language()).await {
            Ok(menu) => debug!(products = menu.products.len(), "Menu refreshed"),
            Err(e) => warn!(error = %e, "Failed to refresh menu after language change"),
        }
    }

    async fn checkout(&mut self) -> Result<CheckoutReceipt> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }
        let backend = self.backend.as_ref().ok_or(AppError::NoBackend)?;

        let status = backend.order_status().await?;
        if !status.accepting {
            return Err(CheckoutError::NotAccepting(status.message).into());
        }

        let request = self.cart.checkout_request(self.i18n.language());
        let confirmation = backend.submit_order(&request).await?;
        info!(order_id = %confirmation.order_id, subtotal = %request.subtotal, "Order placed");

        let cleared = self.cart.clear();
        Ok(CheckoutReceipt {
            confirmation,
            subtotal: request.subtotal,
            persistence: cleared.persistence,
        })
    }
}
