//! Shopping cart.
//!
//! [`CartService`] is the single source of truth the view renders from. It
//! owns the cart lines, prices them against the customization catalog,
//! persists after every mutation and publishes a [`CartChange`] for each
//! mutation on a broadcast channel.
//!
//! Persistence is best effort: when a write fails the cart keeps working in
//! memory and the failure is reported in the returned [`CartUpdate`].

mod identity;
mod model;
mod pricing;

pub use identity::{Clock, ManualClock, SystemClock, fingerprint, line_id, to_base36};
pub use model::{Adjustment, Cart, Insertion};
pub use pricing::{
    EXTRA_SURCHARGE_CENTS, extras_surcharge, fries_add_on, item_total, subtotal, unit_total,
};

use std::sync::Arc;

use bistro_core::{
    CartLineItem, CheckoutRequest, Customization, CustomizationCatalog, LanguageCode, LineId,
    MenuProduct, Price, Quantity,
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::storage::{KeyValueStore, Persistence, StorageError, keys};

/// Capacity of the change notification channel.
const EVENT_CAPACITY: usize = 64;

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No line with this identity.
    #[error("cart line not found: {0}")]
    LineNotFound(LineId),
}

/// What a mutation did to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Appended(LineId),
    /// An add merged into an existing line.
    Merged { line_id: LineId, quantity: Quantity },
    /// A line's quantity changed.
    QuantityChanged { line_id: LineId, quantity: Quantity },
    /// A line was removed.
    Removed(LineId),
    /// Every line was removed.
    Cleared,
}

/// Outcome of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate {
    pub change: CartChange,
    pub persistence: Persistence,
}

/// The cart model bound to a store.
pub struct CartService<S> {
    cart: Cart,
    store: S,
    catalog: CustomizationCatalog,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<CartChange>,
}

impl<S: KeyValueStore> CartService<S> {
    /// Restore the cart from `store` using the system clock.
    ///
    /// Missing or malformed state yields an empty cart.
    #[must_use]
    pub fn restore(store: S) -> Self {
        Self::restore_with_clock(store, Arc::new(SystemClock))
    }

    /// Restore the cart from `store` with an explicit clock.
    #[must_use]
    pub fn restore_with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        let cart = load_cart(&store);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            cart,
            store,
            catalog: CustomizationCatalog::default(),
            clock,
            events,
        }
    }

    /// Replace the catalog used for add-on pricing.
    pub fn set_catalog(&mut self, catalog: CustomizationCatalog) {
        self.catalog = catalog;
    }

    /// The catalog used for add-on pricing.
    #[must_use]
    pub const fn catalog(&self) -> &CustomizationCatalog {
        &self.catalog
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartChange> {
        self.events.subscribe()
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// All lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        self.cart.lines()
    }

    /// Total servings, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Add a product with its customization.
    ///
    /// Appends a new line unless a line with the generated identity already
    /// exists, in which case the quantities are summed (capped at 99).
    pub fn add_item(
        &mut self,
        product: &MenuProduct,
        quantity: Quantity,
        customization: Customization,
    ) -> CartUpdate {
        let timestamp = self.clock.now_millis();
        let id = line_id(product.id, &customization, timestamp);

        let line = CartLineItem {
            id: id.clone(),
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            includes_sides: product.includes_sides,
            customization,
        };

        let change = match self.cart.insert(line) {
            Insertion::Appended => {
                info!(line_id = %id, product_id = %product.id, %quantity, "Added cart line");
                CartChange::Appended(id)
            }
            Insertion::Merged { quantity } => {
                info!(line_id = %id, %quantity, "Merged into existing cart line");
                CartChange::Merged {
                    line_id: id,
                    quantity,
                }
            }
        };

        self.commit(change)
    }

    /// Add `delta` servings to a line; at zero or below the line is removed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no such line exists; the cart is
    /// unchanged.
    pub fn update_quantity(&mut self, line_id: &LineId, delta: i64) -> Result<CartUpdate, CartError> {
        let Some(adjustment) = self.cart.adjust(line_id, delta) else {
            error!(%line_id, delta, "Cannot update quantity of unknown cart line");
            return Err(CartError::LineNotFound(line_id.clone()));
        };

        let change = match adjustment {
            Adjustment::Changed { quantity } => {
                debug!(%line_id, %quantity, "Cart line quantity changed");
                CartChange::QuantityChanged {
                    line_id: line_id.clone(),
                    quantity,
                }
            }
            Adjustment::Removed => {
                info!(%line_id, "Cart line removed by quantity update");
                CartChange::Removed(line_id.clone())
            }
        };

        Ok(self.commit(change))
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no such line exists.
    pub fn remove_item(&mut self, line_id: &LineId) -> Result<CartUpdate, CartError> {
        if self.cart.remove(line_id).is_none() {
            error!(%line_id, "Cannot remove unknown cart line");
            return Err(CartError::LineNotFound(line_id.clone()));
        }

        info!(%line_id, "Removed cart line");
        Ok(self.commit(CartChange::Removed(line_id.clone())))
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> CartUpdate {
        self.cart.clear();
        info!("Cart cleared");
        self.commit(CartChange::Cleared)
    }

    /// Total for one line, add-ons included.
    #[must_use]
    pub fn item_total(&self, item: &CartLineItem) -> Price {
        pricing::item_total(item, &self.catalog)
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        pricing::subtotal(self.cart.lines(), &self.catalog)
    }

    /// Encode the cart as its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be encoded.
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        self.cart.serialize()
    }

    /// Build the payload handed to the checkout flow.
    #[must_use]
    pub fn checkout_request(&self, language: LanguageCode) -> CheckoutRequest {
        CheckoutRequest {
            lines: self.cart.lines().to_vec(),
            subtotal: self.subtotal(),
            language,
            placed_at: chrono::Utc::now(),
        }
    }

    fn commit(&self, change: CartChange) -> CartUpdate {
        let persistence = self.persist();
        // No subscribers is fine.
        let _ = self.events.send(change.clone());
        CartUpdate {
            change,
            persistence,
        }
    }

    fn persist(&self) -> Persistence {
        let result = self
            .cart
            .serialize()
            .map_err(StorageError::from)
            .and_then(|raw| self.store.set(keys::CART_STATE, &raw));

        if let Err(e) = &result {
            warn!(error = %e, "Failed to persist cart, continuing in memory");
        }
        Persistence::from(result)
    }
}

/// Read the persisted cart, falling back to an empty one.
fn load_cart(store: &impl KeyValueStore) -> Cart {
    match store.get(keys::CART_STATE) {
        Ok(Some(raw)) => Cart::deserialize(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Stored cart is malformed, starting empty");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart, starting empty");
            Cart::new()
        }
    }
}
