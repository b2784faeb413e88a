//! Commands a view dispatches to the [`Storefront`](crate::state::Storefront)
//! and the outcomes it renders from.

use bistro_core::{
    CartLineItem, CurrencyCode, Customization, LanguageCode, LineId, Menu, OrderConfirmation,
    Price, ProductId,
};

use crate::cart::CartUpdate;
use crate::i18n::LanguageUpdate;
use crate::storage::Persistence;

/// A user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a menu product with its customization.
    AddItem {
        product_id: ProductId,
        quantity: u32,
        customization: Customization,
    },
    /// Add `delta` servings to a line (negative to remove servings).
    UpdateQuantity { line_id: LineId, delta: i64 },
    RemoveItem { line_id: LineId },
    ClearCart,
    ShowCart,
    SetLanguage { code: String },
    /// Translate a key, filling `{{name}}` placeholders.
    Translate {
        key: String,
        variables: Vec<(String, String)>,
    },
    ShowMenu,
    Checkout,
}

impl Command {
    /// Short name for logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddItem { .. } => "add_item",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::RemoveItem { .. } => "remove_item",
            Self::ClearCart => "clear_cart",
            Self::ShowCart => "show_cart",
            Self::SetLanguage { .. } => "set_language",
            Self::Translate { .. } => "translate",
            Self::ShowMenu => "show_menu",
            Self::Checkout => "checkout",
        }
    }
}

/// One cart line with its computed total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummaryLine {
    pub item: CartLineItem,
    pub total: Price,
}

/// Everything the cart sidebar renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<CartSummaryLine>,
    pub item_count: u32,
    pub subtotal: Price,
    pub currency: CurrencyCode,
}

/// A confirmed checkout handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub confirmation: OrderConfirmation,
    pub subtotal: Price,
    /// Whether the emptied cart was persisted.
    pub persistence: Persistence,
}

/// Result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The cart changed.
    CartChanged(CartUpdate),
    Cart(CartSummary),
    LanguageChanged(LanguageUpdate),
    Text(String),
    Menu { language: LanguageCode, menu: Menu },
    CheckedOut(CheckoutReceipt),
}
