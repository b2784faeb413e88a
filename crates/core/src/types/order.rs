//! Checkout handoff shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartLineItem;
use super::id::OrderId;
use super::language::LanguageCode;
use super::price::Price;

/// The serialized cart handed to the checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub lines: Vec<CartLineItem>,
    pub subtotal: Price,
    /// Language the customer ordered in, for receipts.
    pub language: LanguageCode,
    pub placed_at: DateTime<Utc>,
}

/// Backend acknowledgement of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
}
