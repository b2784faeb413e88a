//! Core types for Bistro.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod customization;
pub mod id;
pub mod language;
pub mod menu;
pub mod order;
pub mod price;
pub mod quantity;

pub use cart::CartLineItem;
pub use customization::{
    Customization, CustomizationCatalog, CustomizationOption, INCLUDED_FRIES, NO_FRIES,
    OptionSlug,
};
pub use id::*;
pub use language::{LanguageCode, LanguageError};
pub use menu::{Menu, MenuCategory, MenuProduct, OrderAcceptance};
pub use order::{CheckoutRequest, OrderConfirmation};
pub use price::{CurrencyCode, Price};
pub use quantity::{Quantity, QuantityError};
