//! Bistro Core - Shared domain types.
//!
//! This crate provides the types used across all Bistro components:
//! - `storefront` - Cart model, i18n resolver, storage and backend client
//! - `cli` - Terminal front end driving the storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. Pricing and identity rules live with the cart model in
//! the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, quantities, languages, customizations, menu
//!   and cart line shapes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
