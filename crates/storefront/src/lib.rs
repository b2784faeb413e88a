//! Bistro storefront library.
//!
//! Client-side core of the restaurant ordering site: the cart model, the
//! translation resolver, durable client storage, the backend API client and
//! the command facade a view drives.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cart;
pub mod commands;
pub mod config;
pub mod error;
pub mod i18n;
pub mod state;
pub mod storage;

pub use commands::{Command, Outcome};
pub use config::StorefrontConfig;
pub use error::{AppError, Result};
pub use state::Storefront;
