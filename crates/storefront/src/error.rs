//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type returned by command dispatch. Front ends
//! call [`AppError::report`] so that service failures reach Sentry while
//! input mistakes are only logged.

use bistro_core::{LanguageError, ProductId, QuantityError};
use thiserror::Error;

use crate::backend::BackendError;
use crate::cart::CartError;
use crate::config::ConfigError;
use crate::i18n::I18nError;
use crate::storage::StorageError;

/// Reasons a checkout handoff is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    /// The backend reports it is not accepting orders.
    #[error("orders are not being accepted{}", format_notice(.0.as_deref()))]
    NotAccepting(Option<String>),
}

fn format_notice(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart mutation referred to a missing line.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Quantity outside 1..=99.
    #[error("Invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    /// Unsupported language code.
    #[error("Language error: {0}")]
    Language(#[from] LanguageError),

    /// Language change failed.
    #[error("Translation error: {0}")]
    I18n(#[from] I18nError),

    /// Backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Checkout refused.
    #[error("Checkout refused: {0}")]
    Checkout(#[from] CheckoutError),

    /// Store could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Product is not on the menu.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Product is on the menu but sold out.
    #[error("Product unavailable: {0}")]
    ProductUnavailable(ProductId),

    /// The command needs a backend and none is configured.
    #[error("No backend configured (set BISTRO_API_URL)")]
    NoBackend,
}

impl AppError {
    /// Whether the error was caused by the caller's input rather than a
    /// failing service.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Cart(_)
                | Self::Quantity(_)
                | Self::Language(_)
                | Self::I18n(I18nError::Language(_))
                | Self::Checkout(_)
                | Self::ProductNotFound(_)
                | Self::ProductUnavailable(_)
                | Self::NoBackend
        )
    }

    /// Log the error, capturing service failures to Sentry.
    pub fn report(&self) {
        if self.is_user_error() {
            tracing::warn!(error = %self, "Command rejected");
            return;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Command failed"
        );
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
