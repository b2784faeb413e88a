//! Client for the restaurant backend REST API.
//!
//! # Endpoints
//!
//! - `GET /api/customization-options` - sauces, fries and extras with prices
//! - `GET /api/menu?lang=<code>` - localized menu, cached per language
//! - `GET /api/orders/status` - whether orders are being accepted
//! - `POST /api/orders` - checkout handoff

use std::sync::Arc;
use std::time::Duration;

use bistro_core::{
    CheckoutRequest, CustomizationCatalog, LanguageCode, Menu, OrderAcceptance, OrderConfirmation,
};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Client for the backend API.
///
/// Menus are cached per language for 5 minutes.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base: Url,
    menus: Cache<LanguageCode, Menu>,
}

impl BackendClient {
    /// Create a client for the API rooted at `base`.
    #[must_use]
    pub fn new(client: reqwest::Client, mut base: Url) -> Self {
        // Keep any path prefix: join() replaces the last segment otherwise.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let menus = Cache::builder()
            .max_capacity(LanguageCode::ALL.len() as u64)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client,
                base,
                menus,
            }),
        }
    }

    /// Absolute URL for an API path such as `/api/menu`.
    ///
    /// The path is resolved below the base URL, so a prefix like
    /// `https://host/bistro/` is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.inner.base.join(path.trim_start_matches('/'))?)
    }

    /// Fetch the customization catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn customization_options(&self) -> Result<CustomizationCatalog, BackendError> {
        let url = self.endpoint("/api/customization-options")?;
        self.get_json(url).await
    }

    /// Fetch the menu in `language`, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn menu(&self, language: LanguageCode) -> Result<Menu, BackendError> {
        if let Some(menu) = self.inner.menus.get(&language).await {
            debug!("Menu cache hit");
            return Ok(menu);
        }

        let mut url = self.endpoint("/api/menu")?;
        url.query_pairs_mut().append_pair("lang", language.code());

        let menu: Menu = self.get_json(url).await?;
        self.inner.menus.insert(language, menu.clone()).await;
        Ok(menu)
    }

    /// Drop the cached menu for `language` and fetch it again.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn refresh(&self, language: LanguageCode) -> Result<Menu, BackendError> {
        self.inner.menus.invalidate(&language).await;
        self.menu(language).await
    }

    /// Whether the restaurant is taking orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn order_status(&self) -> Result<OrderAcceptance, BackendError> {
        let url = self.endpoint("/api/orders/status")?;
        self.get_json(url).await
    }

    /// Hand the cart over for checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order is refused.
    #[instrument(skip(self, request), fields(lines = request.lines.len()))]
    pub async fn submit_order(
        &self,
        request: &CheckoutRequest,
    ) -> Result<OrderConfirmation, BackendError> {
        let url = self.endpoint("/api/orders")?;
        let response = self.inner.client.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let response = self.inner.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn test_endpoints_are_rooted_at_host() {
        let backend = client("https://bistro.example.com/");
        assert_eq!(
            backend.endpoint("/api/orders/status").unwrap().as_str(),
            "https://bistro.example.com/api/orders/status"
        );
    }

    #[test]
    fn test_endpoints_keep_path_prefix() {
        for base in ["https://bistro.example.com/shop", "https://bistro.example.com/shop/"] {
            let backend = client(base);
            assert_eq!(
                backend.endpoint("/api/menu").unwrap().as_str(),
                "https://bistro.example.com/shop/api/menu"
            );
        }
    }
}
