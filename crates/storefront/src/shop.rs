//! HTTP client for the shop origin.
//!
//! Two endpoints are used by the cart: the static product feed and the
//! checkout session endpoint. Both are plain JSON over HTTP via `reqwest`.
//!
//! # Example
//!
//! ```rust,ignore
//! use cartwheel_storefront::shop::ShopClient;
//!
//! let client = ShopClient::new(&config);
//! let products = client.fetch_products().await?;
//! let session = client.create_checkout_session(&request).await?;
//! ```

use std::sync::Arc;

use cartwheel_core::CartLine;
use reqwest::StatusCode;
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ShopConfig;

/// Errors that can occur when talking to the shop origin.
#[derive(Debug, Error)]
pub enum ShopError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: StatusCode, url: Url },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Checkout session request body.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSessionRequest<'a> {
    /// Raw cart lines, in cart order.
    pub items: &'a [CartLine],
    /// Free-text order notes.
    pub notes: &'a str,
}

/// Checkout session response body.
///
/// The endpoint returns `{"url": "..."}` on success and `{"error": "..."}`
/// on failure; either field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSessionResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Raw outcome of a checkout session call: transport status plus body.
#[derive(Debug, Clone)]
pub struct CheckoutSessionReply {
    pub status: StatusCode,
    pub body: Result<CheckoutSessionResponse, String>,
}

/// Client for the shop origin.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ShopClient {
    inner: Arc<ShopClientInner>,
}

struct ShopClientInner {
    client: reqwest::Client,
    base_url: Url,
    catalog_url: Url,
    checkout_url: Url,
}

impl std::fmt::Debug for ShopClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("catalog_url", &self.inner.catalog_url.as_str())
            .field("checkout_url", &self.inner.checkout_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ShopClient {
    /// Create a client for the configured shop origin.
    #[must_use]
    pub fn new(config: &ShopConfig) -> Self {
        Self::with_urls(
            config.base_url.clone(),
            config.catalog_url.clone(),
            config.checkout_url.clone(),
        )
    }

    /// Create a client with explicit endpoint URLs.
    #[must_use]
    pub fn with_urls(base_url: Url, catalog_url: Url, checkout_url: Url) -> Self {
        Self {
            inner: Arc::new(ShopClientInner {
                client: reqwest::Client::new(),
                base_url,
                catalog_url,
                checkout_url,
            }),
        }
    }

    /// Shop origin.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetch the product feed as untyped JSON.
    ///
    /// Shape checks are left to the catalog so one bad entry does not reject
    /// the whole feed.
    ///
    /// # Errors
    ///
    /// Returns `ShopError` on transport failure, non-success status, or a body
    /// that is not JSON.
    #[instrument(skip(self), fields(url = %self.inner.catalog_url))]
    pub async fn fetch_products(&self) -> Result<serde_json::Value, ShopError> {
        let response = self
            .inner
            .client
            .get(self.inner.catalog_url.clone())
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShopError::Status {
                status,
                url: self.inner.catalog_url.clone(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Ask the checkout endpoint to create a payment session.
    ///
    /// Non-success statuses are not an error here: the status and the parsed
    /// body (or the parse failure) are returned together so the caller can
    /// surface the server's error message.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Http` if the request cannot be sent or the body
    /// cannot be read.
    #[instrument(skip(self, request), fields(url = %self.inner.checkout_url, items = request.items.len()))]
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest<'_>,
    ) -> Result<CheckoutSessionReply, ShopError> {
        let response = self
            .inner
            .client
            .post(self.inner.checkout_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str::<CheckoutSessionResponse>(&text).map_err(|e| {
            tracing::debug!(
                error = %e,
                body = %text.chars().take(200).collect::<String>(),
                "Checkout response is not valid JSON"
            );
            e.to_string()
        });

        Ok(CheckoutSessionReply { status, body })
    }
}
