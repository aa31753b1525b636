//! Storefront cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARTWHEEL_BASE_URL` - Shop origin the page was served from (e.g., `https://shop.example.com`)
//!
//! ## Optional
//! - `CARTWHEEL_CATALOG_PATH` - Product feed path (default: `/assets/products.json`)
//! - `CARTWHEEL_CHECKOUT_PATH` - Checkout session endpoint (default: `/api/create-checkout-session`)
//! - `CARTWHEEL_STATE_DIR` - Directory holding the persisted cart (default: `.cartwheel`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

pub const DEFAULT_CATALOG_PATH: &str = "/assets/products.json";
pub const DEFAULT_CHECKOUT_PATH: &str = "/api/create-checkout-session";
pub const DEFAULT_STATE_DIR: &str = ".cartwheel";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart page session configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Shop origin; relative URLs from the shop resolve against it
    pub base_url: Url,
    /// Resolved product feed URL
    pub catalog_url: Url,
    /// Resolved checkout session endpoint
    pub checkout_url: Url,
    /// Directory for the file-backed key-value store
    pub state_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "CARTWHEEL_BASE_URL",
            &get("CARTWHEEL_BASE_URL")
                .ok_or_else(|| ConfigError::MissingEnvVar("CARTWHEEL_BASE_URL".to_string()))?,
        )?;

        let catalog_path = get("CARTWHEEL_CATALOG_PATH")
            .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string());
        let catalog_url = join_url(&base_url, "CARTWHEEL_CATALOG_PATH", &catalog_path)?;

        let checkout_path = get("CARTWHEEL_CHECKOUT_PATH")
            .unwrap_or_else(|| DEFAULT_CHECKOUT_PATH.to_string());
        let checkout_url = join_url(&base_url, "CARTWHEEL_CHECKOUT_PATH", &checkout_path)?;

        let state_dir = get("CARTWHEEL_STATE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from);

        Ok(Self {
            base_url,
            catalog_url,
            checkout_url,
            state_dir,
            sentry_dsn: get("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the shop origin, which must be an absolute http(s) URL.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

/// Resolve an endpoint path against the shop origin.
fn join_url(base: &Url, key: &str, path: &str) -> Result<Url, ConfigError> {
    base.join(path.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
