//! Product catalog for the page session.
//!
//! The catalog is loaded once from the shop's static product feed and is
//! read-only afterwards. Loading fails soft: any failure leaves an empty
//! catalog, which the page renders as "no products" rather than an error.

use cartwheel_core::{Product, ProductId};
use thiserror::Error;

use crate::shop::{ShopClient, ShopError};

/// Reasons a catalog load produced no products.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Fetching the feed failed.
    #[error("could not load product feed: {0}")]
    Fetch(#[from] ShopError),

    /// The feed is valid JSON but not an array.
    #[error("product feed is not a JSON array")]
    NotAnArray,
}

/// Ordered, immutable list of sellable products.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    /// Create a catalog from already-loaded products.
    #[must_use]
    pub const fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load the catalog from the shop, replacing any current contents.
    ///
    /// Never fails: on error the catalog is left empty and the error is
    /// logged.
    pub async fn load(&mut self, client: &ShopClient) {
        match fetch_catalog(client).await {
            Ok(products) => {
                tracing::info!(count = products.len(), "Loaded products");
                self.products = products;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load product catalog");
                self.products = Vec::new();
            }
        }
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// All products, in feed order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

async fn fetch_catalog(client: &ShopClient) -> Result<Vec<Product>, CatalogError> {
    let feed = client.fetch_products().await?;
    parse_feed(feed)
}

/// Turn the raw feed into products, skipping entries that don't parse.
fn parse_feed(feed: serde_json::Value) -> Result<Vec<Product>, CatalogError> {
    let serde_json::Value::Array(entries) = feed else {
        return Err(CatalogError::NotAnArray);
    };

    let products = entries
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, entry)| match serde_json::from_value::<Product>(entry) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping invalid product entry");
                    None
                }
            },
        )
        .collect();

    Ok(products)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::get};
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::test_support::{client_for, serve};

    #[test]
    fn test_parse_feed_skips_invalid_entries() {
        let feed = json!([
            {"id": "a", "name": "Apron", "price": 10, "image": "/a.jpg"},
            {"name": "missing id"},
            {"id": "neg", "price": -1},
            {"id": 7, "name": "Seven", "price": "3.50"}
        ]);

        let products = parse_feed(feed).unwrap();
        let ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "7"]);
        assert_eq!(products[1].price.amount(), Decimal::new(350, 2));
    }

    #[test]
    fn test_parse_feed_rejects_non_array() {
        assert!(matches!(
            parse_feed(json!({"products": []})),
            Err(CatalogError::NotAnArray)
        ));
    }

    #[test]
    fn test_get_matches_numeric_and_string_ids() {
        let products: Vec<Product> =
            serde_json::from_value(json!([{"id": 12, "name": "Twelve", "price": 1}])).unwrap();
        let catalog = ProductCatalog::from_products(products);

        assert_eq!(catalog.get(&ProductId::new("12")).unwrap().name, "Twelve");
        assert!(catalog.get(&ProductId::new("13")).is_none());
    }

    #[tokio::test]
    async fn test_load_from_shop() {
        let app = Router::new().route(
            "/assets/products.json",
            get(|| async {
                Json(json!([
                    {"id": "a", "name": "Apron", "price": 10, "image": "/a.jpg"},
                    {"id": "b", "name": "Bib", "price": 5, "image": "/b.jpg"}
                ]))
            }),
        );
        let client = client_for(serve(app).await);

        let mut catalog = ProductCatalog::default();
        catalog.load(&client).await;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.all()[0].name, "Apron");
    }

    #[tokio::test]
    async fn test_load_fails_soft_on_error_status() {
        let app = Router::new().route(
            "/assets/products.json",
            get(|| async { (StatusCode::NOT_FOUND, "missing") }),
        );
        let client = client_for(serve(app).await);

        let mut catalog = ProductCatalog::from_products(vec![
            serde_json::from_value(json!({"id": "stale"})).unwrap(),
        ]);
        catalog.load(&client).await;

        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_load_fails_soft_on_invalid_json() {
        let app = Router::new().route("/assets/products.json", get(|| async { "<html>" }));
        let client = client_for(serve(app).await);

        let mut catalog = ProductCatalog::default();
        catalog.load(&client).await;

        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_load_fails_soft_when_unreachable() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut catalog = ProductCatalog::default();
        catalog.load(&client_for(addr)).await;

        assert!(catalog.is_empty());
    }
}
