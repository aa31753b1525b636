//! Catalog product type.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A sellable item as published in the shop's product feed.
///
/// Only `id` is required. A missing `name` or `image` reads as an empty
/// string and a missing or `null` price reads as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier referenced by cart lines.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Unit price in USD.
    #[serde(default)]
    pub price: Price,
    /// Image URL (absolute or relative to the shop origin).
    #[serde(default)]
    pub image: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_deserialize_full_product() {
        let json = r#"{"id": "mug", "name": "Blue Mug", "price": 12.5, "image": "/img/mug.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id.as_str(), "mug");
        assert_eq!(product.name, "Blue Mug");
        assert_eq!(product.price.amount(), Decimal::new(125, 1));
        assert_eq!(product.image, "/img/mug.jpg");
    }

    #[test]
    fn test_deserialize_sparse_product() {
        let product: Product = serde_json::from_str(r#"{"id": 3, "price": null}"#).unwrap();

        assert_eq!(product.id.as_str(), "3");
        assert!(product.name.is_empty());
        assert_eq!(product.price, Price::ZERO);
    }

    #[test]
    fn test_deserialize_rejects_negative_price() {
        let result = serde_json::from_str::<Product>(r#"{"id": "x", "price": -2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_requires_id() {
        assert!(serde_json::from_str::<Product>(r#"{"name": "Nameless"}"#).is_err());
    }
}
