//! Product identifiers.
//!
//! Catalog feeds are hand-edited JSON, so an id may arrive as either a
//! string (`"sku-12"`) or a bare integer (`12`). Both forms deserialize into
//! the same [`ProductId`], and ids are always compared by their string form.

use core::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// A product identifier.
///
/// Serialized as a JSON string.
///
/// ```
/// use cartwheel_core::ProductId;
///
/// let from_number: ProductId = serde_json::from_str("7").unwrap();
/// let from_string: ProductId = serde_json::from_str("\"7\"").unwrap();
/// assert_eq!(from_number, from_string);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ProductIdVisitor)
    }
}

struct ProductIdVisitor;

impl Visitor<'_> for ProductIdVisitor {
    type Value = ProductId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a product id string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ProductId(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ProductId(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ProductId(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ProductId(v.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_string_id() {
        let id: ProductId = serde_json::from_str("\"mug-blue\"").unwrap();
        assert_eq!(id.as_str(), "mug-blue");
    }

    #[test]
    fn test_deserialize_integer_id() {
        let id: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ProductId::new("42"));

        let id: ProductId = serde_json::from_str("-3").unwrap();
        assert_eq!(id.as_str(), "-3");
    }

    #[test]
    fn test_deserialize_rejects_other_types() {
        assert!(serde_json::from_str::<ProductId>("1.5").is_err());
        assert!(serde_json::from_str::<ProductId>("null").is_err());
        assert!(serde_json::from_str::<ProductId>("[\"a\"]").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let id = ProductId::new("12");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"12\"");
    }
}
