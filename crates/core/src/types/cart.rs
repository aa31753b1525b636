//! Cart line type.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// One (product id, quantity) pairing in a shopping cart.
///
/// This is also the persisted and wire shape: `{"id": "...", "qty": 2}`.
/// The cart store keeps `qty >= 1`; a line that would reach zero is removed
/// rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Referenced product. Not checked against the catalog.
    pub id: ProductId,
    /// Number of units.
    pub qty: u32,
}

impl CartLine {
    /// Create a new cart line.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, qty: u32) -> Self {
        Self {
            id: id.into(),
            qty,
        }
    }
}
