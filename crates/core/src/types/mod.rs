//! Core types for Cartwheel.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::CartLine;
pub use id::ProductId;
pub use price::{Price, PriceError, format_usd};
pub use product::Product;
