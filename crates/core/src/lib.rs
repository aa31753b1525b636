//! Cartwheel Core - Shared types library.
//!
//! This crate provides the types shared by the cart components:
//! - `storefront` - Cart store, view, checkout and controller
//! - `integration-tests` - End-to-end page session tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, USD prices, catalog products and cart lines

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
