//! Cartwheel Storefront library.
//!
//! The shop page's cart widget as a library: product catalog, persisted cart
//! store, derived cart view, checkout handoff and the controller that wires
//! page events to them. The page itself is abstracted as a
//! [`surface::CartSurface`], so a whole page session can be driven and tested
//! without a browser.
//!
//! # Modules
//!
//! - [`catalog`] - Product feed loading (fails soft to an empty catalog)
//! - [`store`] - Cart lines and their persistence
//! - [`view`] - Derived totals and HTML fragments
//! - [`checkout`] - Checkout session request and redirect target
//! - [`controller`] - Page events to store mutations and renders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod controller;
pub mod error;
pub mod shop;
pub mod storage;
pub mod store;
pub mod surface;
pub mod view;

#[cfg(test)]
mod test_support;
