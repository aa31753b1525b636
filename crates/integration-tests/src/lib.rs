//! Integration tests for Cartwheel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests
//! ```
//!
//! The tests start an in-process fake shop origin (product feed plus
//! checkout endpoint) with [`FakeShop::start`] and drive full page sessions
//! against it.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get, routing::post};
use cartwheel_storefront::shop::ShopClient;
use serde_json::{Value, json};
use url::Url;

/// What the fake checkout endpoint answers with.
#[derive(Debug, Clone)]
pub struct CheckoutReply {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Debug, Default)]
struct ShopState {
    products: Value,
    checkout: Option<CheckoutReply>,
    checkout_requests: Vec<Value>,
}

type SharedState = Arc<Mutex<ShopState>>;

/// In-process shop origin serving `/assets/products.json` and
/// `/api/create-checkout-session`.
#[derive(Debug, Clone)]
pub struct FakeShop {
    addr: SocketAddr,
    state: SharedState,
}

impl FakeShop {
    /// Start serving `products` on an ephemeral local port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start(products: Value) -> Self {
        let state = Arc::new(Mutex::new(ShopState {
            products,
            ..ShopState::default()
        }));

        let app = Router::new()
            .route("/assets/products.json", get(products_handler))
            .route("/api/create-checkout-session", post(checkout_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Set the checkout endpoint's reply.
    pub fn reply_to_checkout(&self, status: StatusCode, body: Value) {
        self.lock().checkout = Some(CheckoutReply { status, body });
    }

    /// Bodies of every checkout request received so far.
    #[must_use]
    pub fn checkout_requests(&self) -> Vec<Value> {
        self.lock().checkout_requests.clone()
    }

    /// Shop origin URL.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a URL.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    /// Client for this shop with the default endpoint paths.
    ///
    /// # Panics
    ///
    /// Panics if the endpoint URLs cannot be built.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn client(&self) -> ShopClient {
        let base = self.base_url();
        ShopClient::with_urls(
            base.clone(),
            base.join("/assets/products.json").unwrap(),
            base.join("/api/create-checkout-session").unwrap(),
        )
    }

    fn lock(&self) -> MutexGuard<'_, ShopState> {
        lock(&self.state)
    }
}

fn lock(state: &SharedState) -> MutexGuard<'_, ShopState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn products_handler(State(state): State<SharedState>) -> Json<Value> {
    Json(lock(&state).products.clone())
}

async fn checkout_handler(
    State(state): State<SharedState>,
    Json(request): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.checkout_requests.push(request);
    match state.checkout.clone() {
        Some(reply) => (reply.status, Json(reply.body)).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "checkout not configured"})),
        )
            .into_response(),
    }
}
