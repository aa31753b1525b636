//! Fake shop origin for unit tests.

use std::net::SocketAddr;

use axum::Router;
use url::Url;

use crate::shop::ShopClient;

/// Serve `app` on an ephemeral local port.
#[allow(clippy::unwrap_used)]
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Client pointed at the default endpoint paths on `addr`.
#[allow(clippy::unwrap_used)]
pub fn client_for(addr: SocketAddr) -> ShopClient {
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    ShopClient::with_urls(
        base.clone(),
        base.join("/assets/products.json").unwrap(),
        base.join("/api/create-checkout-session").unwrap(),
    )
}
