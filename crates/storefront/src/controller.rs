//! Cart controller: page events in, store mutations and renders out.
//!
//! The controller owns everything one page session needs (shop client,
//! catalog, cart store) and turns each [`CartEvent`] into store mutations
//! followed by a render. It holds no business state of its own beyond
//! whether the session has ended by navigating to checkout.

use cartwheel_core::ProductId;

use crate::catalog::ProductCatalog;
use crate::checkout::{self, CheckoutError};
use crate::error::add_breadcrumb;
use crate::shop::ShopClient;
use crate::storage::KeyValueStore;
use crate::store::CartStore;
use crate::surface::CartSurface;
use crate::view::{CartView, ProductGridView};

/// Key that dismisses the cart panel.
pub const DISMISS_KEY: &str = "Escape";

/// A discrete page interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// "Add to Cart" pressed on a product card.
    AddToCart(ProductId),
    /// Stepper "+" pressed on a cart line.
    Increment(ProductId),
    /// Stepper "−" pressed on a cart line.
    Decrement(ProductId),
    /// Cart button pressed.
    ToggleCart,
    /// Cart close button pressed.
    CloseCart,
    /// A key was pressed anywhere on the page.
    KeyDown(String),
    /// Checkout button pressed with the current order notes.
    Checkout { notes: String },
}

/// One page session of the cart widget.
#[derive(Debug)]
pub struct CartController<S> {
    client: ShopClient,
    catalog: ProductCatalog,
    store: CartStore<S>,
    finished: bool,
}

impl<S: KeyValueStore> CartController<S> {
    /// Start a page session: load the catalog, restore the cart, render once.
    pub async fn start(client: ShopClient, storage: S, surface: &mut impl CartSurface) -> Self {
        let mut catalog = ProductCatalog::default();
        catalog.load(&client).await;

        let store = CartStore::restore(storage);

        let controller = Self {
            client,
            catalog,
            store,
            finished: false,
        };
        ProductGridView::from(&controller.catalog).render(surface);
        controller.render_cart(surface);
        controller
    }

    /// Handle one page event.
    ///
    /// Events arriving after a successful checkout navigation are ignored.
    pub async fn handle(&mut self, event: CartEvent, surface: &mut impl CartSurface) {
        if self.finished {
            tracing::debug!(?event, "Ignoring event after checkout navigation");
            return;
        }

        match event {
            CartEvent::AddToCart(id) => {
                add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
                self.store.add(&id);
                self.render_cart(surface);
            }
            CartEvent::Increment(id) => self.step(&id, 1, surface),
            CartEvent::Decrement(id) => self.step(&id, -1, surface),
            CartEvent::ToggleCart => surface.toggle_cart_panel(),
            CartEvent::CloseCart => surface.hide_cart_panel(),
            CartEvent::KeyDown(key) => {
                if key == DISMISS_KEY {
                    surface.hide_cart_panel();
                }
            }
            CartEvent::Checkout { notes } => self.checkout(&notes, surface).await,
        }
    }

    /// Products loaded for this session.
    #[must_use]
    pub const fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// The cart.
    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Whether the session ended by navigating to checkout.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current display state of the cart.
    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::derive(self.store.snapshot(), &self.catalog)
    }

    fn step(&mut self, id: &ProductId, delta: i64, surface: &mut impl CartSurface) {
        add_breadcrumb("cart", "Changed quantity", Some(&[("product_id", id.as_str())]));
        let current = i64::from(self.store.quantity(id));
        self.store.set_quantity(id, current + delta);
        self.render_cart(surface);
    }

    fn render_cart(&self, surface: &mut impl CartSurface) {
        self.cart_view().render(surface);
    }

    async fn checkout(&mut self, notes: &str, surface: &mut impl CartSurface) {
        add_breadcrumb("checkout", "Checkout requested", None);
        match checkout::checkout(&self.client, self.store.snapshot(), notes).await {
            Ok(url) => {
                self.finished = true;
                surface.navigate(&url);
            }
            Err(CheckoutError::EmptyCart) => {
                surface.notify(CheckoutError::EmptyCart.user_message());
            }
            Err(e) => {
                tracing::error!(error = %e, "Checkout failed");
                surface.notify(e.user_message());
            }
        }
    }
}
