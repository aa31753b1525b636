//! Cart and product grid display state.
//!
//! Display state is derived fresh from the cart and the catalog on every
//! render; nothing here is stored between renders.

use askama::Template;
use cartwheel_core::{CartLine, Price, Product};

use crate::catalog::ProductCatalog;
use crate::surface::CartSurface;

/// Quantity and price sums over the cart lines that resolve in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedTotals {
    pub total_quantity: u64,
    pub total_price: Price,
}

/// Cart line display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

/// Cart display data: line rows plus totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub totals: DerivedTotals,
}

/// Cart items fragment template.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
struct CartItemsTemplate<'a> {
    items: &'a [CartItemView],
}

impl CartView {
    /// Derive display state for `lines` against `catalog`.
    ///
    /// Lines whose id is not in the catalog are skipped and contribute
    /// nothing to the totals.
    #[must_use]
    pub fn derive(lines: &[CartLine], catalog: &ProductCatalog) -> Self {
        let mut view = Self::default();

        for line in lines {
            let Some(product) = catalog.get(&line.id) else {
                tracing::trace!(id = %line.id, "Skipping cart line with unknown product");
                continue;
            };

            let line_total = product.price.times(line.qty);
            view.totals.total_quantity = view
                .totals
                .total_quantity
                .saturating_add(u64::from(line.qty));
            view.totals.total_price = view.totals.total_price + line_total;

            view.items.push(CartItemView {
                id: line.id.to_string(),
                name: product.name.clone(),
                image: product.image.clone(),
                quantity: line.qty,
                unit_price: product.price.to_string(),
                line_price: line_total.to_string(),
            });
        }

        view
    }

    /// Formatted cart total (e.g. `$15.00`).
    #[must_use]
    pub fn subtotal(&self) -> String {
        self.totals.total_price.to_string()
    }

    /// Write the line list, badge and summary to the page.
    pub fn render(&self, surface: &mut impl CartSurface) {
        match (CartItemsTemplate { items: &self.items }).render() {
            Ok(html) => surface.show_cart_lines(html),
            Err(e) => tracing::error!("Template render error: {e}"),
        }

        surface.set_badge(self.totals.total_quantity);
        surface.set_summary_quantity(self.totals.total_quantity);
        surface.set_summary_total(&self.subtotal());
    }
}

/// Product card display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.price.to_string(),
        }
    }
}

/// Product grid display data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductGridView {
    pub products: Vec<ProductCardView>,
}

/// Product grid fragment template.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
struct ProductGridTemplate<'a> {
    products: &'a [ProductCardView],
}

impl From<&ProductCatalog> for ProductGridView {
    fn from(catalog: &ProductCatalog) -> Self {
        Self {
            products: catalog.all().iter().map(ProductCardView::from).collect(),
        }
    }
}

impl ProductGridView {
    /// Write the product grid to the page.
    pub fn render(&self, surface: &mut impl CartSurface) {
        match (ProductGridTemplate {
            products: &self.products,
        })
        .render()
        {
            Ok(html) => surface.show_products(html),
            Err(e) => tracing::error!("Template render error: {e}"),
        }
    }
}
