//! Page surface the cart renders into.
//!
//! [`CartSurface`] is the whole contract between the cart and the page: the
//! cart never reads page state, it only writes fragments and counters and
//! asks for notices and navigation. [`HeadlessPage`] records those writes,
//! which is what a browser would display.

use url::Url;

/// Writable regions and actions of the shop page.
pub trait CartSurface {
    /// Replace the product grid markup.
    fn show_products(&mut self, html: String);

    /// Replace the cart line list markup.
    fn show_cart_lines(&mut self, html: String);

    /// Update the cart badge count.
    fn set_badge(&mut self, count: u64);

    /// Update the summary quantity.
    fn set_summary_quantity(&mut self, count: u64);

    /// Update the summary total text.
    fn set_summary_total(&mut self, total: &str);

    /// Show the cart panel if hidden, hide it if shown.
    fn toggle_cart_panel(&mut self);

    /// Hide the cart panel.
    fn hide_cart_panel(&mut self);

    /// Show a blocking notice to the shopper.
    fn notify(&mut self, message: &str);

    /// Leave the page for `url`.
    fn navigate(&mut self, url: &Url);
}

/// A page without a browser: every write lands in a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessPage {
    pub product_list: String,
    pub cart_list: String,
    pub badge: u64,
    pub summary_quantity: u64,
    pub summary_total: String,
    pub cart_open: bool,
    pub notices: Vec<String>,
    pub location: Option<Url>,
}

impl HeadlessPage {
    /// Create a blank page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent notice, if any.
    #[must_use]
    pub fn last_notice(&self) -> Option<&str> {
        self.notices.last().map(String::as_str)
    }
}

impl CartSurface for HeadlessPage {
    fn show_products(&mut self, html: String) {
        self.product_list = html;
    }

    fn show_cart_lines(&mut self, html: String) {
        self.cart_list = html;
    }

    fn set_badge(&mut self, count: u64) {
        self.badge = count;
    }

    fn set_summary_quantity(&mut self, count: u64) {
        self.summary_quantity = count;
    }

    fn set_summary_total(&mut self, total: &str) {
        total.clone_into(&mut self.summary_total);
    }

    fn toggle_cart_panel(&mut self) {
        self.cart_open = !self.cart_open;
    }

    fn hide_cart_panel(&mut self) {
        self.cart_open = false;
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn navigate(&mut self, url: &Url) {
        self.location = Some(url.clone());
    }
}
