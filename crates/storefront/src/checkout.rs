//! Checkout handoff to the remote payment session.

use cartwheel_core::CartLine;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::shop::{CheckoutSessionRequest, ShopClient, ShopError};

/// Maximum order note length, in UTF-16 code units (the length a browser
/// reports for the text).
pub const MAX_NOTES_UTF16_UNITS: usize = 500;

/// Notice shown when checkout is attempted with nothing in the cart.
pub const EMPTY_CART_NOTICE: &str = "Your cart is empty.";

/// Notice shown when the checkout session could not be started.
pub const CHECKOUT_FAILED_NOTICE: &str = "Could not start checkout. Please try again.";

/// Reasons a checkout did not produce a session URL.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to check out; no request was sent.
    #[error("cart is empty")]
    EmptyCart,

    /// The request could not be completed.
    #[error("checkout request failed: {0}")]
    Transport(#[from] ShopError),

    /// The endpoint answered but did not hand back a usable session URL.
    #[error("checkout rejected (HTTP {status}): {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The returned session URL could not be parsed.
    #[error("invalid checkout URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl CheckoutError {
    /// Message to show the shopper.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyCart => EMPTY_CART_NOTICE,
            Self::Transport(_) | Self::Rejected { .. } | Self::InvalidUrl { .. } => {
                CHECKOUT_FAILED_NOTICE
            }
        }
    }
}

/// Cut `notes` to at most [`MAX_NOTES_UTF16_UNITS`] UTF-16 code units.
///
/// The cut never splits a character, so a surrogate pair straddling the
/// limit is dropped whole.
#[must_use]
pub fn truncate_notes(notes: &str) -> &str {
    let mut units = 0;
    for (end, ch) in notes.char_indices() {
        units += ch.len_utf16();
        if units > MAX_NOTES_UTF16_UNITS {
            return notes.get(..end).unwrap_or(notes);
        }
    }
    notes
}

/// Request a checkout session for `lines` and return the URL to navigate to.
///
/// The cart itself is never modified, so a failed attempt can simply be
/// retried.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` without any network call when `lines`
/// is empty, and another variant when the session could not be created.
#[instrument(skip(client, lines, notes), fields(lines = lines.len()))]
pub async fn checkout(
    client: &ShopClient,
    lines: &[CartLine],
    notes: &str,
) -> Result<Url, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let request = CheckoutSessionRequest {
        items: lines,
        notes: truncate_notes(notes),
    };
    let reply = client.create_checkout_session(&request).await?;

    let (url, error) = match reply.body {
        Ok(body) => (body.url.filter(|url| !url.trim().is_empty()), body.error),
        Err(parse_error) => (None, Some(parse_error)),
    };

    let url = match url {
        Some(url) if reply.status.is_success() => url,
        _ => {
            return Err(CheckoutError::Rejected {
                status: reply.status,
                message: error.unwrap_or_else(|| "Checkout init failed".to_string()),
            });
        }
    };

    let target = client
        .base_url()
        .join(url.trim())
        .map_err(|source| CheckoutError::InvalidUrl { url, source })?;

    tracing::info!(url = %target, "Checkout session created");
    Ok(target)
}
