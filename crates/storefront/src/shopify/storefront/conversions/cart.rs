//! Cart type conversion functions.

use crate::shopify::ShopifyError;
use crate::shopify::types::Cart;

use super::super::queries::CartPayload;

/// Convert a cart mutation payload into a [`Cart`].
///
/// # Errors
///
/// Returns [`ShopifyError::UserError`] when the mutation reported user
/// errors, or [`ShopifyError::InvalidResponse`] when it returned no cart.
pub fn convert_cart_payload(
    payload: Option<CartPayload>,
    operation: &str,
) -> Result<Cart, ShopifyError> {
    let payload = payload
        .ok_or_else(|| ShopifyError::InvalidResponse(format!("{operation} returned no payload")))?;

    if !payload.user_errors.is_empty() {
        return Err(ShopifyError::UserError(
            payload
                .user_errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
        ));
    }

    payload
        .cart
        .map(|cart| Cart {
            id: cart.id,
            checkout_url: cart.checkout_url,
            total_quantity: cart.total_quantity,
        })
        .ok_or_else(|| ShopifyError::InvalidResponse(format!("{operation} returned no cart")))
}
