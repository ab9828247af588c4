//! Cart route handlers.
//!
//! The product page posts its add-to-cart form here. The Shopify cart id is
//! kept in the session; the first add creates the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::middleware::CART_ID_KEY;
use crate::routes::products::is_htmx;
use crate::shopify::{Cart, CartLineInput, ShopifyError};
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub merchandise_id: String,
    pub quantity: Option<u32>,
}

/// Confirmation fragment returned to HTMX after an add.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_added.html")]
pub struct CartAddedTemplate {
    pub count: i64,
    pub checkout_url: String,
}

/// Get the cart ID from the session.
async fn get_cart_id(session: &Session) -> Option<String> {
    session.get::<String>(CART_ID_KEY).await.ok().flatten()
}

/// Set the cart ID in the session.
async fn set_cart_id(
    session: &Session,
    cart_id: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(CART_ID_KEY, cart_id).await
}

/// Add a variant to the shopper's cart.
///
/// HTMX requests get a confirmation fragment and an `HX-Trigger:
/// cart-updated` header; plain form posts are redirected to checkout.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Response {
    if form.merchandise_id.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing variant").into_response();
    }

    let line = CartLineInput {
        merchandise_id: form.merchandise_id,
        quantity: i64::from(form.quantity.unwrap_or(1).max(1)),
    };

    match add_line(&state, &session, line).await {
        Ok(cart) => {
            add_breadcrumb(
                "cart",
                "Added to cart",
                Some(&[("cart_id", cart.id.as_str())]),
            );

            if is_htmx(&headers) {
                (
                    AppendHeaders([("HX-Trigger", "cart-updated")]),
                    CartAddedTemplate {
                        count: cart.total_quantity,
                        checkout_url: cart.checkout_url,
                    },
                )
                    .into_response()
            } else {
                Redirect::to(&cart.checkout_url).into_response()
            }
        }
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Html("<span class=\"cart-error\">Error adding to cart</span>"),
            )
                .into_response()
        }
    }
}

/// Add `line` to the session's cart, creating the cart on first use.
///
/// A stored cart Shopify rejects (expired or already checked out) is
/// dropped from the session and replaced by a new cart.
async fn add_line(
    state: &AppState,
    session: &Session,
    line: CartLineInput,
) -> Result<Cart, ShopifyError> {
    let cart = match get_cart_id(session).await {
        Some(cart_id) => match state
            .storefront()
            .add_to_cart(&cart_id, vec![line.clone()])
            .await
        {
            Ok(cart) => cart,
            Err(e @ (ShopifyError::UserError(_) | ShopifyError::InvalidResponse(_))) => {
                tracing::warn!(cart_id = %cart_id, "Stored cart rejected, starting a new one: {e}");
                if let Err(e) = session.remove::<String>(CART_ID_KEY).await {
                    tracing::error!("Failed to clear cart ID from session: {e}");
                }
                state.storefront().create_cart(vec![line]).await?
            }
            Err(e) => return Err(e),
        },
        None => state.storefront().create_cart(vec![line]).await?,
    };

    if let Err(e) = set_cart_id(session, &cart.id).await {
        tracing::error!("Failed to save cart ID to session: {e}");
    }

    Ok(cart)
}
