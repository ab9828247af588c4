//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                  - Health check
//!
//! # Products
//! GET  /products/:handle                        - Product detail
//! GET  /products/:handle/gallery?image=i        - Gallery fragment (HTMX)
//! GET  /products/:handle/recommendations        - Deferred recommendations (HTMX)
//! GET  /:locale/products/:handle[/...]          - Same, in a locale (e.g. /en-ca)
//!
//! # Cart
//! POST /cart/add                                - Add to cart
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
///
/// Mounted both at `/products` and `/{locale}/products`.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{handle}", get(products::show))
        .route("/{handle}/gallery", get(products::gallery))
        .route("/{handle}/recommendations", get(products::recommendations))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new().route("/add", post(cart::add))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/", get(products::show_without_handle))
        .nest("/products", product_routes())
        .nest("/{locale}/products", product_routes())
        .nest("/cart", cart_routes())
}
