//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (database ping)
//!
//! # Catalog (public)
//! GET    /products                  - List products (?category=, ?search=)
//! GET    /products/{id}             - Product detail
//!
//! # Ratings (requires auth)
//! POST   /products/{id}/ratings     - Rate a delivered product
//!
//! # Cart (requires auth)
//! GET    /cart                      - Current cart with totals
//! DELETE /cart                      - Empty the cart
//! POST   /cart/items                - Add a product
//! PUT    /cart/items/{productId}    - Set a line's quantity
//! DELETE /cart/items/{productId}    - Remove a line
//!
//! # Wishlist (requires auth)
//! GET    /wishlist                  - List wished products
//! POST   /wishlist                  - Wish a product
//! DELETE /wishlist/{productId}      - Unwish a product
//!
//! # Addresses (requires auth)
//! GET    /addresses                 - List saved addresses
//! POST   /addresses                 - Save an address
//! PUT    /addresses/{id}            - Replace an address
//! DELETE /addresses/{id}            - Delete an address
//!
//! # Orders (requires auth)
//! GET    /orders                    - Order history, newest first
//! POST   /orders                    - Place an order (clears the cart)
//! ```
//!
//! Auth is enforced per-handler via the [`crate::middleware::CurrentUser`]
//! extractor rather than a router layer, so public and protected routes can
//! share the same tree.

pub mod addresses;
pub mod cart;
pub mod orders;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/ratings", post(products::rate))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{product_id}",
            axum::routing::put(cart::set_quantity).delete(cart::remove_item),
        )
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::index).post(wishlist::add))
        .route("/{product_id}", delete(wishlist::remove))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::index).post(addresses::create))
        .route(
            "/{id}",
            axum::routing::put(addresses::update).delete(addresses::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(orders::index).post(orders::create))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/addresses", address_routes())
        .nest("/orders", order_routes())
}
