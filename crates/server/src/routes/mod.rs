//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//! GET    /health/ready            - Readiness check (verifies database)
//!
//! # Catalog (public, read-only)
//! GET    /api/catalog/categories  - List categories
//! GET    /api/catalog/items       - List items
//! GET    /api/catalog/items/{id}  - Item detail
//!
//! # Cart (requires identity)
//! GET    /api/cart                - Cart with resolved item details
//! POST   /api/cart                - Add an item ({ item_id, quantity? })
//! PUT    /api/cart/{item_id}      - Set a line's quantity
//! DELETE /api/cart/{item_id}      - Remove a line
//!
//! # Orders (requires identity)
//! POST   /api/orders/checkout     - Convert the cart into an order
//! GET    /api/orders              - The caller's orders, newest first
//! GET    /api/orders/{id}         - One order (owner only, or admin)
//! PUT    /api/orders/{id}/status  - Admin: apply a status transition
//! ```

pub mod cart;
pub mod catalog;
pub mod orders;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the API router.
pub fn routes() -> Router<AppState> {
    let catalog = Router::new()
        .route("/categories", get(catalog::list_categories))
        .route("/items", get(catalog::list_items))
        .route("/items/{id}", get(catalog::get_item));

    let cart = Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/{item_id}", put(cart::update).delete(cart::remove));

    let orders = Router::new()
        .route("/checkout", post(orders::checkout))
        .route("/", get(orders::list))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/status", put(orders::update_status));

    Router::new()
        .nest("/api/catalog", catalog)
        .nest("/api/cart", cart)
        .nest("/api/orders", orders)
}
