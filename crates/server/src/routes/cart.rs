//! Cart route handlers.
//!
//! The read path performs the item join explicitly through the catalog
//! repository; nothing here mutates the catalog. Mutations load the cart,
//! apply the domain operation in memory, and save under the optimistic
//! version check.

use axum::{Json, extract::Path, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mesa_core::ItemId;

use crate::db::{CartRepository, ItemRepository};
use crate::error::{AppError, Result};
use crate::middleware::Identity;
use crate::models::Cart;
use crate::state::AppState;

/// One cart line with its item details resolved for display.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub item_id: ItemId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: Decimal,
}

impl CartView {
    /// An empty cart (the user has not added anything yet).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total: Decimal::ZERO,
        }
    }
}

/// Resolve a cart's lines against the catalog for display.
async fn resolve_view(state: &AppState, cart: &Cart) -> Result<CartView> {
    let ids: Vec<ItemId> = cart.lines.iter().map(|line| line.item_id).collect();
    let items = ItemRepository::new(state.pool()).get_many(&ids).await?;

    let mut lines = Vec::with_capacity(cart.lines.len());
    for line in &cart.lines {
        let Some(item) = items.iter().find(|item| item.id == line.item_id) else {
            // Item deleted from the catalog since it was added; hide the
            // line rather than failing the whole cart read.
            tracing::warn!(item_id = %line.item_id, cart_id = %cart.id, "cart line references missing item");
            continue;
        };
        let quantity = line.quantity;
        lines.push(CartLineView {
            item_id: item.id,
            name: item.name.clone(),
            price: item.price,
            quantity,
            subtotal: item.price * Decimal::from(quantity),
        });
    }

    let total = lines.iter().map(|line| line.subtotal).sum();
    Ok(CartView { lines, total })
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartBody {
    pub item_id: ItemId,
    pub quantity: Option<i32>,
}

/// Set quantity request body.
#[derive(Debug, Deserialize)]
pub struct SetQuantityBody {
    pub quantity: i32,
}

/// Display the caller's cart with resolved item details.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, identity: Identity) -> Result<Json<CartView>> {
    let cart = CartRepository::new(state.pool())
        .get_by_user(identity.user_id)
        .await?;

    match cart {
        Some(cart) => Ok(Json(resolve_view(&state, &cart).await?)),
        None => Ok(Json(CartView::empty())),
    }
}

/// Add an item to the cart, merging quantities on duplicate adds.
///
/// Creates the cart lazily on first add. The item must exist in the catalog.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<AddToCartBody>,
) -> Result<(StatusCode, Json<CartView>)> {
    let quantity = body.quantity.unwrap_or(1);

    ItemRepository::new(state.pool())
        .get(body.item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

    let repo = CartRepository::new(state.pool());
    let mut cart = repo.get_or_create(identity.user_id).await?;
    cart.add_line(body.item_id, quantity)?;
    repo.save(&mut cart).await?;

    Ok((StatusCode::OK, Json(resolve_view(&state, &cart).await?)))
}

/// Set the quantity of an existing cart line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    identity: Identity,
    Path(item_id): Path<ItemId>,
    Json(body): Json<SetQuantityBody>,
) -> Result<Json<CartView>> {
    let repo = CartRepository::new(state.pool());
    let mut cart = repo
        .get_by_user(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

    cart.set_quantity(item_id, body.quantity)?;
    repo.save(&mut cart).await?;

    Ok(Json(resolve_view(&state, &cart).await?))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    identity: Identity,
    Path(item_id): Path<ItemId>,
) -> Result<Json<CartView>> {
    let repo = CartRepository::new(state.pool());
    let mut cart = repo
        .get_by_user(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

    cart.remove_line(item_id)?;
    repo.save(&mut cart).await?;

    Ok(Json(resolve_view(&state, &cart).await?))
}
