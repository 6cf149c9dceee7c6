//! Read-only catalog route handlers.
//!
//! The write side of the catalog (item/category CRUD, image upload) is owned
//! by a separate admin surface; this service only ever reads it.

use axum::{Json, extract::Path, extract::State};
use tracing::instrument;

use mesa_core::ItemId;

use crate::db::ItemRepository;
use crate::error::{AppError, Result};
use crate::models::{Category, Item};
use crate::state::AppState;

/// List every category.
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = ItemRepository::new(state.pool()).list_categories().await?;
    Ok(Json(categories))
}

/// List every menu item.
#[instrument(skip(state))]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>> {
    let items = ItemRepository::new(state.pool()).list().await?;
    Ok(Json(items))
}

/// Fetch one item.
#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<Item>> {
    let item = ItemRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

    Ok(Json(item))
}
