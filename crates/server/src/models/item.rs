//! Menu catalog domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use mesa_core::{CategoryId, ItemId};

/// A menu category (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Category image URL, if one was uploaded.
    pub image_url: Option<String>,
}

/// A menu item (domain type).
///
/// Orders capture a snapshot of `name` and `price` at checkout time, so later
/// edits to an item never affect existing orders.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    /// Unique item ID.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Menu description.
    pub description: String,
    /// Current price. Non-negative decimal.
    pub price: Decimal,
    /// Category this item belongs to.
    pub category_id: CategoryId,
    /// Item image URL, if one was uploaded.
    pub image_url: Option<String>,
}
