//! Catalog repository for menu categories and items.
//!
//! Read-only from this service's perspective: the cart and order paths only
//! ever look items up, they never write the catalog.

use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use mesa_core::{CategoryId, ItemId};

use super::RepositoryError;
use crate::models::{Category, Item};

/// Repository for catalog lookups.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

fn item_from_row(row: &PgRow) -> Result<Item, RepositoryError> {
    Ok(Item {
        id: row.try_get::<ItemId, _>("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get::<Decimal, _>("price")?,
        category_id: row.try_get::<CategoryId, _>("category_id")?,
        image_url: row.try_get("image_url")?,
    })
}

impl<'a> ItemRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, price, category_id, image_url
            FROM items
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(item_from_row).transpose()
    }

    /// Get all items whose IDs appear in `ids`.
    ///
    /// Missing IDs are simply absent from the result; the caller decides
    /// whether that is an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let rows = sqlx::query(
            r"
            SELECT id, name, description, price, category_id, image_url
            FROM items
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(item_from_row).collect()
    }

    /// List every item, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, price, category_id, image_url
            FROM items
            ORDER BY name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(item_from_row).collect()
    }

    /// List every category, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, image_url
            FROM categories
            ORDER BY name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Category {
                    id: row.try_get::<CategoryId, _>("id")?,
                    name: row.try_get("name")?,
                    image_url: row.try_get("image_url")?,
                })
            })
            .collect()
    }
}
