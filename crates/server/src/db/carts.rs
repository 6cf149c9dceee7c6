//! Cart repository.
//!
//! Carts are saved whole: every mutation rewrites the line set inside a
//! transaction that also bumps `carts.version`, conditional on the version the
//! cart was loaded at. A concurrent writer therefore surfaces as
//! [`RepositoryError::Conflict`] instead of a lost update.

use sqlx::{PgConnection, PgPool, Row};

use mesa_core::{CartId, ItemId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartLine};

/// Repository for cart persistence.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's cart with its lines, or `None` if the user has never
    /// added anything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, version
            FROM carts
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id = row.try_get::<CartId, _>("id")?;
        let version = row.try_get::<i32, _>("version")?;
        let lines = self.load_lines(id).await?;

        Ok(Some(Cart {
            id,
            user_id,
            version,
            lines,
        }))
    }

    /// Get a user's cart, creating an empty one if none exists yet.
    ///
    /// Carts are created lazily on first add, so this is only called from the
    /// add path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        // DO UPDATE instead of DO NOTHING so RETURNING yields a row in the
        // already-exists case too.
        let row = sqlx::query(
            r"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, version
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        let id = row.try_get::<CartId, _>("id")?;
        let version = row.try_get::<i32, _>("version")?;
        let lines = self.load_lines(id).await?;

        Ok(Cart {
            id,
            user_id,
            version,
            lines,
        })
    }

    /// Persist a mutated cart under its optimistic version check.
    ///
    /// Rewrites the full line set and bumps `version`; on success the cart's
    /// in-memory version is advanced to match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the cart changed since it was
    /// loaded, `RepositoryError::Database` for other failures.
    pub async fn save(&self, cart: &mut Cart) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        bump_version_checked(&mut *tx, cart.id, cart.version).await?;

        sqlx::query("DELETE FROM cart_lines WHERE cart_id = $1")
            .bind(cart.id)
            .execute(&mut *tx)
            .await?;

        for (position, line) in cart.lines.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO cart_lines (cart_id, item_id, quantity, position)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(cart.id)
            .bind(line.item_id)
            .bind(line.quantity)
            .bind(i32::try_from(position).map_err(|_| {
                RepositoryError::DataCorruption("cart line position overflow".to_owned())
            })?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        cart.version += 1;
        Ok(())
    }

    async fn load_lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT item_id, quantity
            FROM cart_lines
            WHERE cart_id = $1
            ORDER BY position ASC
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(CartLine {
                    item_id: row.try_get::<ItemId, _>("item_id")?,
                    quantity: row.try_get::<i32, _>("quantity")?,
                })
            })
            .collect()
    }
}

/// Clear a cart's lines inside an existing transaction, conditional on the
/// version the checkout read the cart at.
///
/// Used by checkout so the order insert and the cart clear commit or roll back
/// together.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the cart changed since it was
/// loaded, `RepositoryError::Database` for other failures.
pub async fn clear_lines_checked(
    conn: &mut PgConnection,
    cart_id: CartId,
    expected_version: i32,
) -> Result<(), RepositoryError> {
    bump_version_checked(&mut *conn, cart_id, expected_version).await?;

    sqlx::query("DELETE FROM cart_lines WHERE cart_id = $1")
        .bind(cart_id)
        .execute(conn)
        .await?;

    Ok(())
}

async fn bump_version_checked(
    conn: &mut PgConnection,
    cart_id: CartId,
    expected_version: i32,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE carts
        SET version = version + 1, updated_at = now()
        WHERE id = $1 AND version = $2
        ",
    )
    .bind(cart_id)
    .bind(expected_version)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::Conflict(
            "cart was modified concurrently".to_owned(),
        ));
    }

    Ok(())
}
