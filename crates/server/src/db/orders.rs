//! Order repository.
//!
//! Orders are inserted once with their lines and never rewritten; the only
//! mutable column is `status`, updated conditionally so concurrent admin edits
//! cannot silently overwrite each other.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use mesa_core::{ItemId, OrderId, OrderStatus, OrderType, PaymentMethod, UserId};

use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderLine};

/// Repository for order persistence.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

/// Parse a stored enum column through its `FromStr` impl.
fn parse_stored<T: FromStr<Err = String>>(value: &str) -> Result<T, RepositoryError> {
    T::from_str(value).map_err(RepositoryError::DataCorruption)
}

fn order_from_row(row: &PgRow, lines: Vec<OrderLine>) -> Result<Order, RepositoryError> {
    Ok(Order {
        id: row.try_get::<OrderId, _>("id")?,
        user_id: row.try_get::<UserId, _>("user_id")?,
        lines,
        total_price: row.try_get::<Decimal, _>("total_price")?,
        status: parse_stored::<OrderStatus>(&row.try_get::<String, _>("status")?)?,
        payment_method: parse_stored::<PaymentMethod>(&row.try_get::<String, _>("payment_method")?)?,
        order_type: parse_stored::<OrderType>(&row.try_get::<String, _>("order_type")?)?,
        table_number: row.try_get("table_number")?,
        pickup_time: row.try_get("pickup_time")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn line_from_row(row: &PgRow) -> Result<OrderLine, RepositoryError> {
    Ok(OrderLine {
        item_id: row.try_get::<ItemId, _>("item_id")?,
        name: row.try_get("name")?,
        price: row.try_get::<Decimal, _>("price")?,
        quantity: row.try_get::<i32, _>("quantity")?,
    })
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails,
    /// `RepositoryError::DataCorruption` if a stored enum value is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, total_price, status, payment_method, order_type,
                   table_number, pickup_time, created_at, updated_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines = sqlx::query(
            r"
            SELECT item_id, name, price, quantity
            FROM order_lines
            WHERE order_id = $1
            ORDER BY position ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?
        .iter()
        .map(line_from_row)
        .collect::<Result<Vec<_>, _>>()?;

        order_from_row(&row, lines).map(Some)
    }

    /// List a user's orders, newest first, with their lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails,
    /// `RepositoryError::DataCorruption` if a stored enum value is invalid.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let order_rows = sqlx::query(
            r"
            SELECT id, user_id, total_price, status, payment_method, order_type,
                   table_number, pickup_time, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<i32> = order_rows
            .iter()
            .map(|row| row.try_get::<i32, _>("id"))
            .collect::<Result<_, _>>()?;

        let line_rows = sqlx::query(
            r"
            SELECT order_id, item_id, name, price, quantity
            FROM order_lines
            WHERE order_id = ANY($1)
            ORDER BY order_id ASC, position ASC
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(order_rows.len());
        for row in &order_rows {
            let order_id = row.try_get::<OrderId, _>("id")?;
            let lines = line_rows
                .iter()
                .filter(|line| {
                    line.try_get::<OrderId, _>("order_id")
                        .is_ok_and(|id| id == order_id)
                })
                .map(line_from_row)
                .collect::<Result<Vec<_>, _>>()?;
            orders.push(order_from_row(row, lines)?);
        }

        Ok(orders)
    }

    /// Apply a status transition conditionally, returning the new
    /// `updated_at`.
    ///
    /// The `WHERE status = current` guard means a concurrent admin edit makes
    /// this a no-op instead of a lost update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order was not in `current`
    /// anymore, `RepositoryError::Database` for other failures.
    pub async fn update_status(
        &self,
        id: OrderId,
        current: OrderStatus,
        target: OrderStatus,
    ) -> Result<DateTime<Utc>, RepositoryError> {
        let row = sqlx::query(
            r"
            UPDATE orders
            SET status = $1, updated_at = now()
            WHERE id = $2 AND status = $3
            RETURNING updated_at
            ",
        )
        .bind(target.to_string())
        .bind(id)
        .bind(current.to_string())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Err(RepositoryError::Conflict(
                "order status changed concurrently".to_owned(),
            ));
        };

        Ok(row.try_get::<DateTime<Utc>, _>("updated_at")?)
    }
}

/// Insert an order and its lines inside an existing transaction.
///
/// Checkout shares this transaction with the cart clear so either both commit
/// or neither does; a partial order (header without lines) can never persist.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if an insert fails.
pub async fn insert_in_tx(
    conn: &mut PgConnection,
    new_order: &NewOrder,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query(
        r"
        INSERT INTO orders (user_id, total_price, status, payment_method,
                            order_type, table_number, pickup_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, created_at, updated_at
        ",
    )
    .bind(new_order.user_id)
    .bind(new_order.total_price)
    .bind(new_order.status.to_string())
    .bind(new_order.payment_method.to_string())
    .bind(new_order.order_type.to_string())
    .bind(new_order.table_number.as_deref())
    .bind(new_order.pickup_time.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    let id = row.try_get::<OrderId, _>("id")?;
    let created_at = row.try_get::<DateTime<Utc>, _>("created_at")?;
    let updated_at = row.try_get::<DateTime<Utc>, _>("updated_at")?;

    for (position, line) in new_order.lines.iter().enumerate() {
        sqlx::query(
            r"
            INSERT INTO order_lines (order_id, item_id, name, price, quantity, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(id)
        .bind(line.item_id)
        .bind(&line.name)
        .bind(line.price)
        .bind(line.quantity)
        .bind(i32::try_from(position).map_err(|_| {
            RepositoryError::DataCorruption("order line position overflow".to_owned())
        })?)
        .execute(&mut *conn)
        .await?;
    }

    Ok(Order {
        id,
        user_id: new_order.user_id,
        lines: new_order.lines.clone(),
        total_price: new_order.total_price,
        status: new_order.status,
        payment_method: new_order.payment_method,
        order_type: new_order.order_type,
        table_number: new_order.table_number.clone(),
        pickup_time: new_order.pickup_time.clone(),
        created_at,
        updated_at,
    })
}
