//! Order domain types.
//!
//! An order is an immutable snapshot of a cart at checkout time. Everything
//! except `status` is append-only: line names and prices are copied from the
//! catalog when the order is built and never read from it again.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use mesa_core::{ItemId, OrderId, OrderStatus, OrderType, PaymentMethod, UserId};

/// One line of an order, with name and price snapshotted at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// The catalog item this line was created from.
    pub item_id: ItemId,
    /// Item name at order time.
    pub name: String,
    /// Unit price at order time.
    pub price: Decimal,
    /// Quantity ordered. Always >= 1.
    pub quantity: i32,
}

impl OrderLine {
    /// Line subtotal (`price * quantity`), in exact decimal arithmetic.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A persisted order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// The user who placed the order.
    pub user_id: UserId,
    /// Snapshotted lines, in cart order.
    pub lines: Vec<OrderLine>,
    /// Sum of line subtotals, computed once at build time.
    pub total_price: Decimal,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// How the order is paid.
    pub payment_method: PaymentMethod,
    /// Dine-in or takeaway.
    pub order_type: OrderType,
    /// Present iff `order_type` is dine-in.
    pub table_number: Option<String>,
    /// Present iff `order_type` is takeaway.
    pub pickup_time: Option<String>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated (status changes only).
    pub updated_at: DateTime<Utc>,
}

/// An order built from a cart but not yet persisted.
///
/// Produced by `services::checkout::build_order`; the orders repository
/// assigns the ID and timestamps on insert.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub pickup_time: Option<String>,
}
