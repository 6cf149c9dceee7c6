//! Checkout: cart snapshot -> immutable order.
//!
//! [`build_order`] is the pure half: it validates the request and the priced
//! cart lines and produces a [`NewOrder`] with an exact decimal total.
//! [`CheckoutService`] is the orchestration half: it loads the cart, resolves
//! item snapshots through the catalog, and commits the order insert together
//! with a version-checked cart clear in one transaction, so two concurrent
//! checkouts of the same cart can never both consume it.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use mesa_core::{ItemId, OrderStatus, OrderType, PaymentMethod, UserId};

use crate::db::{self, CartRepository, ItemRepository, RepositoryError};
use crate::models::{Cart, NewOrder, Order, OrderLine};

/// Errors from checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Order type is not one of `dine-in` / `takeaway`.
    #[error("invalid order type: {0:?}")]
    InvalidOrderType(String),

    /// Payment method is empty or unrecognized.
    #[error("invalid payment method: {0:?}")]
    InvalidPaymentMethod(String),

    /// Dine-in orders need a table number.
    #[error("table number is required for dine-in orders")]
    MissingTableNumber,

    /// Takeaway orders need a pickup time.
    #[error("pickup time is required for takeaway orders")]
    MissingPickupTime,

    /// The cart is missing or has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line references an item that no longer exists in the catalog.
    #[error("item {0} is no longer available")]
    ItemUnavailable(ItemId),

    /// The cart was modified between the checkout read and the cart clear.
    #[error("cart changed during checkout")]
    CartChanged,

    /// Persistence failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Checkout request body.
///
/// `order_type` and `payment_method` arrive as raw strings and are parsed
/// inside [`build_order`] so malformed values surface as `InvalidOrderType` /
/// `InvalidPaymentMethod` rather than a deserialization rejection.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CheckoutRequest {
    pub order_type: String,
    pub payment_method: String,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub pickup_time: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Build an order from priced cart lines.
///
/// Pure: the lines already carry their name/price snapshots, so the result is
/// immune to catalog edits made after resolution. Validation is fail-fast:
/// order type, then payment method, then the order-type-specific field, then
/// the empty-cart check. The total is the exact decimal sum of line subtotals,
/// computed once.
///
/// # Errors
///
/// Returns the first failing [`CheckoutError`] in the sequence above.
pub fn build_order(
    user_id: UserId,
    lines: Vec<OrderLine>,
    request: &CheckoutRequest,
) -> Result<NewOrder, CheckoutError> {
    let order_type: OrderType = request
        .order_type
        .parse()
        .map_err(|_| CheckoutError::InvalidOrderType(request.order_type.clone()))?;

    let payment_method: PaymentMethod = request
        .payment_method
        .parse()
        .map_err(|_| CheckoutError::InvalidPaymentMethod(request.payment_method.clone()))?;

    let table_number = non_blank(request.table_number.as_ref());
    let pickup_time = non_blank(request.pickup_time.as_ref());

    let (table_number, pickup_time) = match order_type {
        OrderType::DineIn => {
            let table = table_number.ok_or(CheckoutError::MissingTableNumber)?;
            (Some(table), None)
        }
        OrderType::Takeaway => {
            let pickup = pickup_time.ok_or(CheckoutError::MissingPickupTime)?;
            (None, Some(pickup))
        }
    };

    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let total_price: Decimal = lines.iter().map(OrderLine::subtotal).sum();

    Ok(NewOrder {
        user_id,
        lines,
        total_price,
        status: OrderStatus::Pending,
        payment_method,
        order_type,
        table_number,
        pickup_time,
    })
}

/// Reject a missing or empty cart up front; only a cart with lines may
/// proceed to request validation.
fn require_nonempty(cart: Option<Cart>) -> Result<Cart, CheckoutError> {
    cart.filter(|cart| !cart.is_empty())
        .ok_or(CheckoutError::EmptyCart)
}

/// Checkout orchestrator.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into a persisted order and clear the cart.
    ///
    /// The order insert and the cart clear share one transaction; the clear
    /// is guarded by the version the cart was loaded at, so of two concurrent
    /// checkouts at most one commits and the other sees `CartChanged`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] for validation failures, vanished items,
    /// concurrent cart modification, or persistence failures.
    pub async fn checkout(
        &self,
        user_id: UserId,
        request: &CheckoutRequest,
    ) -> Result<Order, CheckoutError> {
        let cart = CartRepository::new(self.pool).get_by_user(user_id).await?;
        // A missing or empty cart is rejected before any request validation.
        let cart = require_nonempty(cart)?;
        let lines = self.resolve_lines(&cart).await?;

        let new_order = build_order(user_id, lines, request)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let order = db::orders::insert_in_tx(&mut *tx, &new_order).await?;

        match db::carts::clear_lines_checked(&mut *tx, cart.id, cart.version).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                tx.rollback().await.map_err(RepositoryError::from)?;
                return Err(CheckoutError::CartChanged);
            }
            Err(e) => return Err(e.into()),
        }

        if let Err(e) = tx.commit().await {
            // Indeterminate outcome: the order may exist with the cart not
            // cleared. Surface loudly for reconciliation; never retry, a
            // blind retry could duplicate the order.
            tracing::error!(
                user_id = %user_id,
                cart_id = %cart.id,
                error = %e,
                "checkout commit failed; reconcile orders against cart contents"
            );
            return Err(RepositoryError::from(e).into());
        }

        tracing::info!(
            user_id = %user_id,
            order_id = %order.id,
            total = %order.total_price,
            order_type = %order.order_type,
            "order placed"
        );

        Ok(order)
    }

    /// Snapshot the cart's lines against the current catalog.
    async fn resolve_lines(&self, cart: &Cart) -> Result<Vec<OrderLine>, CheckoutError> {
        let ids: Vec<ItemId> = cart.lines.iter().map(|line| line.item_id).collect();
        let items = ItemRepository::new(self.pool).get_many(&ids).await?;

        cart.lines
            .iter()
            .map(|line| {
                let item = items
                    .iter()
                    .find(|item| item.id == line.item_id)
                    .ok_or(CheckoutError::ItemUnavailable(line.item_id))?;
                Ok(OrderLine {
                    item_id: item.id,
                    name: item.name.clone(),
                    price: item.price,
                    quantity: line.quantity,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(order_type: &str, payment: &str) -> CheckoutRequest {
        CheckoutRequest {
            order_type: order_type.to_owned(),
            payment_method: payment.to_owned(),
            table_number: None,
            pickup_time: None,
        }
    }

    fn line(id: i32, price: &str, quantity: i32) -> OrderLine {
        OrderLine {
            item_id: ItemId::new(id),
            name: format!("item-{id}"),
            price: price.parse().expect("valid decimal"),
            quantity,
        }
    }

    fn cart_with_lines(lines: Vec<crate::models::CartLine>) -> Cart {
        Cart {
            id: mesa_core::CartId::new(1),
            user_id: UserId::new(1),
            version: 0,
            lines,
        }
    }

    #[test]
    fn test_invalid_order_type_wins_over_everything() {
        // Cart is empty AND payment is bogus, but rule 1 fires first.
        let err = build_order(UserId::new(1), vec![], &request("delivery", "Bitcoin"))
            .expect_err("invalid order type");
        assert!(matches!(err, CheckoutError::InvalidOrderType(ref t) if t == "delivery"));
    }

    #[test]
    fn test_checkout_rejects_missing_cart_before_request_validation() {
        // At the orchestrator entry the cart gate runs first: a user with no
        // cart gets EmptyCart even though the request itself is also invalid.
        let err = require_nonempty(None).expect_err("no cart");
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_checkout_rejects_cart_with_no_lines() {
        let err = require_nonempty(Some(cart_with_lines(vec![]))).expect_err("empty cart");
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_checkout_passes_nonempty_cart_through() {
        let cart = cart_with_lines(vec![crate::models::CartLine {
            item_id: ItemId::new(1),
            quantity: 2,
        }]);
        let cart = require_nonempty(Some(cart)).expect("cart with lines");
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_invalid_payment_method_before_missing_fields() {
        let err = build_order(UserId::new(1), vec![], &request("dine-in", ""))
            .expect_err("empty payment method");
        assert!(matches!(err, CheckoutError::InvalidPaymentMethod(_)));
    }

    #[test]
    fn test_dine_in_requires_table_number() {
        let err = build_order(
            UserId::new(1),
            vec![line(1, "10.00", 2)],
            &request("dine-in", "Cash"),
        )
        .expect_err("no table number");
        assert!(matches!(err, CheckoutError::MissingTableNumber));
    }

    #[test]
    fn test_blank_table_number_counts_as_missing() {
        let mut req = request("dine-in", "Cash");
        req.table_number = Some("   ".to_owned());
        let err = build_order(UserId::new(1), vec![line(1, "10.00", 2)], &req)
            .expect_err("blank table number");
        assert!(matches!(err, CheckoutError::MissingTableNumber));
    }

    #[test]
    fn test_takeaway_requires_pickup_time() {
        let err = build_order(
            UserId::new(1),
            vec![line(1, "10.00", 2)],
            &request("takeaway", "UPI"),
        )
        .expect_err("no pickup time");
        assert!(matches!(err, CheckoutError::MissingPickupTime));
    }

    #[test]
    fn test_empty_cart_checked_last() {
        let mut req = request("dine-in", "Card");
        req.table_number = Some("T5".to_owned());
        let err = build_order(UserId::new(1), vec![], &req).expect_err("empty cart");
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_dine_in_order_built_with_exact_total() {
        let mut req = request("dine-in", "Card");
        req.table_number = Some("T5".to_owned());

        let order =
            build_order(UserId::new(9), vec![line(1, "10.00", 2)], &req).expect("valid order");

        assert_eq!(order.total_price, "20.00".parse::<Decimal>().expect("dec"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_type, OrderType::DineIn);
        assert_eq!(order.table_number.as_deref(), Some("T5"));
        assert_eq!(order.pickup_time, None);
    }

    #[test]
    fn test_decimal_total_has_no_float_drift() {
        // 0.1 + 0.2 style sums that break f64 arithmetic.
        let mut req = request("takeaway", "Online");
        req.pickup_time = Some("18:30".to_owned());

        let order = build_order(
            UserId::new(1),
            vec![line(1, "0.10", 1), line(2, "0.20", 1), line(3, "0.30", 3)],
            &req,
        )
        .expect("valid order");

        assert_eq!(order.total_price, "1.20".parse::<Decimal>().expect("dec"));
    }

    #[test]
    fn test_total_is_snapshot_sum_not_live_lookup() {
        // The builder only sees the lines it was handed; a later catalog
        // price change cannot alter the total.
        let mut req = request("takeaway", "Cash");
        req.pickup_time = Some("12:00".to_owned());

        let snapshot = vec![line(4, "3.50", 4)];
        let order = build_order(UserId::new(2), snapshot.clone(), &req).expect("valid order");

        assert_eq!(order.lines, snapshot);
        assert_eq!(order.total_price, "14.00".parse::<Decimal>().expect("dec"));
    }

    #[test]
    fn test_dine_in_discards_stray_pickup_time() {
        let mut req = request("dine-in", "Cash");
        req.table_number = Some("T1".to_owned());
        req.pickup_time = Some("19:00".to_owned());

        let order = build_order(UserId::new(1), vec![line(1, "5.00", 1)], &req).expect("valid");
        assert_eq!(order.pickup_time, None);
    }
}
