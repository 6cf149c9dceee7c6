//! Cart domain type and its mutation rules.
//!
//! A cart is loaded, mutated in memory, and saved back under an optimistic
//! version check (see `db::carts`). Keeping the rules here means the merge and
//! validation behavior is plain code, independent of SQL.

use thiserror::Error;

use mesa_core::{CartId, ItemId, UserId};

/// Errors from cart mutation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity must be a positive integer.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(i32),

    /// The referenced item has no line in this cart.
    #[error("item {0} is not in the cart")]
    LineNotFound(ItemId),

    /// Merging would push a line's quantity past the representable maximum.
    #[error("quantity for item {0} is too large")]
    QuantityTooLarge(ItemId),
}

/// One (item, quantity) pairing within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    /// The menu item this line refers to.
    pub item_id: ItemId,
    /// Always >= 1; a line at zero is removed instead.
    pub quantity: i32,
}

/// A user's open cart.
///
/// Invariant: at most one line per distinct item; duplicate adds merge their
/// quantities. `version` increments on every persisted mutation and backs the
/// optimistic concurrency check at checkout.
#[derive(Debug, Clone)]
pub struct Cart {
    /// Database ID of this cart.
    pub id: CartId,
    /// The owning user. Exactly one open cart per user.
    pub user_id: UserId,
    /// Optimistic concurrency token.
    pub version: i32,
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` of an item, merging into an existing line if present.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 1`, or
    /// `CartError::QuantityTooLarge` if merging would overflow; either way
    /// the cart is left unchanged.
    pub fn add_line(&mut self, item_id: ItemId, quantity: i32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        match self.lines.iter_mut().find(|line| line.item_id == item_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityTooLarge(item_id))?;
            }
            None => self.lines.push(CartLine { item_id, quantity }),
        }
        Ok(())
    }

    /// Replace the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 1` or
    /// `CartError::LineNotFound` if the item has no line; either way the cart
    /// is left unchanged.
    pub fn set_quantity(&mut self, item_id: ItemId, quantity: i32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.item_id == item_id)
            .ok_or(CartError::LineNotFound(item_id))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove an item's line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the item has no line.
    pub fn remove_line(&mut self, item_id: ItemId) -> Result<(), CartError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.item_id == item_id)
            .ok_or(CartError::LineNotFound(item_id))?;
        self.lines.remove(index);
        Ok(())
    }

    /// Empty the cart. The cart record itself survives; only checkout calls
    /// this.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        Cart {
            id: CartId::new(1),
            user_id: UserId::new(1),
            version: 0,
            lines: Vec::new(),
        }
    }

    #[test]
    fn test_duplicate_add_merges_quantities() {
        let mut cart = cart();
        cart.add_line(ItemId::new(7), 2).expect("first add");
        cart.add_line(ItemId::new(7), 3).expect("second add");

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 5);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = cart();
        cart.add_line(ItemId::new(2), 1).expect("add");
        cart.add_line(ItemId::new(9), 1).expect("add");
        cart.add_line(ItemId::new(2), 1).expect("merge");

        let ids: Vec<_> = cart.lines.iter().map(|l| l.item_id).collect();
        assert_eq!(ids, vec![ItemId::new(2), ItemId::new(9)]);
    }

    #[test]
    fn test_add_rejects_overflowing_merge() {
        let mut cart = cart();
        cart.add_line(ItemId::new(7), i32::MAX).expect("first add");

        assert_eq!(
            cart.add_line(ItemId::new(7), 2),
            Err(CartError::QuantityTooLarge(ItemId::new(7)))
        );
        // The failed merge must not corrupt the existing line.
        assert_eq!(cart.lines[0].quantity, i32::MAX);
    }

    #[test]
    fn test_add_rejects_nonpositive_quantity() {
        let mut cart = cart();
        assert_eq!(
            cart.add_line(ItemId::new(1), 0),
            Err(CartError::InvalidQuantity(0))
        );
        assert_eq!(
            cart.add_line(ItemId::new(1), -4),
            Err(CartError::InvalidQuantity(-4))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_rejects_nonpositive_and_leaves_cart_unchanged() {
        let mut cart = cart();
        cart.add_line(ItemId::new(3), 2).expect("add");

        assert_eq!(
            cart.set_quantity(ItemId::new(3), 0),
            Err(CartError::InvalidQuantity(0))
        );
        assert_eq!(
            cart.set_quantity(ItemId::new(3), -1),
            Err(CartError::InvalidQuantity(-1))
        );
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = cart();
        assert_eq!(
            cart.set_quantity(ItemId::new(3), 1),
            Err(CartError::LineNotFound(ItemId::new(3)))
        );
    }

    #[test]
    fn test_set_quantity_replaces() {
        let mut cart = cart();
        cart.add_line(ItemId::new(3), 2).expect("add");
        cart.set_quantity(ItemId::new(3), 7).expect("set");
        assert_eq!(cart.lines[0].quantity, 7);
    }

    #[test]
    fn test_remove_line() {
        let mut cart = cart();
        cart.add_line(ItemId::new(3), 2).expect("add");
        cart.remove_line(ItemId::new(3)).expect("remove");
        assert!(cart.is_empty());

        assert_eq!(
            cart.remove_line(ItemId::new(3)),
            Err(CartError::LineNotFound(ItemId::new(3)))
        );
    }

    #[test]
    fn test_clear() {
        let mut cart = cart();
        cart.add_line(ItemId::new(1), 1).expect("add");
        cart.add_line(ItemId::new(2), 2).expect("add");
        cart.clear();
        assert!(cart.is_empty());
    }
}
