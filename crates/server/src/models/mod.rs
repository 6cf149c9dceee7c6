//! Domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. Cart mutation rules live on [`cart::Cart`] so they can be exercised
//! without a database.

pub mod cart;
pub mod item;
pub mod order;

pub use cart::{Cart, CartError, CartLine};
pub use item::{Category, Item};
pub use order::{NewOrder, Order, OrderLine};
