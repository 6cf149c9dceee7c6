//! Business logic services.

pub mod checkout;

pub use checkout::{CheckoutError, CheckoutRequest, CheckoutService, build_order};
