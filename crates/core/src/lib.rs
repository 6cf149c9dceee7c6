//! Mesa Core - Shared types library.
//!
//! This crate provides common types used across all Mesa components:
//! - `server` - REST API for cart, checkout, and order management
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the order status/payment/order-type enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
