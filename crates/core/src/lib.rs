//! Aroura Core - Shared domain types library.
//!
//! This crate provides the common types used across all Aroura components:
//! - `storefront` - Public-facing e-commerce JSON API
//! - `cli` - Command-line tools for migrations and catalog checks
//!
//! # Architecture
//!
//! The core crate contains only types and pure in-memory operations - no I/O,
//! no database access, no HTTP clients. This keeps it lightweight and allows
//! the cart/wishlist mutation logic to be tested without an async runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`commerce`] - Cart and wishlist collections and their mutation API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commerce;
pub mod types;

pub use commerce::*;
pub use types::*;
