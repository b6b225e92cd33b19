//! Core types for Aroura.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{LineId, OrderId, ProductId};
pub use price::Price;
pub use status::{DeliveryOption, OrderStatus, PrintSize};
