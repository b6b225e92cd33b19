//! Domain models for the storefront.

pub mod order;
pub mod session;

pub use order::{NewOrder, Order, ShippingInfo};
pub use session::{CurrentUser, session_keys};
