//! Status and option enums for orders and cart lines.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a persisted order.
///
/// `Pending` orders have a gateway order created but no verified payment.
/// Only `Completed` orders appear in a customer's order history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl OrderStatus {
    /// Database/string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse from the database/string representation.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// How a purchased artwork is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryOption {
    /// Download link only.
    #[default]
    Digital,
    /// Printed and shipped only.
    Physical,
    /// Download link plus a shipped print.
    Both,
}

/// Print sizes offered for digital artworks.
///
/// Only meaningful for the `digital` product category; other categories keep
/// the default and ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrintSize {
    #[default]
    A4,
    A3,
    A2,
    A1,
}

impl PrintSize {
    /// Display/string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::A2 => "A2",
            Self::A1 => "A1",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_round_trips_through_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Failed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str_opt(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_str_opt("shipped"), None);
    }

    #[test]
    fn delivery_option_uses_kebab_case() {
        let json = serde_json::to_string(&DeliveryOption::Both).expect("serialize");
        assert_eq!(json, "\"both\"");
    }
}
