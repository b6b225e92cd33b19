//! The cart collection and its mutation API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commerce::{Collection, ProductSnapshot};
use crate::types::{DeliveryOption, LineId, Price, PrintSize, ProductId};

/// A single line in a cart.
///
/// At most one line exists per `(product_id, selected_size, delivery_option)`
/// triple; re-adding a matching product increments the quantity of the
/// existing line instead of creating a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Opaque line identifier, generated at insertion time.
    pub id: LineId,
    /// Catalog entry this line refers to.
    pub product_id: ProductId,
    /// Number of units, always >= 1.
    pub quantity: u32,
    /// Print size; only meaningful for the digital artwork category.
    pub selected_size: PrintSize,
    /// How the artwork is delivered.
    pub delivery_option: DeliveryOption,
    /// When the line was first added.
    pub added_at: DateTime<Utc>,
    /// Product data captured at add-time, never revalidated.
    pub product: ProductSnapshot,
}

impl CartLine {
    /// Price of the whole line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Options for [`Cart::add`].
#[derive(Debug, Clone, Copy)]
pub struct AddToCart {
    /// Units to add; zero is treated as one.
    pub quantity: u32,
    /// Requested print size.
    pub selected_size: PrintSize,
    /// Requested delivery option.
    pub delivery_option: DeliveryOption,
}

impl Default for AddToCart {
    fn default() -> Self {
        Self {
            quantity: 1,
            selected_size: PrintSize::default(),
            delivery_option: DeliveryOption::default(),
        }
    }
}

/// Aggregates over a cart, for badges and the checkout total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Sum of quantities across all lines.
    pub total_items: u32,
    /// Sum of line totals.
    pub total_price: Price,
    /// Number of distinct lines.
    pub line_count: usize,
}

/// A customer's cart.
///
/// Purely in-memory; mutations cannot fail. There is deliberately no upper
/// bound on quantities - quota enforcement is a non-goal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create a cart from existing lines (e.g. loaded from a store).
    #[must_use]
    pub const fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a product to the cart.
    ///
    /// If a line with the same `(product_id, selected_size, delivery_option)`
    /// already exists its quantity is incremented; otherwise a new line with
    /// a freshly generated [`LineId`] is appended. Returns the ID of the
    /// affected line.
    pub fn add(&mut self, product: ProductSnapshot, options: AddToCart) -> LineId {
        let quantity = options.quantity.max(1);

        if let Some(line) = self.lines.iter_mut().find(|line| {
            line.product_id == product.id
                && line.selected_size == options.selected_size
                && line.delivery_option == options.delivery_option
        }) {
            line.quantity = line.quantity.saturating_add(quantity);
            return line.id;
        }

        let line = CartLine {
            id: LineId::generate(),
            product_id: product.id,
            quantity,
            selected_size: options.selected_size,
            delivery_option: options.delivery_option,
            added_at: Utc::now(),
            product,
        };
        let id = line.id;
        self.lines.push(line);
        id
    }

    /// Remove the line with the given ID. A no-op if the ID is absent.
    pub fn remove(&mut self, line_id: LineId) {
        self.lines.retain(|line| line.id != line_id);
    }

    /// Replace the quantity of a line.
    ///
    /// A quantity of zero or less removes the line, matching the remove
    /// semantics of the storefront UI's stepper hitting zero. A no-op if the
    /// ID is absent.
    pub fn update_quantity(&mut self, line_id: LineId, quantity: i64) {
        if quantity <= 0 {
            self.remove(line_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == line_id) {
            line.quantity = quantity;
        }
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Compute totals over the current lines.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let total_items = self
            .lines
            .iter()
            .fold(0_u32, |sum, line| sum.saturating_add(line.quantity));
        let total_price = self
            .lines
            .iter()
            .fold(Price::ZERO, |sum, line| sum.plus(line.line_total()));

        CartSummary {
            total_items,
            total_price,
            line_count: self.lines.len(),
        }
    }
}

impl Collection for Cart {
    const KIND: &'static str = "cart";

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: i64, rupees: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: format!("Artwork {id}"),
            category: "digital".to_owned(),
            image: format!("/digi_art/digi_art{id}.webp"),
            price: Price::from_rupees(rupees),
        }
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let mut cart = Cart::default();
        let options = AddToCart {
            quantity: 2,
            ..AddToCart::default()
        };
        cart.add(snapshot(1, 2500), options);
        cart.add(snapshot(1, 2500), AddToCart::default());
        cart.add(snapshot(1, 2500), options);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn differing_options_create_separate_lines() {
        let mut cart = Cart::default();
        cart.add(snapshot(1, 2500), AddToCart::default());
        cart.add(
            snapshot(1, 2500),
            AddToCart {
                selected_size: PrintSize::A2,
                ..AddToCart::default()
            },
        );
        cart.add(
            snapshot(1, 2500),
            AddToCart {
                delivery_option: DeliveryOption::Both,
                ..AddToCart::default()
            },
        );

        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn zero_quantity_add_counts_as_one() {
        let mut cart = Cart::default();
        cart.add(
            snapshot(3, 3500),
            AddToCart {
                quantity: 0,
                ..AddToCart::default()
            },
        );
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn update_to_zero_or_negative_removes_the_line() {
        let mut cart = Cart::default();
        let id = cart.add(snapshot(1, 2500), AddToCart::default());
        cart.update_quantity(id, 0);
        assert!(cart.is_empty());

        let id = cart.add(snapshot(1, 2500), AddToCart::default());
        cart.update_quantity(id, -5);
        assert!(cart.is_empty());
    }

    #[test]
    fn update_replaces_quantity() {
        let mut cart = Cart::default();
        let id = cart.add(snapshot(1, 2500), AddToCart::default());
        cart.update_quantity(id, 7);
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn remove_of_unknown_line_is_a_noop() {
        let mut cart = Cart::default();
        cart.add(snapshot(1, 2500), AddToCart::default());
        let before = cart.clone();
        cart.remove(LineId::generate());
        assert_eq!(cart, before);
    }

    #[test]
    fn summary_totals_quantities_and_prices() {
        let mut cart = Cart::default();
        cart.add(
            snapshot(1, 2500),
            AddToCart {
                quantity: 2,
                ..AddToCart::default()
            },
        );
        cart.add(snapshot(2, 3000), AddToCart::default());

        let summary = cart.summary();
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.total_price, Price::from_rupees(8000));
    }

    #[test]
    fn serde_round_trip_preserves_lines_field_for_field() {
        let mut cart = Cart::default();
        cart.add(
            snapshot(7, 3800),
            AddToCart {
                quantity: 2,
                selected_size: PrintSize::A3,
                delivery_option: DeliveryOption::Both,
            },
        );

        let json = serde_json::to_string(&cart).expect("serialize");
        let restored: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, cart);
    }
}
