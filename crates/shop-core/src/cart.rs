//! # Cart Types
//!
//! Carts live on the platform. Locally we only hold the opaque cart id and a
//! badge count; everything else is re-read from the platform.

use crate::product::{Currency, Price, ShopLocale};
use serde::{Deserialize, Serialize};

/// Opaque cart identifier issued by the platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(String);

impl CartId {
    /// Wrap a platform cart id; empty strings are not ids
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line in a platform cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Line identifier used for updates
    pub item_id: String,

    /// Product the line refers to
    pub product_id: String,

    /// Product name (denormalized by the platform)
    pub name: String,

    /// Unit price
    pub unit_price: Price,

    /// Quantity
    pub quantity: u32,
}

impl CartLine {
    /// Calculate the total price for this line
    pub fn total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A cart as listed by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub lines: Vec<CartLine>,
    pub currency: Currency,
    /// The platform's own `cart_cnt`, when the listing carries one
    #[serde(default)]
    pub count: Option<u32>,
}

impl Cart {
    pub fn new(id: CartId, currency: Currency) -> Self {
        Self {
            id,
            lines: Vec::new(),
            currency,
            count: None,
        }
    }

    /// Check if cart is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Number shown on the cart badge.
    ///
    /// The platform's `cart_cnt` wins, as it does after an add; the sum of
    /// quantities stands in when the listing omits it.
    pub fn badge_count(&self) -> u32 {
        self.count.unwrap_or_else(|| self.item_count())
    }

    /// Calculate cart total in the cart currency, saturating on overflow
    pub fn total(&self) -> Price {
        let amount = self
            .lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.total().amount));
        Price::from_cents(amount, self.currency)
    }
}

/// Request to add a product to a cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCart {
    pub product_id: String,
    pub quantity: u32,
    /// Existing cart, if the session already has one
    pub cart_id: Option<CartId>,
    pub locale: ShopLocale,
}

/// What the platform reported after an add
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartAddOutcome {
    /// Cart id to keep in the session (new or unchanged)
    pub cart_id: CartId,
    /// Badge count, when the platform included one
    pub count: Option<u32>,
}

impl CartAddOutcome {
    /// Badge count to show after the add: the reported count, else the previous one
    pub fn next_count(&self, previous: u32) -> u32 {
        self.count.unwrap_or(previous)
    }
}

/// Result of clearing a cart line by line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Update calls issued
    pub attempted: usize,
    /// Update calls that failed
    pub failed: usize,
}

impl ClearOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(item: &str, cents: i64, qty: u32) -> CartLine {
        CartLine {
            item_id: item.into(),
            product_id: format!("p-{item}"),
            name: format!("Item {item}"),
            unit_price: Price::from_cents(cents, Currency::USD),
            quantity: qty,
        }
    }

    #[test]
    fn test_cart_id_rejects_blank() {
        assert!(CartId::new("").is_none());
        assert!(CartId::new("   ").is_none());
        assert_eq!(CartId::new(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_cart_totals() {
        let mut cart = Cart::new(CartId::new("c1").unwrap(), Currency::USD);
        cart.lines.push(line("1", 1000, 2));
        cart.lines.push(line("2", 250, 1));

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total().amount, 2250);
        assert_eq!(cart.lines[0].total().amount, 2000);
    }

    #[test]
    fn test_cart_total_saturates_on_huge_lines() {
        let mut cart = Cart::new(CartId::new("c1").unwrap(), Currency::USD);
        cart.lines.push(line("1", i64::MAX / 10, 99));
        cart.lines.push(line("2", i64::MAX, 1));
        cart.lines.push(line("3", 100, u32::MAX));
        cart.lines.push(line("4", 100, u32::MAX));

        assert_eq!(cart.total().amount, i64::MAX);
        assert_eq!(cart.item_count(), u32::MAX);
    }

    #[test]
    fn test_badge_count_prefers_platform_count() {
        let mut cart = Cart::new(CartId::new("c1").unwrap(), Currency::USD);
        cart.lines.push(line("1", 1000, 2));
        cart.lines.push(line("2", 250, 1));
        assert_eq!(cart.badge_count(), 3);

        cart.count = Some(2);
        assert_eq!(cart.badge_count(), 2);
    }

    #[test]
    fn test_next_count_keeps_previous_without_report() {
        let id = CartId::new("c1").unwrap();
        let reported = CartAddOutcome {
            cart_id: id.clone(),
            count: Some(4),
        };
        let silent = CartAddOutcome {
            cart_id: id,
            count: None,
        };
        assert_eq!(reported.next_count(1), 4);
        assert_eq!(silent.next_count(1), 1);
    }

    #[test]
    fn test_clear_outcome() {
        assert!(ClearOutcome { attempted: 3, failed: 0 }.is_complete());
        assert!(!ClearOutcome { attempted: 3, failed: 1 }.is_complete());
    }
}
