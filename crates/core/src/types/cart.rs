//! Server-owned cart model.
//!
//! The cart lives on the store server; the client only ever holds the
//! server's last returned snapshot. Totals are never computed client-side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// A line in the cart: one product plus a positive quantity.
///
/// Invariant: at most one `CartItem` per product ID in a given cart, and
/// quantity is never zero (zero means removal, which the server expresses by
/// omitting the line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product, embedded as returned by the cart endpoints.
    pub product: Product,
    /// Units of the product in the cart (positive).
    pub quantity: u32,
}

/// The server's cart snapshot: ordered line items plus the server-computed
/// total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Line items in server order.
    pub items: Vec<CartItem>,
    /// Server-computed total.
    pub total: Decimal,
}

impl Cart {
    /// The degraded-mode fallback cart: no items, zero total.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    /// Quantity of the given product in the cart, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product.id == product_id)
            .map(|item| item.quantity)
    }

    /// Whether the cart holds a line for the given product.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.quantity_of(product_id).is_some()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty()
    }
}
