//! Product catalog model.
//!
//! Products are created and mutated only by the remote catalog service; the
//! client holds a read-only cached copy for the lifetime of the session and
//! never persists it (wishlist snapshots aside).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product in the store catalog.
///
/// Mirrors the wire shape returned by `GET /api/products/`. Prices are
/// decimal strings on the wire (`rust_decimal` with `serde-with-str`), which
/// preserves precision across the JSON boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Plain text description.
    pub description: String,
    /// Current price (non-negative).
    pub price: Decimal,
    /// Original price before discount, if the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    /// Category name (enum-like string, server-defined vocabulary).
    pub category: String,
    /// Average review rating, 0.0 to 5.0.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews behind the rating.
    #[serde(default)]
    pub review_count: u32,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
    /// Ordered size variants, if the product has them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
}

impl Product {
    /// Whether the product is discounted (has an original price above the
    /// current price).
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.original_price.is_some_and(|orig| orig > self.price)
    }

    /// Whether any stock remains.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
