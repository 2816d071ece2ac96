//! Wishlist model.
//!
//! A wishlist entry is a full product snapshot taken at add time, not a bare
//! ID: the list must render offline, and the product may later change or
//! disappear from the catalog. Entries are unique by product ID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// A saved product, as persisted in the wishlist blob.
///
/// The product fields are flattened so the persisted JSON keeps the original
/// `{...product, "added_at": ...}` record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Snapshot of the product at the time it was added.
    #[serde(flatten)]
    pub product: Product,
    /// When the product was added to the wishlist.
    pub added_at: DateTime<Utc>,
}

impl WishlistEntry {
    /// Snapshot a product now.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            added_at: Utc::now(),
        }
    }

    /// ID of the snapshotted product.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }
}
