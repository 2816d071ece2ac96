//! Catalog state container.
//!
//! Holds the full catalog snapshot, a filtered view derived from it, and
//! the "currently selected" product for the detail screen. Fetches are
//! async and set the shared loading flag and error slot; search, category
//! filter, and sort are synchronous over the cached snapshot.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{RwLock, RwLockWriteGuard};

use mainstreet_core::{Product, ProductId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::CatalogApi;
use crate::error::StateError;

use super::OpSequencer;

/// Sort orders for the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Price ascending.
    PriceLowHigh,
    /// Price descending.
    PriceHighLow,
    /// Name ascending (lexicographic).
    NameAz,
    /// Name descending.
    NameZa,
}

/// A sort key string the UI sent that this layer does not recognize.
///
/// Callers treat a parse failure as a no-op, which preserves the original
/// "unknown key does nothing" behavior at the string boundary while keeping
/// [`SortKey`] itself closed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-low-high" => Ok(Self::PriceLowHigh),
            "price-high-low" => Ok(Self::PriceHighLow),
            "name-az" => Ok(Self::NameAz),
            "name-za" => Ok(Self::NameZa),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

#[derive(Default)]
struct CatalogInner {
    /// Full snapshot from the last successful fetch.
    products: Vec<Product>,
    /// View the UI renders; reset to the snapshot, then narrowed/sorted.
    filtered: Vec<Product>,
    /// Product shown on the detail screen.
    selected: Option<Product>,
    /// Shared error slot for all catalog fetches.
    error: Option<StateError>,
}

struct CatalogShared {
    api: CatalogApi,
    state: RwLock<CatalogInner>,
    /// Fences the snapshot against late fetch_all responses.
    snapshot_seq: OpSequencer,
    /// Fences the selected product against late fetch_by_id responses.
    selected_seq: OpSequencer,
    in_flight: AtomicU32,
}

/// Catalog state container handle. Cheaply cloneable.
#[derive(Clone)]
pub struct CatalogState {
    inner: Arc<CatalogShared>,
}

impl CatalogState {
    #[must_use]
    pub fn new(api: CatalogApi) -> Self {
        Self {
            inner: Arc::new(CatalogShared {
                api,
                state: RwLock::new(CatalogInner::default()),
                snapshot_seq: OpSequencer::default(),
                selected_seq: OpSequencer::default(),
                in_flight: AtomicU32::new(0),
            }),
        }
    }

    // =========================================================================
    // Synchronous reads
    // =========================================================================

    /// Full catalog snapshot from the last successful fetch.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.read(|state| state.products.clone())
    }

    /// The filtered view the UI renders.
    #[must_use]
    pub fn filtered(&self) -> Vec<Product> {
        self.read(|state| state.filtered.clone())
    }

    /// The currently selected product, if any.
    #[must_use]
    pub fn selected(&self) -> Option<Product> {
        self.read(|state| state.selected.clone())
    }

    /// Whether any catalog fetch is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire) > 0
    }

    /// The shared error slot.
    #[must_use]
    pub fn error(&self) -> Option<StateError> {
        self.read(|state| state.error.clone())
    }

    // =========================================================================
    // Remote fetches
    // =========================================================================

    /// Fetch the full catalog; on success both the snapshot and the filtered
    /// view are replaced with identical copies.
    ///
    /// Returns false on failure (previous snapshot retained, error slot
    /// set). A response superseded by a newer fetch is discarded.
    pub async fn refresh(&self) -> bool {
        let seq = self.inner.snapshot_seq.begin();
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);

        let result = self.inner.api.fetch_all().await;
        let ok = match result {
            Ok(products) => {
                if self.inner.snapshot_seq.try_apply(seq) {
                    let mut state = self.write();
                    state.filtered.clone_from(&products);
                    state.products = products;
                    state.error = None;
                } else {
                    debug!("discarding stale catalog snapshot");
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "catalog fetch failed");
                if self.inner.snapshot_seq.try_apply(seq) {
                    self.write().error = Some(StateError::api("Failed to fetch products", &e));
                }
                false
            }
        };

        self.inner.in_flight.fetch_sub(1, Ordering::AcqRel);
        ok
    }

    /// Fetch one product and store it as the selected product.
    ///
    /// Returns the product, or `None` on failure (error slot records
    /// whether it was missing or unreachable).
    pub async fn fetch_by_id(&self, id: ProductId) -> Option<Product> {
        let seq = self.inner.selected_seq.begin();
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);

        let result = self.inner.api.fetch_by_id(id).await;
        let fetched = match result {
            Ok(product) => {
                if self.inner.selected_seq.try_apply(seq) {
                    let mut state = self.write();
                    state.selected = Some(product.clone());
                    state.error = None;
                } else {
                    debug!(product_id = %id, "discarding stale product response");
                }
                Some(product)
            }
            Err(e) => {
                warn!(error = %e, product_id = %id, "product fetch failed");
                if self.inner.selected_seq.try_apply(seq) {
                    self.write().error =
                        Some(StateError::api("Failed to fetch product details", &e));
                }
                None
            }
        };

        self.inner.in_flight.fetch_sub(1, Ordering::AcqRel);
        fetched
    }

    /// Set (or clear) the selected product without a fetch, e.g. when the
    /// detail screen already holds the listing row.
    pub fn set_selected(&self, product: Option<Product>) {
        self.write().selected = product;
    }

    // =========================================================================
    // Synchronous snapshot queries
    // =========================================================================

    /// Case-insensitive substring match against name or description. An
    /// empty term resets the filtered view to the full snapshot.
    pub fn search(&self, term: &str) -> Vec<Product> {
        let mut state = self.write();
        if term.is_empty() {
            state.filtered = state.products.clone();
        } else {
            let needle = term.to_lowercase();
            state.filtered = state
                .products
                .iter()
                .filter(|p| {
                    p.name.to_lowercase().contains(&needle)
                        || p.description.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect();
        }
        state.filtered.clone()
    }

    /// Exact category match. An empty category resets the filtered view to
    /// the full snapshot.
    pub fn filter_by_category(&self, category: &str) -> Vec<Product> {
        let mut state = self.write();
        if category.is_empty() {
            state.filtered = state.products.clone();
        } else {
            state.filtered = state
                .products
                .iter()
                .filter(|p| p.category == category)
                .cloned()
                .collect();
        }
        state.filtered.clone()
    }

    /// Sort the filtered view in place.
    pub fn sort(&self, key: SortKey) -> Vec<Product> {
        let mut state = self.write();
        match key {
            SortKey::PriceLowHigh => state.filtered.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceHighLow => state.filtered.sort_by(|a, b| b.price.cmp(&a.price)),
            SortKey::NameAz => state.filtered.sort_by(|a, b| a.name.cmp(&b.name)),
            SortKey::NameZa => state.filtered.sort_by(|a, b| b.name.cmp(&a.name)),
        }
        state.filtered.clone()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read<R>(&self, f: impl FnOnce(&CatalogInner) -> R) -> R {
        let state = self
            .inner
            .state
            .read()
            .expect("catalog state lock poisoned");
        f(&state)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogInner> {
        self.inner
            .state
            .write()
            .expect("catalog state lock poisoned")
    }

    /// Replace the snapshot directly (test seam; refresh() goes through the
    /// same application path).
    #[cfg(test)]
    pub(crate) fn apply_snapshot(&self, products: Vec<Product>) {
        let mut state = self.write();
        state.filtered.clone_from(&products);
        state.products = products;
        state.error = None;
    }
}
