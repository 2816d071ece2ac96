//! Wishlist state container.
//!
//! A locally persisted list of product snapshots, unique by product ID.
//! Loaded once at startup; every mutation writes the full list back to the
//! blob store. There is no server sync.

use std::sync::Arc;
use std::sync::{RwLock, RwLockWriteGuard};

use mainstreet_core::{Product, ProductId, WishlistEntry};
use tracing::{debug, warn};

use crate::storage::BlobStore;

use super::SyncStatus;

const WISHLIST_KEY: &str = "wishlist";

/// Outcome of an add: callers surface a distinct "already in wishlist"
/// signal rather than silently succeeding twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistAdd {
    /// The product was added.
    Added,
    /// The product was already present; the wishlist is unchanged.
    AlreadyPresent,
}

#[derive(Default)]
struct WishlistInner {
    entries: Vec<WishlistEntry>,
    status: SyncStatus,
}

struct WishlistShared {
    store: BlobStore,
    state: RwLock<WishlistInner>,
}

/// Wishlist state container handle. Cheaply cloneable.
#[derive(Clone)]
pub struct WishlistState {
    inner: Arc<WishlistShared>,
}

impl WishlistState {
    #[must_use]
    pub fn new(store: BlobStore) -> Self {
        Self {
            inner: Arc::new(WishlistShared {
                store,
                state: RwLock::new(WishlistInner::default()),
            }),
        }
    }

    /// Load the persisted wishlist. A missing record is an empty list; an
    /// unreadable record degrades silently to an empty list (observable via
    /// [`status`](Self::status), but no error propagates).
    pub fn load(&self) {
        let (entries, status) = match self.inner.store.get::<Vec<WishlistEntry>>(WISHLIST_KEY) {
            Ok(Some(entries)) => (entries, SyncStatus::Synced),
            Ok(None) => (Vec::new(), SyncStatus::Synced),
            Err(e) => {
                warn!(error = %e, "wishlist load failed, starting empty");
                (Vec::new(), SyncStatus::Degraded)
            }
        };
        let mut state = self.write();
        state.entries = entries;
        state.status = status;
    }

    /// All entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<WishlistEntry> {
        self.read(|state| state.entries.clone())
    }

    /// Synchronous membership test.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.read(|state| {
            state
                .entries
                .iter()
                .any(|entry| entry.product_id() == product_id)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read(|state| state.entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the last load/persist round reached the blob store.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.read(|state| state.status)
    }

    /// Snapshot a product into the wishlist. Adding a product that is
    /// already present is a no-op with a distinct outcome.
    pub fn add(&self, product: Product) -> WishlistAdd {
        let mut state = self.write();
        if state
            .entries
            .iter()
            .any(|entry| entry.product_id() == product.id)
        {
            debug!(product_id = %product.id, "product already in wishlist");
            return WishlistAdd::AlreadyPresent;
        }
        state.entries.push(WishlistEntry::new(product));
        self.persist(&mut state);
        WishlistAdd::Added
    }

    /// Remove the entry for a product. Returns false if it was not present.
    pub fn remove(&self, product_id: ProductId) -> bool {
        let mut state = self.write();
        let before = state.entries.len();
        state
            .entries
            .retain(|entry| entry.product_id() != product_id);
        if state.entries.len() == before {
            return false;
        }
        self.persist(&mut state);
        true
    }

    /// Empty the wishlist and delete the persisted record.
    pub fn clear(&self) {
        let mut state = self.write();
        state.entries.clear();
        match self.inner.store.delete(WISHLIST_KEY) {
            Ok(()) => state.status = SyncStatus::Synced,
            Err(e) => {
                warn!(error = %e, "failed to delete persisted wishlist");
                state.status = SyncStatus::Degraded;
            }
        }
    }

    /// Write the full list back. Persistence failures degrade silently: the
    /// in-memory list keeps the mutation, and status records the miss.
    fn persist(&self, state: &mut WishlistInner) {
        match self.inner.store.put(WISHLIST_KEY, &state.entries) {
            Ok(()) => state.status = SyncStatus::Synced,
            Err(e) => {
                warn!(error = %e, "failed to persist wishlist");
                state.status = SyncStatus::Degraded;
            }
        }
    }

    fn read<R>(&self, f: impl FnOnce(&WishlistInner) -> R) -> R {
        let state = self
            .inner
            .state
            .read()
            .expect("wishlist state lock poisoned");
        f(&state)
    }

    fn write(&self) -> RwLockWriteGuard<'_, WishlistInner> {
        self.inner
            .state
            .write()
            .expect("wishlist state lock poisoned")
    }
}
