//! Session state containers and the facade that owns them.
//!
//! Each container owns its slice of in-memory state exclusively behind an
//! `RwLock`; no cross-container locking exists because containers share no
//! mutable state. Remote containers additionally carry an [`OpSequencer`]
//! so a slow, stale response cannot overwrite state applied by a newer one.

mod cart;
mod catalog;
mod profile;
mod wishlist;

pub use cart::CartState;
pub use catalog::{CatalogState, SortKey, UnknownSortKey};
pub use profile::ProfileState;
pub use wishlist::{WishlistAdd, WishlistState};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::{ApiClient, CartApi, CatalogApi};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::storage::BlobStore;

/// Whether a container's state reflects its authoritative source.
///
/// `Degraded` marks fallback state substituted after a load failure (empty
/// cart when the server is unreachable, empty wishlist when the blob is
/// unreadable), so callers can tell "truly empty" from "failed to load".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// State matches the last successful read of the source.
    #[default]
    Synced,
    /// State is a fallback; the source could not be read.
    Degraded,
}

/// Monotonic sequence fence for racing async operations.
///
/// Every mutating call takes a ticket with [`begin`](Self::begin); when its
/// response arrives, [`try_apply`](Self::try_apply) admits it only if no
/// newer ticket has been applied since. The loser of a race is discarded
/// instead of overwriting fresher state.
#[derive(Debug, Default)]
pub(crate) struct OpSequencer {
    next: AtomicU64,
    applied: AtomicU64,
}

impl OpSequencer {
    /// Take the next ticket.
    pub(crate) fn begin(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Try to mark `seq` as applied. Returns false if a newer ticket already
    /// was, in which case the caller must discard its response.
    pub(crate) fn try_apply(&self, seq: u64) -> bool {
        self.applied
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (seq > current).then_some(seq)
            })
            .is_ok()
    }
}

/// The session state facade.
///
/// Constructed once at application start and handed by reference to UI
/// collaborators; cheaply cloneable via `Arc`. Replaces ambient
/// provider/context lookup with explicit dependency injection.
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<SessionStateInner>,
}

struct SessionStateInner {
    config: SessionConfig,
    catalog: CatalogState,
    cart: CartState,
    wishlist: WishlistState,
    profile: ProfileState,
}

impl SessionState {
    /// Build the facade: one shared HTTP client for the remote containers,
    /// one blob store for the persisted ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let api = ApiClient::new(config.api_base_url.clone());
        let store = BlobStore::open(&config.data_dir)?;

        let catalog = CatalogState::new(CatalogApi::new(api.clone()));
        let cart = CartState::new(CartApi::new(api));
        let wishlist = WishlistState::new(store.clone());
        let profile = ProfileState::new(store);

        Ok(Self {
            inner: Arc::new(SessionStateInner {
                config,
                catalog,
                cart,
                wishlist,
                profile,
            }),
        })
    }

    /// Run the startup sequence: load the persisted wishlist and profile,
    /// then fetch the initial catalog snapshot.
    ///
    /// Failures degrade rather than propagate; the catalog error slot and
    /// the persisted containers' [`SyncStatus`] record what went wrong.
    pub async fn load(&self) {
        self.inner.wishlist.load();
        self.inner.profile.load();
        self.inner.catalog.refresh().await;
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// The catalog state container.
    #[must_use]
    pub fn catalog(&self) -> &CatalogState {
        &self.inner.catalog
    }

    /// The cart state container.
    #[must_use]
    pub fn cart(&self) -> &CartState {
        &self.inner.cart
    }

    /// The wishlist state container.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistState {
        &self.inner.wishlist
    }

    /// The profile state container.
    #[must_use]
    pub fn profile(&self) -> &ProfileState {
        &self.inner.profile
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencer_applies_in_order() {
        let seq = OpSequencer::default();
        let first = seq.begin();
        let second = seq.begin();
        assert!(first < second);
        assert!(seq.try_apply(first));
        assert!(seq.try_apply(second));
    }

    #[test]
    fn test_sequencer_discards_stale_response() {
        let seq = OpSequencer::default();
        let slow = seq.begin();
        let fast = seq.begin();
        // The later call's response lands first
        assert!(seq.try_apply(fast));
        // The earlier call's late response must be discarded
        assert!(!seq.try_apply(slow));
    }

    #[test]
    fn test_sequencer_rejects_replay() {
        let seq = OpSequencer::default();
        let ticket = seq.begin();
        assert!(seq.try_apply(ticket));
        assert!(!seq.try_apply(ticket));
    }
}
