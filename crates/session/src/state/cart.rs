//! Cart state container.
//!
//! The server cart is the single source of truth: every successful
//! operation replaces the local mirror with the cart the server returned,
//! and nothing here ever computes a total. When the server is unreachable,
//! `refresh` substitutes an explicit degraded empty cart rather than
//! leaving stale state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{RwLock, RwLockWriteGuard};

use mainstreet_core::{Cart, ProductId};
use tracing::{debug, error, info, warn};

use crate::api::CartApi;
use crate::error::StateError;

use super::{OpSequencer, SyncStatus};

#[derive(Default)]
struct CartInner {
    cart: Cart,
    status: SyncStatus,
    error: Option<StateError>,
}

struct CartShared {
    api: CartApi,
    state: RwLock<CartInner>,
    seq: OpSequencer,
    in_flight: AtomicU32,
}

/// Cart state container handle. Cheaply cloneable.
#[derive(Clone)]
pub struct CartState {
    inner: Arc<CartShared>,
}

impl CartState {
    #[must_use]
    pub fn new(api: CartApi) -> Self {
        Self {
            inner: Arc::new(CartShared {
                api,
                state: RwLock::new(CartInner::default()),
                seq: OpSequencer::default(),
                in_flight: AtomicU32::new(0),
            }),
        }
    }

    // =========================================================================
    // Synchronous reads
    // =========================================================================

    /// The server's last returned cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.read(|state| state.cart.clone())
    }

    /// Whether the mirror is live or a degraded fallback.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.read(|state| state.status)
    }

    /// Whether any cart operation is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire) > 0
    }

    /// The error slot.
    #[must_use]
    pub fn error(&self) -> Option<StateError> {
        self.read(|state| state.error.clone())
    }

    /// Clear the error slot, e.g. when the user dismisses an error banner.
    pub fn clear_error(&self) {
        self.write().error = None;
    }

    /// Reset the local mirror to an empty cart without touching the server.
    /// Debug affordance; normal flows go through [`refresh`](Self::refresh).
    pub fn clear_cart(&self) {
        self.write().cart = Cart::empty();
    }

    // =========================================================================
    // Remote operations
    // =========================================================================

    /// Authoritative refetch of the server cart.
    ///
    /// On failure the mirror becomes an explicit degraded empty cart and
    /// the error slot is set; returns false.
    pub async fn refresh(&self) -> bool {
        let seq = self.inner.seq.begin();
        self.begin_op();

        let ok = match self.inner.api.fetch().await {
            Ok(cart) => {
                self.apply(seq, cart, SyncStatus::Synced, None);
                true
            }
            Err(e) => {
                warn!(error = %e, "cart fetch failed, falling back to empty cart");
                self.apply(
                    seq,
                    Cart::empty(),
                    SyncStatus::Degraded,
                    Some(StateError::api("Failed to fetch cart", &e)),
                );
                false
            }
        };

        self.end_op();
        ok
    }

    /// Add `quantity` units of a product.
    ///
    /// On failure the previous cart is retained and the error slot is set;
    /// returns false.
    pub async fn add(&self, product_id: ProductId, quantity: u32) -> bool {
        let seq = self.inner.seq.begin();
        self.begin_op();

        let ok = match self.inner.api.add_item(product_id, quantity).await {
            Ok(cart) => {
                self.apply(seq, cart, SyncStatus::Synced, None);
                true
            }
            Err(e) => {
                error!(error = %e, product_id = %product_id, "add to cart failed");
                self.set_error(seq, StateError::api("Failed to add item to cart", &e));
                false
            }
        };

        self.end_op();
        ok
    }

    /// Remove a product's line, then refetch the whole cart (two round
    /// trips; the refetch result is what lands in the mirror).
    pub async fn remove(&self, product_id: ProductId) -> bool {
        let seq = self.inner.seq.begin();
        self.begin_op();

        let removed = match self.inner.api.remove_item(product_id).await {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, product_id = %product_id, "remove from cart failed");
                self.set_error(seq, StateError::api("Failed to remove item from cart", &e));
                false
            }
        };

        self.end_op();
        if !removed {
            return false;
        }
        self.refresh().await
    }

    /// Set a product's quantity. Zero delegates to [`remove`](Self::remove).
    ///
    /// The server has no single set-quantity endpoint, so this is composed
    /// as remove-then-add. If the add step fails after the remove step
    /// succeeded, the previous quantity is re-added best-effort so the line
    /// is not silently lost.
    pub async fn update_quantity(&self, product_id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id).await;
        }

        let previous = self.read(|state| state.cart.quantity_of(product_id));
        let seq = self.inner.seq.begin();
        self.begin_op();

        let ok = match self.inner.api.remove_item(product_id).await {
            Err(e) => {
                error!(error = %e, product_id = %product_id, "quantity update failed at remove step");
                self.set_error(seq, StateError::api("Failed to update quantity", &e));
                false
            }
            Ok(_) => match self.inner.api.add_item(product_id, quantity).await {
                Ok(cart) => {
                    self.apply(seq, cart, SyncStatus::Synced, None);
                    true
                }
                Err(e) => {
                    error!(error = %e, product_id = %product_id, "quantity update failed at add step");
                    let restored = self.rollback(product_id, previous).await;
                    if self.inner.seq.try_apply(seq) {
                        let mut state = self.write();
                        if let Some(cart) = restored {
                            state.cart = cart;
                            state.status = SyncStatus::Synced;
                        }
                        state.error = Some(StateError::api("Failed to update quantity", &e));
                    }
                    false
                }
            },
        };

        self.end_op();
        ok
    }

    /// Best-effort restore of the line removed by a failed quantity update.
    /// Returns the server cart after the restore, if it succeeded.
    async fn rollback(&self, product_id: ProductId, previous: Option<u32>) -> Option<Cart> {
        let previous = previous?;
        match self.inner.api.add_item(product_id, previous).await {
            Ok(cart) => {
                info!(product_id = %product_id, quantity = previous, "restored cart line after failed update");
                Some(cart)
            }
            Err(e) => {
                error!(error = %e, product_id = %product_id, "rollback failed, cart line lost");
                None
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Install a server snapshot if no newer operation has applied since.
    fn apply(&self, seq: u64, cart: Cart, status: SyncStatus, err: Option<StateError>) {
        if !self.inner.seq.try_apply(seq) {
            debug!("discarding stale cart response");
            return;
        }
        let mut state = self.write();
        state.cart = cart;
        state.status = status;
        state.error = err;
    }

    /// Record a failure without touching the cart mirror.
    fn set_error(&self, seq: u64, err: StateError) {
        if self.inner.seq.try_apply(seq) {
            self.write().error = Some(err);
        }
    }

    fn begin_op(&self) {
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
    }

    fn end_op(&self) {
        self.inner.in_flight.fetch_sub(1, Ordering::AcqRel);
    }

    fn read<R>(&self, f: impl FnOnce(&CartInner) -> R) -> R {
        let state = self.inner.state.read().expect("cart state lock poisoned");
        f(&state)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CartInner> {
        self.inner.state.write().expect("cart state lock poisoned")
    }
}
