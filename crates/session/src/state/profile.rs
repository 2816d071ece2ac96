//! Profile state container.
//!
//! A single locally persisted profile record. Absence is a valid state (no
//! one is signed in / nothing saved yet), so reads return `Option`. Every
//! mutation re-serializes the whole record; the write happens before the
//! in-memory commit, so a storage failure leaves memory and disk agreeing
//! on the previous record.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::{RwLock, RwLockWriteGuard};

use mainstreet_core::{
    AddressId, PaymentMethodId, PaymentMethodInput, ProfilePatch, ShippingAddressInput,
    UserProfile,
};
use tracing::{error, warn};

use crate::storage::BlobStore;

use super::SyncStatus;

const PROFILE_KEY: &str = "profile";

#[derive(Default)]
struct ProfileInner {
    profile: Option<UserProfile>,
    status: SyncStatus,
}

struct ProfileShared {
    store: BlobStore,
    state: RwLock<ProfileInner>,
}

/// Profile state container handle. Cheaply cloneable.
#[derive(Clone)]
pub struct ProfileState {
    inner: Arc<ProfileShared>,
}

impl ProfileState {
    #[must_use]
    pub fn new(store: BlobStore) -> Self {
        Self {
            inner: Arc::new(ProfileShared {
                store,
                state: RwLock::new(ProfileInner::default()),
            }),
        }
    }

    /// Load the persisted profile. A missing record is a valid null
    /// profile; an unreadable record degrades to null.
    pub fn load(&self) {
        let (profile, status) = match self.inner.store.get::<UserProfile>(PROFILE_KEY) {
            Ok(profile) => (profile, SyncStatus::Synced),
            Err(e) => {
                warn!(error = %e, "profile load failed, starting with no profile");
                (None, SyncStatus::Degraded)
            }
        };
        let mut state = self.write();
        state.profile = profile;
        state.status = status;
    }

    /// The current profile, if one exists.
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.read(|state| state.profile.clone())
    }

    /// Whether the last load/persist round reached the blob store.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.read(|state| state.status)
    }

    /// Shallow-merge identity fields and write the record back. Creates the
    /// profile if none exists yet.
    pub fn update_profile(&self, patch: ProfilePatch) -> bool {
        self.mutate(|profile| profile.apply_patch(patch)).is_some()
    }

    /// Append a shipping address (ID minted here). Returns the new ID, or
    /// `None` if the write failed.
    pub fn add_shipping_address(&self, input: ShippingAddressInput) -> Option<AddressId> {
        self.mutate(|profile| profile.add_shipping_address(input))
    }

    /// Append a payment method (ID minted here). Returns the new ID, or
    /// `None` if the write failed.
    pub fn add_payment_method(&self, input: PaymentMethodInput) -> Option<PaymentMethodId> {
        self.mutate(|profile| profile.add_payment_method(input))
    }

    /// Make one saved address the default, clearing the flag on the rest.
    /// Returns false for an unknown ID or a failed write.
    pub fn set_default_shipping_address(&self, id: AddressId) -> bool {
        self.mutate_if(|profile| profile.set_default_shipping_address(id))
    }

    /// Make one saved payment method the default, clearing the flag on the
    /// rest. Returns false for an unknown ID or a failed write.
    pub fn set_default_payment_method(&self, id: PaymentMethodId) -> bool {
        self.mutate_if(|profile| profile.set_default_payment_method(id))
    }

    /// Shallow-merge notification settings and write the record back.
    pub fn update_notification_settings(&self, partial: BTreeMap<String, bool>) -> bool {
        self.mutate(|profile| profile.notification_settings.merge(partial))
            .is_some()
    }

    /// Delete the persisted record and clear in-memory state.
    pub fn logout(&self) -> bool {
        let mut state = self.write();
        if let Err(e) = self.inner.store.delete(PROFILE_KEY) {
            error!(error = %e, "failed to delete persisted profile");
            state.status = SyncStatus::Degraded;
            return false;
        }
        state.profile = None;
        state.status = SyncStatus::Synced;
        true
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Apply `op` to a working copy (default record if none exists),
    /// persist the whole record, and commit to memory only on success.
    fn mutate<R>(&self, op: impl FnOnce(&mut UserProfile) -> R) -> Option<R> {
        let mut state = self.write();
        let mut profile = state.profile.clone().unwrap_or_default();
        let result = op(&mut profile);
        if self.persist(&mut state, profile) {
            Some(result)
        } else {
            None
        }
    }

    /// Like [`mutate`](Self::mutate), but `op` reports whether it changed
    /// anything; nothing is persisted when it did not.
    fn mutate_if(&self, op: impl FnOnce(&mut UserProfile) -> bool) -> bool {
        let mut state = self.write();
        let mut profile = state.profile.clone().unwrap_or_default();
        if !op(&mut profile) {
            return false;
        }
        self.persist(&mut state, profile)
    }

    fn persist(&self, state: &mut ProfileInner, profile: UserProfile) -> bool {
        match self.inner.store.put(PROFILE_KEY, &profile) {
            Ok(()) => {
                state.profile = Some(profile);
                state.status = SyncStatus::Synced;
                true
            }
            Err(e) => {
                error!(error = %e, "failed to persist profile");
                state.status = SyncStatus::Degraded;
                false
            }
        }
    }

    fn read<R>(&self, f: impl FnOnce(&ProfileInner) -> R) -> R {
        let state = self
            .inner
            .state
            .read()
            .expect("profile state lock poisoned");
        f(&state)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProfileInner> {
        self.inner
            .state
            .write()
            .expect("profile state lock poisoned")
    }
}
