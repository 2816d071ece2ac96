//! Cart container tests against the in-process mock store.
//!
//! The server cart is authoritative; every assertion about the local mirror
//! has a matching assertion against the server-side lines where it matters.
//!
//! Run with: cargo test -p mainstreet-integration-tests

use mainstreet_core::ProductId;
use mainstreet_integration_tests::{MockStore, TempDir, init_tracing, product};
use mainstreet_session::error::ErrorKind;
use mainstreet_session::state::SyncStatus;
use mainstreet_session::{SessionConfig, SessionState};

fn session(store: &MockStore, tmp: &TempDir) -> SessionState {
    init_tracing();
    let config =
        SessionConfig::new(store.base_url(), tmp.path()).expect("mock store URL should parse");
    SessionState::new(config).expect("failed to build session state")
}

// ============================================================================
// Happy paths
// ============================================================================

#[tokio::test]
async fn test_add_then_refresh_matches_server() {
    let store = MockStore::start(vec![product(1, "A", "10.00")]).await;
    let tmp = TempDir::new("cart-add");
    let session = session(&store, &tmp);

    assert!(session.cart().add(ProductId::new(1), 2).await);
    assert_eq!(
        session.cart().cart().quantity_of(ProductId::new(1)),
        Some(2)
    );

    // A fresh fetch agrees with what the add returned
    assert!(session.cart().refresh().await);
    assert_eq!(
        session.cart().cart().quantity_of(ProductId::new(1)),
        Some(2)
    );
    assert_eq!(store.server_quantity(ProductId::new(1)), Some(2));
    assert_eq!(session.cart().cart().total, "20.00".parse().expect("decimal"));
}

#[tokio::test]
async fn test_repeated_add_accumulates_quantity() {
    let store = MockStore::start(vec![product(1, "A", "10.00")]).await;
    let tmp = TempDir::new("cart-accumulate");
    let session = session(&store, &tmp);

    session.cart().add(ProductId::new(1), 1).await;
    session.cart().add(ProductId::new(1), 3).await;
    assert_eq!(
        session.cart().cart().quantity_of(ProductId::new(1)),
        Some(4)
    );
}

#[tokio::test]
async fn test_remove_drops_line_via_refetch() {
    let store = MockStore::start(vec![product(1, "A", "10.00"), product(2, "B", "5.00")]).await;
    let tmp = TempDir::new("cart-remove");
    let session = session(&store, &tmp);

    session.cart().add(ProductId::new(1), 1).await;
    session.cart().add(ProductId::new(2), 1).await;

    assert!(session.cart().remove(ProductId::new(1)).await);
    assert!(!session.cart().cart().contains(ProductId::new(1)));
    assert!(session.cart().cart().contains(ProductId::new(2)));
    assert_eq!(store.server_line_count(), 1);
}

#[tokio::test]
async fn test_update_quantity_sets_exact_value() {
    let store = MockStore::start(vec![product(1, "A", "10.00")]).await;
    let tmp = TempDir::new("cart-update");
    let session = session(&store, &tmp);

    session.cart().add(ProductId::new(1), 5).await;
    assert!(session.cart().update_quantity(ProductId::new(1), 2).await);
    assert_eq!(
        session.cart().cart().quantity_of(ProductId::new(1)),
        Some(2)
    );
    assert_eq!(store.server_quantity(ProductId::new(1)), Some(2));
}

#[tokio::test]
async fn test_update_quantity_zero_removes_line() {
    let store = MockStore::start(vec![product(1, "A", "10.00")]).await;
    let tmp = TempDir::new("cart-zero");
    let session = session(&store, &tmp);

    session.cart().add(ProductId::new(1), 2).await;
    assert!(session.cart().update_quantity(ProductId::new(1), 0).await);

    assert!(!session.cart().cart().contains(ProductId::new(1)));
    assert!(session.cart().refresh().await);
    assert!(!session.cart().cart().contains(ProductId::new(1)));
    assert_eq!(store.server_quantity(ProductId::new(1)), None);
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn test_failed_add_leaves_cart_unchanged_and_sets_error() {
    let store = MockStore::start(vec![product(1, "A", "10.00")]).await;
    let tmp = TempDir::new("cart-add-fail");
    let session = session(&store, &tmp);

    session.cart().add(ProductId::new(1), 1).await;
    let before = session.cart().cart();

    store.fail_next_adds(1);
    assert!(!session.cart().add(ProductId::new(1), 1).await);

    assert_eq!(session.cart().cart(), before);
    let err = session.cart().error().expect("error slot should be set");
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.message, "Failed to add item to cart");

    // The next successful operation clears the slot
    assert!(session.cart().add(ProductId::new(1), 1).await);
    assert!(session.cart().error().is_none());
}

#[tokio::test]
async fn test_degraded_refresh_falls_back_to_empty_cart() {
    let store = MockStore::start(vec![product(1, "A", "10.00")]).await;
    let tmp = TempDir::new("cart-degraded");
    let session = session(&store, &tmp);

    session.cart().add(ProductId::new(1), 2).await;

    store.set_cart_down(true);
    assert!(!session.cart().refresh().await);
    assert!(session.cart().cart().is_empty());
    assert_eq!(session.cart().status(), SyncStatus::Degraded);
    assert_eq!(
        session.cart().error().expect("error slot").message,
        "Failed to fetch cart"
    );

    // Recovery: the server cart was never lost
    store.set_cart_down(false);
    assert!(session.cart().refresh().await);
    assert_eq!(session.cart().status(), SyncStatus::Synced);
    assert_eq!(
        session.cart().cart().quantity_of(ProductId::new(1)),
        Some(2)
    );
}

#[tokio::test]
async fn test_update_quantity_rolls_back_on_add_failure() {
    let store = MockStore::start(vec![product(1, "A", "10.00")]).await;
    let tmp = TempDir::new("cart-rollback");
    let session = session(&store, &tmp);

    session.cart().add(ProductId::new(1), 3).await;

    // The remove step succeeds, the add step fails once; the compensating
    // re-add of the previous quantity then succeeds.
    store.fail_next_adds(1);
    assert!(!session.cart().update_quantity(ProductId::new(1), 5).await);

    assert_eq!(store.server_quantity(ProductId::new(1)), Some(3));
    assert_eq!(
        session.cart().cart().quantity_of(ProductId::new(1)),
        Some(3)
    );
    assert_eq!(
        session.cart().error().expect("error slot").message,
        "Failed to update quantity"
    );
}

#[tokio::test]
async fn test_failed_remove_keeps_line() {
    let store = MockStore::start(vec![product(1, "A", "10.00")]).await;
    let tmp = TempDir::new("cart-remove-fail");
    let session = session(&store, &tmp);

    session.cart().add(ProductId::new(1), 1).await;
    store.fail_next_removes(1);

    assert!(!session.cart().remove(ProductId::new(1)).await);
    assert!(session.cart().cart().contains(ProductId::new(1)));
    assert_eq!(
        session.cart().error().expect("error slot").message,
        "Failed to remove item from cart"
    );
    assert_eq!(store.server_quantity(ProductId::new(1)), Some(1));
}
