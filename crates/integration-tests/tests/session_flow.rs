//! End-to-end facade tests: startup sequence plus the persisted
//! wishlist/profile containers backed by a real data directory.
//!
//! Run with: cargo test -p mainstreet-integration-tests

use mainstreet_core::{ProductId, ProfilePatch};
use mainstreet_integration_tests::{MockStore, TempDir, init_tracing, product, settings};
use mainstreet_session::state::{SyncStatus, WishlistAdd};
use mainstreet_session::{SessionConfig, SessionState};

fn session(store: &MockStore, tmp: &TempDir) -> SessionState {
    init_tracing();
    let config =
        SessionConfig::new(store.base_url(), tmp.path()).expect("mock store URL should parse");
    SessionState::new(config).expect("failed to build session state")
}

#[tokio::test]
async fn test_startup_sequence_populates_all_containers() {
    let store = MockStore::start(vec![product(1, "A", "1.00"), product(2, "B", "2.00")]).await;
    let tmp = TempDir::new("session-startup");
    let session = session(&store, &tmp);

    session.load().await;

    assert_eq!(session.catalog().products().len(), 2);
    assert!(session.cart().cart().is_empty());
    assert!(session.wishlist().is_empty());
    assert_eq!(session.wishlist().status(), SyncStatus::Synced);
    assert!(session.profile().profile().is_none());
}

#[tokio::test]
async fn test_wishlist_snapshot_survives_restart() {
    let store = MockStore::start(vec![product(7, "Hat", "12.00")]).await;
    let tmp = TempDir::new("session-wishlist");

    {
        let session = session(&store, &tmp);
        session.load().await;

        let hat = session
            .catalog()
            .fetch_by_id(ProductId::new(7))
            .await
            .expect("product should exist");
        assert_eq!(session.wishlist().add(hat.clone()), WishlistAdd::Added);
        assert_eq!(session.wishlist().add(hat), WishlistAdd::AlreadyPresent);
    }

    // A new facade over the same data dir sees the snapshot, including the
    // product fields captured at add time
    let session = session(&store, &tmp);
    session.load().await;
    assert!(session.wishlist().contains(ProductId::new(7)));
    let entries = session.wishlist().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].product.name, "Hat");
}

#[tokio::test]
async fn test_wishlist_blob_keeps_wire_record_shape() {
    let store = MockStore::start(vec![product(7, "Hat", "12.00")]).await;
    let tmp = TempDir::new("session-blob");
    let session = session(&store, &tmp);
    session.load().await;

    let hat = session.catalog().products()[0].clone();
    session.wishlist().add(hat);

    // The persisted record keeps product fields flattened next to added_at,
    // with the price as a decimal string
    let raw = std::fs::read_to_string(tmp.path().join("wishlist.json"))
        .expect("wishlist blob should exist");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("blob should be JSON");
    let entries = json.as_array().expect("blob should be an array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], 7);
    assert_eq!(entries[0]["price"], "12.00");
    assert!(entries[0].get("added_at").is_some());
    assert!(entries[0].get("product").is_none());
}

#[tokio::test]
async fn test_profile_flow_across_restart_and_logout() {
    let store = MockStore::start(vec![]).await;
    let tmp = TempDir::new("session-profile");

    {
        let session = session(&store, &tmp);
        session.load().await;
        assert!(session.profile().update_profile(ProfilePatch {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            ..ProfilePatch::default()
        }));
        assert!(
            session
                .profile()
                .update_notification_settings(settings(&[("order_updates", true)]))
        );
    }

    let session = session(&store, &tmp);
    session.load().await;
    let profile = session.profile().profile().expect("profile persisted");
    assert_eq!(profile.name.as_deref(), Some("Ada"));
    assert_eq!(profile.notification_settings.get("order_updates"), Some(true));

    assert!(session.profile().logout());
    assert!(session.profile().profile().is_none());
    assert!(!tmp.path().join("profile.json").exists());
}

#[tokio::test]
async fn test_containers_share_one_facade_without_interference() {
    let store = MockStore::start(vec![product(1, "A", "10.00")]).await;
    let tmp = TempDir::new("session-shared");
    let session = session(&store, &tmp);
    session.load().await;

    // Cart and wishlist operate on the same product independently
    assert!(session.cart().add(ProductId::new(1), 1).await);
    let listing = session.catalog().products()[0].clone();
    session.wishlist().add(listing);

    assert!(session.cart().remove(ProductId::new(1)).await);
    assert!(session.wishlist().contains(ProductId::new(1)));
}
