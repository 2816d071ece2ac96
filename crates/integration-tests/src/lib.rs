//! Integration test harness for the Mainstreet Markets session layer.
//!
//! Provides [`MockStore`], an in-process axum server implementing the
//! catalog and cart endpoints the session layer talks to, with injectable
//! failures for exercising degraded paths, and a [`TempDir`] fixture for
//! the persisted containers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mainstreet-integration-tests
//! ```

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use mainstreet_core::{Cart, CartItem, Product, ProductId};

// ============================================================================
// Logging
// ============================================================================

/// Install a tracing subscriber writing to the test capture buffer, filtered
/// by `RUST_LOG`. First call per process wins; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Product fixtures
// ============================================================================

/// Build a catalog product with the given ID, name, and decimal price
/// string. Remaining fields get serviceable defaults.
#[must_use]
pub fn product(id: i64, name: &str, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: format!("{name} description"),
        price: price.parse().expect("invalid price literal"),
        original_price: None,
        category: "general".to_string(),
        rating: 4.0,
        review_count: 10,
        image: format!("https://cdn.example/{id}.jpg"),
        stock: 25,
        sizes: None,
    }
}

// ============================================================================
// Mock store server
// ============================================================================

#[derive(Default)]
struct StoreData {
    products: Vec<Product>,
    /// Cart lines as (product, quantity), in insertion order.
    lines: Vec<(ProductId, u32)>,
    /// Fail the next N catalog list requests with a 500.
    fail_products: usize,
    /// Fail all cart fetches with a 500 while set.
    cart_down: bool,
    /// Fail the next N add_item requests with a 500.
    fail_add: usize,
    /// Fail the next N remove_item requests with a 500.
    fail_remove: usize,
}

type SharedData = Arc<Mutex<StoreData>>;

#[derive(Deserialize)]
struct AddItemBody {
    product_id: ProductId,
    quantity: u32,
}

#[derive(Deserialize)]
struct RemoveItemBody {
    product_id: ProductId,
}

/// An in-process store server bound to an ephemeral localhost port.
///
/// Handlers mirror the real store API's shapes: product lists and detail
/// records, and a cart whose every mutation returns the full updated cart.
/// Failure injection flips individual endpoints to 500 so tests can drive
/// the session layer's degraded paths.
pub struct MockStore {
    base_url: String,
    data: SharedData,
    server: JoinHandle<()>,
}

impl MockStore {
    /// Start a server seeded with the given catalog.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind or the local address cannot be
    /// read (test-only code).
    pub async fn start(products: Vec<Product>) -> Self {
        let data: SharedData = Arc::new(Mutex::new(StoreData {
            products,
            ..StoreData::default()
        }));

        let app = Router::new()
            .route("/api/products/", get(list_products))
            .route("/api/products/products/{id}/", get(get_product))
            .route("/api/cart/", get(get_cart))
            .route("/api/cart/add_item/", post(add_item))
            .route("/api/cart/remove_item/", post(remove_item))
            .with_state(data.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock store listener");
        let addr: SocketAddr = listener
            .local_addr()
            .expect("failed to read mock store address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("mock store server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            data,
            server,
        }
    }

    /// Base URL to hand to `SessionConfig`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Failure injection
    // ------------------------------------------------------------------

    /// Fail the next `n` catalog list requests with a 500.
    pub fn fail_next_product_fetches(&self, n: usize) {
        self.lock().fail_products = n;
    }

    /// While set, every cart fetch returns a 500.
    pub fn set_cart_down(&self, down: bool) {
        self.lock().cart_down = down;
    }

    /// Fail the next `n` add_item requests with a 500.
    pub fn fail_next_adds(&self, n: usize) {
        self.lock().fail_add = n;
    }

    /// Fail the next `n` remove_item requests with a 500.
    pub fn fail_next_removes(&self, n: usize) {
        self.lock().fail_remove = n;
    }

    // ------------------------------------------------------------------
    // Server-side truth for assertions
    // ------------------------------------------------------------------

    /// The quantity the server holds for a product, if the line exists.
    #[must_use]
    pub fn server_quantity(&self, product_id: ProductId) -> Option<u32> {
        self.lock()
            .lines
            .iter()
            .find(|(id, _)| *id == product_id)
            .map(|(_, qty)| *qty)
    }

    /// Number of cart lines the server holds.
    #[must_use]
    pub fn server_line_count(&self) -> usize {
        self.lock().lines.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoreData> {
        self.data.lock().expect("mock store state lock poisoned")
    }
}

impl Drop for MockStore {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn cart_snapshot(data: &StoreData) -> Cart {
    let items: Vec<CartItem> = data
        .lines
        .iter()
        .filter_map(|(id, quantity)| {
            data.products
                .iter()
                .find(|p| p.id == *id)
                .map(|product| CartItem {
                    product: product.clone(),
                    quantity: *quantity,
                })
        })
        .collect();
    let total = items
        .iter()
        .map(|item| item.product.price * Decimal::from(item.quantity))
        .sum();
    Cart { items, total }
}

async fn list_products(State(data): State<SharedData>) -> Response {
    let mut data = data.lock().expect("mock store state lock poisoned");
    if data.fail_products > 0 {
        data.fail_products -= 1;
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(data.products.clone()).into_response()
}

async fn get_product(State(data): State<SharedData>, UrlPath(id): UrlPath<i64>) -> Response {
    let data = data.lock().expect("mock store state lock poisoned");
    match data.products.iter().find(|p| p.id.as_i64() == id) {
        Some(product) => Json(product.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_cart(State(data): State<SharedData>) -> Response {
    let data = data.lock().expect("mock store state lock poisoned");
    if data.cart_down {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(cart_snapshot(&data)).into_response()
}

async fn add_item(State(data): State<SharedData>, Json(body): Json<AddItemBody>) -> Response {
    let mut data = data.lock().expect("mock store state lock poisoned");
    if data.fail_add > 0 {
        data.fail_add -= 1;
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if !data.products.iter().any(|p| p.id == body.product_id) {
        return StatusCode::NOT_FOUND.into_response();
    }
    match data
        .lines
        .iter_mut()
        .find(|(id, _)| *id == body.product_id)
    {
        Some((_, quantity)) => *quantity += body.quantity,
        None => data.lines.push((body.product_id, body.quantity)),
    }
    Json(cart_snapshot(&data)).into_response()
}

async fn remove_item(State(data): State<SharedData>, Json(body): Json<RemoveItemBody>) -> Response {
    let mut data = data.lock().expect("mock store state lock poisoned");
    if data.fail_remove > 0 {
        data.fail_remove -= 1;
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    data.lines.retain(|(id, _)| *id != body.product_id);
    Json(cart_snapshot(&data)).into_response()
}

// ============================================================================
// Temp directory fixture
// ============================================================================

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A unique temp directory removed on drop, for the persisted containers.
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Create a fresh directory under the system temp dir.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created (test-only code).
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.subsec_nanos());
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "mainstreet-it-{prefix}-{}-{nanos}-{counter}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

// `notification_settings` payload helper used by the profile tests.
#[must_use]
pub fn settings(pairs: &[(&str, bool)]) -> BTreeMap<String, bool> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), *value))
        .collect()
}
