//! Shared fixtures for unit tests.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use mainstreet_core::{Product, ProductId};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Self-cleaning temporary directory for storage tests.
pub(crate) struct TempDir {
    path: PathBuf,
}

impl TempDir {
    #[allow(clippy::unwrap_used)]
    pub(crate) fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!(
            "mainstreet-{prefix}-{}-{nanos}-{counter}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Minimal product fixture.
#[allow(clippy::unwrap_used)]
pub(crate) fn product(id: i64, name: &str, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: format!("{name} description"),
        price: price.parse().unwrap(),
        original_price: None,
        category: "misc".to_string(),
        rating: 0.0,
        review_count: 0,
        image: String::new(),
        stock: 10,
        sizes: None,
    }
}
