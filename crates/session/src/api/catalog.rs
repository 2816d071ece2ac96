//! Remote catalog client.

use mainstreet_core::{Product, ProductId};
use tracing::instrument;

use super::{ApiClient, ApiError};

/// Client for the product catalog endpoints.
#[derive(Clone)]
pub struct CatalogApi {
    client: ApiClient,
}

impl CatalogApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Retrieve the full catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get("api/products/").await
    }

    /// Retrieve a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or
    /// another `ApiError` if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_by_id(&self, id: ProductId) -> Result<Product, ApiError> {
        // The detail route nests under a second /products/ segment
        self.client
            .get(&format!("api/products/products/{id}/"))
            .await
    }
}
