//! Remote cart client.
//!
//! The cart lives on the server and every mutation returns the full new
//! cart; callers replace their local mirror with whatever comes back. There
//! is no single set-quantity endpoint, so quantity updates are composed from
//! remove + add by the cart state container.

use mainstreet_core::{Cart, ProductId};
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

#[derive(Serialize)]
struct AddItemRequest {
    product_id: ProductId,
    quantity: u32,
}

#[derive(Serialize)]
struct RemoveItemRequest {
    product_id: ProductId,
}

/// Client for the server-resident cart endpoints.
#[derive(Clone)]
pub struct CartApi {
    client: ApiClient,
}

impl CartApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the current server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<Cart, ApiError> {
        self.client.get("api/cart/").await
    }

    /// Add `quantity` units of a product; returns the server's new cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn add_item(&self, product_id: ProductId, quantity: u32) -> Result<Cart, ApiError> {
        self.client
            .post(
                "api/cart/add_item/",
                &AddItemRequest {
                    product_id,
                    quantity,
                },
            )
            .await
    }

    /// Remove a product's line entirely; returns the server's new cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: ProductId) -> Result<Cart, ApiError> {
        self.client
            .post("api/cart/remove_item/", &RemoveItemRequest { product_id })
            .await
    }
}
