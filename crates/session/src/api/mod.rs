//! HTTP clients for the remote store API.
//!
//! Plain REST over JSON with `reqwest`. [`ApiClient`] owns the connection
//! pool and base URL; [`CatalogApi`] and [`CartApi`] wrap it with typed
//! endpoint methods. Responses are read as text first so failures can be
//! logged with a body snippet.
//!
//! There are no retries and no request timeouts here: every failure is
//! terminal for that call and surfaced once by the owning state container.

mod cart;
mod catalog;

pub use cart::CartApi;
pub use catalog::CatalogApi;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Errors that can occur when talking to the store API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, DNS, protocol).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Requested entity absent (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server returned a non-success status other than 404.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Truncated response body for diagnostics.
        body: String,
    },

    /// A relative endpoint path could not be joined onto the base URL.
    #[error("Invalid endpoint path: {0}")]
    InvalidPath(#[from] url::ParseError),
}

/// Shared HTTP client for the store API.
///
/// Cheaply cloneable; both endpoint clients hold a copy.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client for the given base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// GET a JSON resource.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.inner.base_url.join(path)?;
        let response = self.inner.client.get(url).send().await?;
        Self::read_json(path, response).await
    }

    /// POST a JSON body and read a JSON response.
    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.inner.base_url.join(path)?;
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::read_json(path, response).await
    }

    /// Check the status and decode the body, logging diagnostics on failure.
    async fn read_json<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %path,
                body = %truncate(&body, 500),
                "Store API returned non-success status"
            );
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %path,
                    body = %truncate(&body, 500),
                    "Failed to parse store API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("api/products/products/9/".to_string());
        assert_eq!(err.to_string(), "Not found: api/products/products/9/");

        let err = ApiError::UnexpectedStatus {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected status 502: bad gateway");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_base_url_join() {
        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(
            base.join("api/cart/").unwrap().as_str(),
            "http://localhost:8000/api/cart/"
        );
    }
}
