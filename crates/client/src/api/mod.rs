//! HTTP client for the Chopwell ordering service.
//!
//! One [`ApiClient`] is shared by every remote area (cart, orders,
//! favorites, dish catalog). The session collaborator supplies an opaque
//! bearer credential at construction; it is attached to every request as a
//! default header, along with a per-request `x-request-id` for correlation
//! with server logs.
//!
//! Each area is a trait (`CartApi`, `OrderApi`, ...) implemented by
//! `ApiClient`, so the synchronization engines stay generic and testable
//! against in-memory fakes.

mod cart;
mod catalog;
mod favorites;
mod orders;

pub use cart::{CartApi, CartPayload};
pub use catalog::{CatalogApi, CatalogClient, Dish};
pub use favorites::{FavoritesApi, FavoritesPayload};
pub use orders::{Order, OrderApi, PendingOrder};

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ApiConfig;

/// Header carrying the client-generated request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Errors that can occur when calling the ordering service.
///
/// Every variant is non-fatal and retryable; retry policy belongs to the
/// caller, not this client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never completed: unreachable host, connection reset, timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered and declined the request.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The service answered with a body we could not decode.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether the server explicitly rejected the request (4xx), as opposed
    /// to the request failing in transit.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }
}

/// Client for the Chopwell ordering service REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// `credential` is the opaque session token supplied by the auth
    /// collaborator; this client attaches it but does not manage its
    /// lifecycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the credential
    /// is not a valid header value.
    pub fn new(config: &ApiConfig, credential: &SecretString) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", credential.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| ApiError::Parse(format!("Invalid credential format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        headers.insert(
            "Content-Type",
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Issue a request and decode the JSON response.
    ///
    /// Non-success statuses become [`ApiError::Api`] with the response body
    /// as the message.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);
        let request_id = Uuid::new_v4().to_string();

        let mut builder = self
            .inner
            .client
            .request(method, &url)
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                request_id = %request_id,
                path = %path,
                "ordering service declined request"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, path, None::<&()>).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        self.execute(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::PUT, path, None::<&()>).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::DELETE, path, None::<&()>).await
    }
}
