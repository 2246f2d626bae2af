//! Remote cart endpoints.
//!
//! Every cart mutation returns the full resulting item list; the server is
//! the source of truth and the sync engine replaces the local snapshot
//! wholesale with whatever comes back.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use chopwell_core::DishId;

use super::{ApiClient, ApiError};
use crate::cart::CartLineItem;

/// The server's authoritative cart contents, returned by every cart call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartPayload {
    pub items: Vec<CartLineItem>,
}

/// Remote cart service contract.
pub trait CartApi {
    /// Fetch the full cart.
    async fn get_cart(&self) -> Result<CartPayload, ApiError>;

    /// Create or update a line item, keyed by its dish.
    async fn upsert_item(&self, item: &CartLineItem) -> Result<CartPayload, ApiError>;

    /// Delete the line item for a dish.
    async fn delete_item(&self, dish_id: &DishId) -> Result<CartPayload, ApiError>;

    /// Remove every line item.
    async fn clear_cart(&self) -> Result<CartPayload, ApiError>;
}

impl CartApi for ApiClient {
    #[instrument(skip(self))]
    async fn get_cart(&self) -> Result<CartPayload, ApiError> {
        self.get("/cart").await
    }

    #[instrument(skip(self, item), fields(dish_id = %item.dish_id, quantity = item.quantity))]
    async fn upsert_item(&self, item: &CartLineItem) -> Result<CartPayload, ApiError> {
        self.post("/cart", item).await
    }

    #[instrument(skip(self), fields(dish_id = %dish_id))]
    async fn delete_item(&self, dish_id: &DishId) -> Result<CartPayload, ApiError> {
        self.delete(&format!("/cart/{dish_id}")).await
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self) -> Result<CartPayload, ApiError> {
        self.delete("/cart").await
    }
}
