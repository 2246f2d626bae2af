//! Remote order endpoints and order wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use chopwell_core::{Money, OrderId, OrderStatus, PaymentMethod};

use super::{ApiClient, ApiError};
use crate::cart::CartLineItem;

/// An order as recorded by the ordering service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub items: Vec<CartLineItem>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub contact_details: String,
    pub delivery_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An order-creation request, built immutably from the cart snapshot and
/// checkout session at submission time.
///
/// Never mutated after construction: a failed submission discards it, and
/// a retry rebuilds a fresh one from current state (which may have changed
/// in the meantime).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub items: Vec<CartLineItem>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub contact_details: String,
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub payment_method: PaymentMethod,
}

/// Remote order service contract.
pub trait OrderApi {
    /// Submit a new order.
    async fn create_order(&self, order: &PendingOrder) -> Result<Order, ApiError>;

    /// Fetch the user's full order history.
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// Fetch a single order by ID.
    async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError>;
}

impl OrderApi for ApiClient {
    #[instrument(skip(self, order), fields(total = %order.total_amount, items = order.items.len()))]
    async fn create_order(&self, order: &PendingOrder) -> Result<Order, ApiError> {
        self.post("/orders", order).await
    }

    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/orders").await
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.get(&format!("/orders/{id}")).await
    }
}
