//! Order history state and synchronization.
//!
//! Orders are immutable once placed; the history is a read model refreshed
//! wholesale from the server, newest first. Submission goes through the
//! checkout flow, not here.

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use chopwell_core::OrderId;

use crate::api::{ApiError, Order, OrderApi};

/// Client-side view of the user's past orders.
///
/// Cheaply cloneable; clones share state. Only the [`OrderHistoryEngine`]
/// writes it.
#[derive(Debug, Clone)]
pub struct OrderHistory {
    tx: watch::Sender<Vec<Order>>,
}

impl OrderHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self { tx }
    }

    /// The current order list.
    #[must_use]
    pub fn current(&self) -> Vec<Order> {
        self.tx.borrow().clone()
    }

    /// Number of known orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Atomically swap in a new list and notify subscribers.
    pub fn replace(&self, orders: Vec<Order>) {
        self.tx.send_replace(orders);
    }

    /// Subscribe to history changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Order>> {
        self.tx.subscribe()
    }
}

impl Default for OrderHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the [`OrderHistory`] from the remote order service.
#[derive(Debug, Clone)]
pub struct OrderHistoryEngine<O> {
    api: O,
    history: OrderHistory,
}

impl<O: OrderApi> OrderHistoryEngine<O> {
    /// Create an engine over an order service and its history store.
    pub const fn new(api: O, history: OrderHistory) -> Self {
        Self { api, history }
    }

    /// The history this engine refreshes.
    #[must_use]
    pub const fn history(&self) -> &OrderHistory {
        &self.history
    }

    /// Fetch the full order history and replace the local list.
    ///
    /// # Errors
    ///
    /// On failure the history retains its prior contents.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<(), ApiError> {
        let orders = self.api.list_orders().await.inspect_err(|e| {
            warn!(error = %e, "order history fetch failed; keeping local list");
        })?;

        debug!(count = orders.len(), "order history reconciled from server");
        self.history.replace(orders);
        Ok(())
    }

    /// Fetch a single order, e.g. for a status poll on the tracking screen.
    /// Does not touch the history list.
    ///
    /// # Errors
    ///
    /// Surfaces the remote error unchanged.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn fetch(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.api.get_order(id).await
    }
}
