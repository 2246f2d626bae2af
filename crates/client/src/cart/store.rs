//! In-memory cart authority.
//!
//! The store holds exactly one snapshot at a time and only ever swaps it
//! wholesale. Consumers subscribe for change notification and must treat
//! every replace as a full invalidation - there is no incremental patching.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use chopwell_core::{DishId, Money};

/// One dish-and-quantity entry within the cart.
///
/// `price` on the wire is the unit price, not the line total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub dish_id: DishId,
    #[serde(rename = "price")]
    pub unit_price: Money,
    pub quantity: u32,
}

impl CartLineItem {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// An immutable view of the whole cart, keyed by dish.
///
/// Invariants, enforced at construction:
/// - at most one line item per dish (later entries win over earlier ones)
/// - no zero-quantity lines (quantity 0 means absence)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartSnapshot {
    lines: BTreeMap<DishId, CartLineItem>,
}

impl CartSnapshot {
    /// Build a snapshot from a server item list, de-duplicating by dish and
    /// eliding zero-quantity rows.
    #[must_use]
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut lines = BTreeMap::new();
        for item in items {
            if item.quantity == 0 {
                lines.remove(&item.dish_id);
            } else {
                lines.insert(item.dish_id.clone(), item);
            }
        }
        Self { lines }
    }

    /// Iterate the line items in dish order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLineItem> {
        self.lines.values()
    }

    /// The line item for a dish, if present.
    #[must_use]
    pub fn line_for(&self, dish_id: &DishId) -> Option<&CartLineItem> {
        self.lines.get(dish_id)
    }

    /// Number of distinct dishes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    /// Owned item list, e.g. for building an order payload.
    #[must_use]
    pub fn to_items(&self) -> Vec<CartLineItem> {
        self.lines.values().cloned().collect()
    }
}

/// The client-side cart authority.
///
/// Cheaply cloneable; clones share the same underlying state. Only the
/// [`CartSyncEngine`](super::CartSyncEngine) writes it (the checkout flow
/// writes indirectly through the engine's clear-on-success).
#[derive(Debug, Clone)]
pub struct CartStore {
    tx: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CartSnapshot::default());
        Self { tx }
    }

    /// The current snapshot.
    #[must_use]
    pub fn current(&self) -> CartSnapshot {
        self.tx.borrow().clone()
    }

    /// Atomically swap in a new snapshot and notify subscribers.
    pub fn replace(&self, snapshot: CartSnapshot) {
        self.tx.send_replace(snapshot);
    }

    /// The line item for a dish, if present.
    #[must_use]
    pub fn line_for(&self, dish_id: &DishId) -> Option<CartLineItem> {
        self.tx.borrow().line_for(dish_id).cloned()
    }

    /// Subscribe to snapshot changes. Every `replace` is observable as a
    /// full invalidation; there are no partial updates to merge.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, price: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            dish_id: DishId::new(id),
            unit_price: Money::new(price),
            quantity,
        }
    }

    #[test]
    fn test_from_items_dedupes_last_wins() {
        let snap = CartSnapshot::from_items(vec![line("a", 500, 3), line("a", 500, 5)]);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.line_for(&DishId::new("a")).unwrap().quantity, 5);
    }

    #[test]
    fn test_from_items_elides_zero_quantity() {
        let snap = CartSnapshot::from_items(vec![line("a", 500, 2), line("a", 500, 0)]);
        assert!(snap.is_empty());
        assert!(snap.line_for(&DishId::new("a")).is_none());
    }

    #[test]
    fn test_total_quantity() {
        let snap = CartSnapshot::from_items(vec![line("a", 1200, 2), line("b", 300, 1)]);
        assert_eq!(snap.total_quantity(), 3);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let store = CartStore::new();
        store.replace(CartSnapshot::from_items(vec![line("a", 500, 2)]));

        let replacement = CartSnapshot::from_items(vec![line("b", 300, 1)]);
        store.replace(replacement.clone());

        // No merge artifacts from the prior snapshot
        assert_eq!(store.current(), replacement);
        assert!(store.line_for(&DishId::new("a")).is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_replace() {
        let store = CartStore::new();
        let mut rx = store.subscribe();

        store.replace(CartSnapshot::from_items(vec![line("a", 500, 1)]));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().total_quantity(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let store = CartStore::new();
        let view = store.clone();

        store.replace(CartSnapshot::from_items(vec![line("a", 500, 1)]));
        assert_eq!(view.current().len(), 1);
    }
}
