//! Cart synchronization engine.
//!
//! Translates user mutation intents into remote calls and reconciles the
//! local store with the server's response. The contract for every
//! operation: on success the store is replaced wholesale with the server's
//! authoritative item list; on failure the store is left untouched and the
//! error is surfaced to the caller.
//!
//! No ordering is enforced between calls issued in rapid succession - the
//! last response to arrive wins. Callers needing stronger ordering must
//! serialize at the call site, as the checkout flow does while submitting.

use tracing::{debug, instrument, warn};

use chopwell_core::{DishId, Money};

use super::store::{CartLineItem, CartSnapshot, CartStore};
use crate::api::{ApiError, CartApi};

/// Drives the [`CartStore`] from the remote cart service.
#[derive(Debug, Clone)]
pub struct CartSyncEngine<C> {
    api: C,
    store: CartStore,
}

impl<C: CartApi> CartSyncEngine<C> {
    /// Create an engine over a cart service and the store it owns writes to.
    pub const fn new(api: C, store: CartStore) -> Self {
        Self { api, store }
    }

    /// The store this engine reconciles. Read-only for everyone else.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// Fetch the full remote cart and replace the local snapshot.
    ///
    /// # Errors
    ///
    /// On failure the store retains its prior snapshot - never a partial or
    /// empty overwrite.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<(), ApiError> {
        let payload = self.api.get_cart().await.inspect_err(|e| {
            warn!(error = %e, "cart fetch failed; keeping local snapshot");
        })?;

        self.store.replace(CartSnapshot::from_items(payload.items));
        debug!("cart reconciled from server");
        Ok(())
    }

    /// Create or update the line item for a dish.
    ///
    /// A quantity of zero is equivalent to [`remove`](Self::remove). On
    /// success the store is replaced with the *server's* item list, not the
    /// locally proposed one - the server is the source of truth for
    /// validated quantities.
    ///
    /// # Errors
    ///
    /// On failure the store is unchanged; no optimistic state survives a
    /// failed round trip, so the local cart cannot silently diverge from
    /// billed state.
    #[instrument(skip(self), fields(dish_id = %dish_id, quantity))]
    pub async fn upsert(
        &self,
        dish_id: DishId,
        unit_price: Money,
        quantity: u32,
    ) -> Result<(), ApiError> {
        if quantity == 0 {
            return self.remove(&dish_id).await;
        }

        let item = CartLineItem {
            dish_id,
            unit_price,
            quantity,
        };
        let payload = self.api.upsert_item(&item).await.inspect_err(|e| {
            warn!(error = %e, "cart upsert failed; keeping local snapshot");
        })?;

        self.store.replace(CartSnapshot::from_items(payload.items));
        Ok(())
    }

    /// Remove the line item for a dish.
    ///
    /// # Errors
    ///
    /// On failure the store is unchanged.
    #[instrument(skip(self), fields(dish_id = %dish_id))]
    pub async fn remove(&self, dish_id: &DishId) -> Result<(), ApiError> {
        let payload = self.api.delete_item(dish_id).await.inspect_err(|e| {
            warn!(error = %e, "cart remove failed; keeping local snapshot");
        })?;

        self.store.replace(CartSnapshot::from_items(payload.items));
        Ok(())
    }

    /// Clear the whole cart.
    ///
    /// # Errors
    ///
    /// On failure the store is unchanged.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), ApiError> {
        let payload = self.api.clear_cart().await.inspect_err(|e| {
            warn!(error = %e, "cart clear failed; keeping local snapshot");
        })?;

        self.store.replace(CartSnapshot::from_items(payload.items));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::CartPayload;
    use std::sync::Mutex;

    /// Scriptable fake cart service: pops one queued response per call.
    struct FakeCartApi {
        responses: Mutex<Vec<Result<CartPayload, ApiError>>>,
    }

    impl FakeCartApi {
        fn with(responses: Vec<Result<CartPayload, ApiError>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }

        fn next(&self) -> Result<CartPayload, ApiError> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .expect("fake cart api: no response queued")
        }
    }

    impl CartApi for &FakeCartApi {
        async fn get_cart(&self) -> Result<CartPayload, ApiError> {
            self.next()
        }

        async fn upsert_item(&self, _item: &CartLineItem) -> Result<CartPayload, ApiError> {
            self.next()
        }

        async fn delete_item(&self, _dish_id: &DishId) -> Result<CartPayload, ApiError> {
            self.next()
        }

        async fn clear_cart(&self) -> Result<CartPayload, ApiError> {
            self.next()
        }
    }

    fn line(id: &str, price: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            dish_id: DishId::new(id),
            unit_price: Money::new(price),
            quantity,
        }
    }

    fn network_failure() -> ApiError {
        ApiError::Parse("connection reset".to_string())
    }

    #[tokio::test]
    async fn test_fetch_all_replaces_store() {
        let api = FakeCartApi::with(vec![Ok(CartPayload {
            items: vec![line("a", 1200, 2)],
        })]);
        let engine = CartSyncEngine::new(&api, CartStore::new());

        engine.fetch_all().await.unwrap();
        assert_eq!(engine.store().current().total_quantity(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_prior_snapshot() {
        let api = FakeCartApi::with(vec![
            Ok(CartPayload {
                items: vec![line("a", 1200, 2)],
            }),
            Err(network_failure()),
        ]);
        let engine = CartSyncEngine::new(&api, CartStore::new());

        engine.fetch_all().await.unwrap();
        let before = engine.store().current();

        assert!(engine.fetch_all().await.is_err());
        assert_eq!(engine.store().current(), before);
    }

    #[tokio::test]
    async fn test_upsert_uses_server_items_not_local_proposal() {
        // Server caps the quantity at 3; the store must reflect that, not
        // the requested 10.
        let api = FakeCartApi::with(vec![Ok(CartPayload {
            items: vec![line("a", 500, 3)],
        })]);
        let engine = CartSyncEngine::new(&api, CartStore::new());

        engine
            .upsert(DishId::new("a"), Money::new(500), 10)
            .await
            .unwrap();
        assert_eq!(
            engine.store().line_for(&DishId::new("a")).unwrap().quantity,
            3
        );
    }

    #[tokio::test]
    async fn test_repeated_upsert_converges_to_one_line() {
        let api = FakeCartApi::with(vec![
            Ok(CartPayload {
                items: vec![line("dishA", 500, 3)],
            }),
            Ok(CartPayload {
                items: vec![line("dishA", 500, 5)],
            }),
        ]);
        let engine = CartSyncEngine::new(&api, CartStore::new());

        engine
            .upsert(DishId::new("dishA"), Money::new(500), 3)
            .await
            .unwrap();
        engine
            .upsert(DishId::new("dishA"), Money::new(500), 5)
            .await
            .unwrap();

        let snapshot = engine.store().current();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot.line_for(&DishId::new("dishA")).unwrap().quantity,
            5
        );
    }

    #[tokio::test]
    async fn test_upsert_zero_quantity_is_remove() {
        // The only queued response answers delete_item; a POST would panic
        // the fake with an unexpected second call.
        let api = FakeCartApi::with(vec![Ok(CartPayload { items: vec![] })]);
        let engine = CartSyncEngine::new(&api, CartStore::new());

        engine
            .upsert(DishId::new("a"), Money::new(500), 0)
            .await
            .unwrap();
        assert!(engine.store().current().is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_store_bit_for_bit_equal() {
        let api = FakeCartApi::with(vec![
            Ok(CartPayload {
                items: vec![line("a", 1200, 2), line("b", 300, 1)],
            }),
            Err(network_failure()),
            Err(network_failure()),
            Err(network_failure()),
        ]);
        let engine = CartSyncEngine::new(&api, CartStore::new());

        engine.fetch_all().await.unwrap();
        let before = engine.store().current();

        assert!(
            engine
                .upsert(DishId::new("c"), Money::new(900), 1)
                .await
                .is_err()
        );
        assert_eq!(engine.store().current(), before);

        assert!(engine.remove(&DishId::new("a")).await.is_err());
        assert_eq!(engine.store().current(), before);

        assert!(engine.clear().await.is_err());
        assert_eq!(engine.store().current(), before);
    }

    #[tokio::test]
    async fn test_clear_empties_store_on_success() {
        let api = FakeCartApi::with(vec![
            Ok(CartPayload {
                items: vec![line("a", 1200, 2)],
            }),
            Ok(CartPayload { items: vec![] }),
        ]);
        let engine = CartSyncEngine::new(&api, CartStore::new());

        engine.fetch_all().await.unwrap();
        engine.clear().await.unwrap();
        assert!(engine.store().current().is_empty());
    }
}
