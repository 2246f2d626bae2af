//! Favorites state and synchronization.
//!
//! Same reconciliation discipline as the cart, applied to a set instead of
//! keyed line items - with one twist: the toggle is optimistic. The local
//! set flips immediately for instant UI feedback, then the server's answer
//! replaces it wholesale. If the call fails, the retained pre-toggle set is
//! restored; a guess is never left live past a failed round trip.

use std::collections::BTreeSet;

use tokio::sync::watch;
use tracing::{instrument, warn};

use chopwell_core::DishId;

use crate::api::{ApiError, FavoritesApi};

/// The set of favorited dishes.
pub type FavoritesSet = BTreeSet<DishId>;

/// Client-side favorites authority. Cheaply cloneable; clones share state.
/// Only the [`FavoritesSyncEngine`] writes it.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    tx: watch::Sender<FavoritesSet>,
}

impl FavoritesStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(FavoritesSet::new());
        Self { tx }
    }

    /// The current set.
    #[must_use]
    pub fn current(&self) -> FavoritesSet {
        self.tx.borrow().clone()
    }

    /// Whether a dish is currently favorited.
    #[must_use]
    pub fn contains(&self, dish_id: &DishId) -> bool {
        self.tx.borrow().contains(dish_id)
    }

    /// Atomically swap in a new set and notify subscribers.
    pub fn replace(&self, set: FavoritesSet) {
        self.tx.send_replace(set);
    }

    /// Subscribe to set changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FavoritesSet> {
        self.tx.subscribe()
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the [`FavoritesStore`] from the remote favorites service.
#[derive(Debug, Clone)]
pub struct FavoritesSyncEngine<F> {
    api: F,
    store: FavoritesStore,
}

impl<F: FavoritesApi> FavoritesSyncEngine<F> {
    /// Create an engine over a favorites service and its store.
    pub const fn new(api: F, store: FavoritesStore) -> Self {
        Self { api, store }
    }

    /// The store this engine reconciles.
    #[must_use]
    pub const fn store(&self) -> &FavoritesStore {
        &self.store
    }

    /// Flip a dish in or out of the favorites.
    ///
    /// The local set is updated optimistically before the remote call. On
    /// success the server's returned set becomes authoritative (it may
    /// differ from the guess if another device changed it concurrently).
    ///
    /// # Errors
    ///
    /// On failure the pre-toggle set is restored and the error surfaced.
    #[instrument(skip(self), fields(dish_id = %dish_id))]
    pub async fn toggle(&self, dish_id: &DishId) -> Result<(), ApiError> {
        let previous = self.store.current();

        let mut optimistic = previous.clone();
        if !optimistic.remove(dish_id) {
            optimistic.insert(dish_id.clone());
        }
        self.store.replace(optimistic);

        match self.api.toggle_favorite(dish_id).await {
            Ok(payload) => {
                self.store.replace(payload.favorites.into_iter().collect());
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "favorite toggle failed; rolling back optimistic update");
                self.store.replace(previous);
                Err(e)
            }
        }
    }
}
