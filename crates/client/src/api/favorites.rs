//! Remote favorites endpoint.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use chopwell_core::DishId;

use super::{ApiClient, ApiError};

/// The server's authoritative favorites set, returned by every toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesPayload {
    pub favorites: Vec<DishId>,
}

/// Remote favorites service contract.
pub trait FavoritesApi {
    /// Flip a dish in or out of the user's favorites and return the
    /// resulting set. The server decides the outcome; a concurrent change
    /// from another device may make it differ from the local guess.
    async fn toggle_favorite(&self, dish_id: &DishId) -> Result<FavoritesPayload, ApiError>;
}

impl FavoritesApi for ApiClient {
    #[instrument(skip(self), fields(dish_id = %dish_id))]
    async fn toggle_favorite(&self, dish_id: &DishId) -> Result<FavoritesPayload, ApiError> {
        self.put(&format!("/users/favorites/{dish_id}")).await
    }
}
