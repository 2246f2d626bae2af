//! Read-only dish catalog with caching.
//!
//! The catalog never mutates from this client, so lookups are cached with a
//! short TTL. Cart and favorites responses are never cached - mutable state.

use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use chopwell_core::{DishId, Money};

use super::{ApiClient, ApiError};

/// How long a cached dish stays fresh.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Dish display data from the catalog, used to enrich cart line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    #[serde(rename = "_id")]
    pub id: DishId,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub restaurant: Option<String>,
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "desc")]
    pub description: Option<String>,
}

/// Remote dish catalog contract (read-only).
pub trait CatalogApi {
    /// Fetch a single dish by ID.
    async fn get_dish(&self, id: &DishId) -> Result<Dish, ApiError>;

    /// Fetch the full dish listing.
    async fn list_dishes(&self) -> Result<Vec<Dish>, ApiError>;
}

/// Caching catalog client.
///
/// Wraps the shared [`ApiClient`] with a 5-minute dish cache so the order
/// summary screen can resolve names for every line item without refetching.
#[derive(Clone)]
pub struct CatalogClient {
    api: ApiClient,
    cache: Cache<DishId, Dish>,
}

impl CatalogClient {
    /// Create a new catalog client over the shared API client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self { api, cache }
    }

    /// Drop all cached dishes.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl CatalogApi for CatalogClient {
    #[instrument(skip(self), fields(dish_id = %id))]
    async fn get_dish(&self, id: &DishId) -> Result<Dish, ApiError> {
        if let Some(dish) = self.cache.get(id).await {
            debug!("Cache hit for dish");
            return Ok(dish);
        }

        let dish: Dish = self.api.get(&format!("/dish/{id}")).await?;
        self.cache.insert(id.clone(), dish.clone()).await;
        Ok(dish)
    }

    #[instrument(skip(self))]
    async fn list_dishes(&self) -> Result<Vec<Dish>, ApiError> {
        let dishes: Vec<Dish> = self.api.get("/dish").await?;

        // Listings warm the per-dish cache for the detail screens
        for dish in &dishes {
            self.cache.insert(dish.id.clone(), dish.clone()).await;
        }

        Ok(dishes)
    }
}
