//! Integration tests for the Chopwell client.
//!
//! The tests drive the real stores, engines and checkout flow against
//! [`FakeBackend`], an in-memory stand-in for the ordering service that
//! mirrors its contract: every cart mutation answers with the full
//! authoritative cart, favorites toggles answer with the full set, and
//! order creation appends to a server-side history.
//!
//! Failures are injected per endpoint with [`FakeBackend::fail_next`], so
//! each test scripts exactly the fault it is about.

// Test support: panicking on a poisoned lock or a misconfigured fake is
// the right behavior here.
#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(async_fn_in_trait)]

use std::collections::BTreeSet;
use std::sync::Mutex;

use chopwell_client::api::{
    ApiError, CartApi, CartPayload, FavoritesApi, FavoritesPayload, Order, OrderApi, PendingOrder,
};
use chopwell_client::cart::CartLineItem;
use chopwell_core::{DishId, OrderId};

/// An endpoint of the fake ordering service, for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    GetCart,
    UpsertItem,
    DeleteItem,
    ClearCart,
    CreateOrder,
    ListOrders,
    GetOrder,
    ToggleFavorite,
}

#[derive(Default)]
struct BackendState {
    cart: Vec<CartLineItem>,
    favorites: BTreeSet<DishId>,
    orders: Vec<Order>,
    next_order: u64,
    armed_failures: Vec<Endpoint>,
}

/// In-memory ordering service with the same contract as the real one.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the server-side cart directly, bypassing the client.
    pub fn seed_cart(&self, items: Vec<CartLineItem>) {
        self.state.lock().unwrap().cart = items;
    }

    /// Seed the server-side favorites directly.
    pub fn seed_favorites(&self, dishes: impl IntoIterator<Item = DishId>) {
        self.state.lock().unwrap().favorites = dishes.into_iter().collect();
    }

    /// Arm a one-shot failure: the next call to `endpoint` fails, then the
    /// endpoint behaves normally again.
    pub fn fail_next(&self, endpoint: Endpoint) {
        self.state.lock().unwrap().armed_failures.push(endpoint);
    }

    /// The server-side cart, for asserting what the client never sees.
    #[must_use]
    pub fn server_cart(&self) -> Vec<CartLineItem> {
        self.state.lock().unwrap().cart.clone()
    }

    /// The server-side order history, newest first.
    #[must_use]
    pub fn server_orders(&self) -> Vec<Order> {
        self.state.lock().unwrap().orders.clone()
    }

    fn check_failure(state: &mut BackendState, endpoint: Endpoint) -> Result<(), ApiError> {
        if let Some(pos) = state.armed_failures.iter().position(|&e| e == endpoint) {
            state.armed_failures.remove(pos);
            return Err(ApiError::Api {
                status: 503,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl CartApi for &FakeBackend {
    async fn get_cart(&self) -> Result<CartPayload, ApiError> {
        let mut state = self.state.lock().unwrap();
        FakeBackend::check_failure(&mut state, Endpoint::GetCart)?;
        Ok(CartPayload {
            items: state.cart.clone(),
        })
    }

    async fn upsert_item(&self, item: &CartLineItem) -> Result<CartPayload, ApiError> {
        let mut state = self.state.lock().unwrap();
        FakeBackend::check_failure(&mut state, Endpoint::UpsertItem)?;

        // Set semantics: the submitted quantity replaces any prior line
        if let Some(existing) = state
            .cart
            .iter_mut()
            .find(|line| line.dish_id == item.dish_id)
        {
            *existing = item.clone();
        } else {
            state.cart.push(item.clone());
        }
        Ok(CartPayload {
            items: state.cart.clone(),
        })
    }

    async fn delete_item(&self, dish_id: &DishId) -> Result<CartPayload, ApiError> {
        let mut state = self.state.lock().unwrap();
        FakeBackend::check_failure(&mut state, Endpoint::DeleteItem)?;
        state.cart.retain(|line| line.dish_id != *dish_id);
        Ok(CartPayload {
            items: state.cart.clone(),
        })
    }

    async fn clear_cart(&self) -> Result<CartPayload, ApiError> {
        let mut state = self.state.lock().unwrap();
        FakeBackend::check_failure(&mut state, Endpoint::ClearCart)?;
        state.cart.clear();
        Ok(CartPayload { items: vec![] })
    }
}

impl OrderApi for &FakeBackend {
    async fn create_order(&self, order: &PendingOrder) -> Result<Order, ApiError> {
        let mut state = self.state.lock().unwrap();
        FakeBackend::check_failure(&mut state, Endpoint::CreateOrder)?;

        state.next_order += 1;
        let placed = Order {
            id: OrderId::new(format!("ord-{}", state.next_order)),
            items: order.items.clone(),
            total_amount: order.total_amount,
            status: order.status,
            contact_details: order.contact_details.clone(),
            delivery_address: order.delivery_address.clone(),
            instructions: order.instructions.clone(),
            payment_method: order.payment_method,
            created_at: None,
            updated_at: None,
        };
        state.orders.insert(0, placed.clone());
        Ok(placed)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let mut state = self.state.lock().unwrap();
        FakeBackend::check_failure(&mut state, Endpoint::ListOrders)?;
        Ok(state.orders.clone())
    }

    async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let mut state = self.state.lock().unwrap();
        FakeBackend::check_failure(&mut state, Endpoint::GetOrder)?;
        state
            .orders
            .iter()
            .find(|order| order.id == *id)
            .cloned()
            .ok_or_else(|| ApiError::Api {
                status: 404,
                message: format!("no order {id}"),
            })
    }
}

impl FavoritesApi for &FakeBackend {
    async fn toggle_favorite(&self, dish_id: &DishId) -> Result<FavoritesPayload, ApiError> {
        let mut state = self.state.lock().unwrap();
        FakeBackend::check_failure(&mut state, Endpoint::ToggleFavorite)?;

        if !state.favorites.remove(dish_id) {
            state.favorites.insert(dish_id.clone());
        }
        Ok(FavoritesPayload {
            favorites: state.favorites.iter().cloned().collect(),
        })
    }
}

/// A cart line for test setup.
#[must_use]
pub fn line(id: &str, price: i64, quantity: u32) -> CartLineItem {
    CartLineItem {
        dish_id: DishId::new(id),
        unit_price: chopwell_core::Money::new(price),
        quantity,
    }
}
