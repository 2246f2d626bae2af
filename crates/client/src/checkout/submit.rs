//! Order submission coordinator.
//!
//! [`CheckoutFlow`] owns the session, the cart engine and the order
//! service for one checkout attempt, and serializes the submit: exactly
//! one order-creation call per trip through `Submitting`, no matter how
//! many times the UI asks.

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use chopwell_core::OrderStatus;

use super::machine::CheckoutError;
use super::session::{CheckoutSession, CheckoutStage};
use crate::api::{ApiError, CartApi, Order, OrderApi, PendingOrder};
use crate::cart::CartSyncEngine;
use crate::pricing::{self, PricingConfig, Quote};

/// Why a submission attempt was refused or failed.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The session refused the transition (validation or double submit).
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Submission only makes sense from the payment step.
    #[error("cannot submit from the {0:?} stage")]
    NotAtPayment(CheckoutStage),

    /// There is nothing to order.
    #[error("cannot submit an empty cart")]
    EmptyCart,

    /// The order service declined or the request failed in transit. The
    /// session is back at the payment step for a retry.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// How a successful submission left the world.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Order placed and the cart cleared.
    Placed { order: Order },

    /// Order placed, but clearing the cart afterwards failed. The order is
    /// real and will be fulfilled; the local and remote carts still hold
    /// the purchased items until the next successful cart sync.
    PlacedCartStale { order: Order, clear_error: ApiError },
}

impl SubmitOutcome {
    /// The placed order, whichever way the cleanup went.
    #[must_use]
    pub const fn order(&self) -> &Order {
        match self {
            Self::Placed { order } | Self::PlacedCartStale { order, .. } => order,
        }
    }

    /// Whether the post-submit cart clear succeeded.
    #[must_use]
    pub const fn cart_cleared(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

/// What a call to [`CheckoutFlow::advance`] did.
#[derive(Debug)]
pub enum AdvanceOutcome {
    /// Moved to the next step.
    Stepped(CheckoutStage),

    /// The payment step was confirmed and the order submitted.
    Placed(SubmitOutcome),
}

/// One checkout attempt over a live cart.
#[derive(Debug)]
pub struct CheckoutFlow<C, O> {
    session: CheckoutSession,
    cart: CartSyncEngine<C>,
    order_api: O,
    pricing: PricingConfig,
}

impl<C: CartApi, O: OrderApi> CheckoutFlow<C, O> {
    /// Start a checkout over the given cart engine and order service.
    #[must_use]
    pub fn new(cart: CartSyncEngine<C>, order_api: O, pricing: PricingConfig) -> Self {
        Self {
            session: CheckoutSession::new(),
            cart,
            order_api,
            pricing,
        }
    }

    /// The session, for rendering stage and fields.
    #[must_use]
    pub const fn session(&self) -> &CheckoutSession {
        &self.session
    }

    /// Mutable session access, for form field edits.
    pub const fn session_mut(&mut self) -> &mut CheckoutSession {
        &mut self.session
    }

    /// The cart engine this checkout is buying from.
    #[must_use]
    pub const fn cart(&self) -> &CartSyncEngine<C> {
        &self.cart
    }

    /// Price the live cart snapshot. Recomputed on demand so it always
    /// reflects the latest reconciled cart.
    #[must_use]
    pub fn quote(&self) -> Quote {
        pricing::quote(&self.cart.store().current(), &self.pricing)
    }

    /// Move the checkout forward one step. On the payment step this
    /// performs the submission.
    ///
    /// # Errors
    ///
    /// Validation failures and submission failures; see [`SubmitError`].
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, SubmitError> {
        if self.session.stage() == CheckoutStage::Payment {
            return self.submit().await.map(AdvanceOutcome::Placed);
        }
        let stage = self.session.advance()?;
        Ok(AdvanceOutcome::Stepped(stage))
    }

    /// Move the checkout back one step.
    ///
    /// # Errors
    ///
    /// Refused while submitting or after the session has finished.
    pub fn retreat(&mut self) -> Result<CheckoutStage, CheckoutError> {
        self.session.retreat()
    }

    /// Submit the order.
    ///
    /// Builds the order payload from the current cart snapshot and session,
    /// creates the order, then clears the cart. A failed creation returns
    /// the session to the payment step with the cart untouched; a failed
    /// clear after a successful creation still completes the checkout and
    /// reports [`SubmitOutcome::PlacedCartStale`].
    ///
    /// # Errors
    ///
    /// See [`SubmitError`]. Calling again while a submission is in flight
    /// is refused without touching the network.
    #[instrument(skip(self), fields(stage = ?self.session.stage()))]
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        match self.session.stage() {
            CheckoutStage::Payment => {}
            CheckoutStage::Submitting => return Err(CheckoutError::Submitting.into()),
            other => return Err(SubmitError::NotAtPayment(other)),
        }

        let snapshot = self.cart.store().current();
        if snapshot.is_empty() {
            return Err(SubmitError::EmptyCart);
        }

        // Validates payment fields and enters Submitting
        self.session.advance()?;

        let quote = pricing::quote(&snapshot, &self.pricing);
        let pending = PendingOrder {
            items: snapshot.to_items(),
            total_amount: quote.total,
            status: OrderStatus::Pending,
            contact_details: self.session.delivery.contact.trim().to_string(),
            delivery_address: self.session.delivery.address.trim().to_string(),
            instructions: self.session.delivery.instructions.clone(),
            payment_method: self.session.payment_method,
        };

        let order = match self.order_api.create_order(&pending).await {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "order submission failed; returning to payment step");
                self.session.fail_submit();
                return Err(e.into());
            }
        };

        info!(order_id = %order.id, total = %order.total_amount, "order placed");

        match self.cart.clear().await {
            Ok(()) => {
                self.session.complete();
                Ok(SubmitOutcome::Placed { order })
            }
            Err(clear_error) => {
                // The order exists server-side; this is a cleanup failure,
                // not a submission failure.
                error!(
                    order_id = %order.id,
                    error = %clear_error,
                    "order placed but cart clear failed; cart is stale until next sync"
                );
                self.session.complete();
                Ok(SubmitOutcome::PlacedCartStale { order, clear_error })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::CartPayload;
    use crate::cart::{CartLineItem, CartSnapshot, CartStore};
    use chopwell_core::{DishId, Money, OrderId, PaymentMethod};
    use std::sync::Mutex;

    struct FakeCartApi {
        clear_responses: Mutex<Vec<Result<CartPayload, ApiError>>>,
    }

    impl FakeCartApi {
        fn clearing(responses: Vec<Result<CartPayload, ApiError>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                clear_responses: Mutex::new(responses),
            }
        }
    }

    impl CartApi for &FakeCartApi {
        async fn get_cart(&self) -> Result<CartPayload, ApiError> {
            unimplemented!("not exercised by checkout")
        }

        async fn upsert_item(&self, _item: &CartLineItem) -> Result<CartPayload, ApiError> {
            unimplemented!("not exercised by checkout")
        }

        async fn delete_item(&self, _dish_id: &DishId) -> Result<CartPayload, ApiError> {
            unimplemented!("not exercised by checkout")
        }

        async fn clear_cart(&self) -> Result<CartPayload, ApiError> {
            self.clear_responses
                .lock()
                .unwrap()
                .pop()
                .expect("fake cart api: no clear response queued")
        }
    }

    struct FakeOrderApi {
        responses: Mutex<Vec<Result<Order, ApiError>>>,
        calls: Mutex<u32>,
    }

    impl FakeOrderApi {
        fn with(responses: Vec<Result<Order, ApiError>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl OrderApi for &FakeOrderApi {
        async fn create_order(&self, order: &PendingOrder) -> Result<Order, ApiError> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop()
                .expect("fake order api: no response queued")
                .map(|mut placed| {
                    placed.total_amount = order.total_amount;
                    placed
                })
        }

        async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
            unimplemented!("not exercised by checkout")
        }

        async fn get_order(&self, _id: &OrderId) -> Result<Order, ApiError> {
            unimplemented!("not exercised by checkout")
        }
    }

    fn placed_order() -> Order {
        Order {
            id: OrderId::new("ord-1"),
            items: vec![],
            total_amount: Money::ZERO,
            status: OrderStatus::Pending,
            contact_details: "0801 234 5678".to_string(),
            delivery_address: "12 Awolowo Road, Lekki".to_string(),
            instructions: None,
            payment_method: PaymentMethod::CashOnDelivery,
            created_at: None,
            updated_at: None,
        }
    }

    fn line(id: &str, price: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            dish_id: DishId::new(id),
            unit_price: Money::new(price),
            quantity,
        }
    }

    fn flow_at_payment<'a>(
        cart_api: &'a FakeCartApi,
        order_api: &'a FakeOrderApi,
    ) -> CheckoutFlow<&'a FakeCartApi, &'a FakeOrderApi> {
        let store = CartStore::new();
        store.replace(CartSnapshot::from_items(vec![
            line("dishA", 1200, 2),
            line("dishB", 300, 1),
        ]));

        let mut flow = CheckoutFlow::new(
            CartSyncEngine::new(cart_api, store),
            order_api,
            PricingConfig::default(),
        );
        flow.session_mut().delivery.contact = "0801 234 5678".to_string();
        flow.session_mut().delivery.address = "12 Awolowo Road, Lekki".to_string();
        flow.session_mut().advance().unwrap();
        flow.session_mut().advance().unwrap();
        flow
    }

    #[tokio::test]
    async fn test_submit_places_order_and_clears_cart() {
        let cart_api = FakeCartApi::clearing(vec![Ok(CartPayload { items: vec![] })]);
        let order_api = FakeOrderApi::with(vec![Ok(placed_order())]);
        let mut flow = flow_at_payment(&cart_api, &order_api);

        let outcome = flow.submit().await.unwrap();
        assert!(outcome.cart_cleared());
        // Total priced from the snapshot: 2700 + 300 fee + 135 tax
        assert_eq!(outcome.order().total_amount, Money::new(3135));
        assert_eq!(flow.session().stage(), CheckoutStage::Completed);
        assert!(flow.cart().store().current().is_empty());
    }

    #[tokio::test]
    async fn test_advance_at_payment_submits() {
        let cart_api = FakeCartApi::clearing(vec![Ok(CartPayload { items: vec![] })]);
        let order_api = FakeOrderApi::with(vec![Ok(placed_order())]);
        let mut flow = flow_at_payment(&cart_api, &order_api);

        match flow.advance().await.unwrap() {
            AdvanceOutcome::Placed(outcome) => assert!(outcome.cart_cleared()),
            AdvanceOutcome::Stepped(stage) => panic!("expected submission, stepped to {stage:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_creation_returns_to_payment_with_cart_intact() {
        let cart_api = FakeCartApi::clearing(vec![]);
        let order_api = FakeOrderApi::with(vec![Err(ApiError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })]);
        let mut flow = flow_at_payment(&cart_api, &order_api);
        let before = flow.cart().store().current();

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::Api(_)));
        assert_eq!(flow.session().stage(), CheckoutStage::Payment);
        assert_eq!(flow.cart().store().current(), before);
    }

    #[tokio::test]
    async fn test_failed_clear_still_completes_with_stale_cart() {
        let cart_api = FakeCartApi::clearing(vec![Err(ApiError::Parse(
            "connection reset".to_string(),
        ))]);
        let order_api = FakeOrderApi::with(vec![Ok(placed_order())]);
        let mut flow = flow_at_payment(&cart_api, &order_api);

        let outcome = flow.submit().await.unwrap();
        assert!(!outcome.cart_cleared());
        assert!(matches!(outcome, SubmitOutcome::PlacedCartStale { .. }));
        assert_eq!(flow.session().stage(), CheckoutStage::Completed);
        // The purchased items are still in the cart until the next sync
        assert!(!flow.cart().store().current().is_empty());
    }

    #[tokio::test]
    async fn test_second_submit_after_completion_is_refused_without_network() {
        let cart_api = FakeCartApi::clearing(vec![Ok(CartPayload { items: vec![] })]);
        let order_api = FakeOrderApi::with(vec![Ok(placed_order())]);
        let mut flow = flow_at_payment(&cart_api, &order_api);

        flow.submit().await.unwrap();
        let err = flow.submit().await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::NotAtPayment(CheckoutStage::Completed)
        ));
        assert_eq!(order_api.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_card_blocks_submission() {
        let cart_api = FakeCartApi::clearing(vec![]);
        let order_api = FakeOrderApi::with(vec![]);
        let mut flow = flow_at_payment(&cart_api, &order_api);
        flow.session_mut().payment_method = PaymentMethod::Card;
        flow.session_mut().card.number = "4111".to_string();

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Checkout(CheckoutError::InvalidCardNumber)
        ));
        assert_eq!(flow.session().stage(), CheckoutStage::Payment);
        assert_eq!(order_api.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_cart_cannot_submit() {
        let cart_api = FakeCartApi::clearing(vec![]);
        let order_api = FakeOrderApi::with(vec![]);
        let store = CartStore::new();
        let mut flow = CheckoutFlow::new(
            CartSyncEngine::new(&cart_api, store),
            &order_api,
            PricingConfig::default(),
        );
        flow.session_mut().delivery.contact = "0801 234 5678".to_string();
        flow.session_mut().delivery.address = "12 Awolowo Road".to_string();
        flow.session_mut().advance().unwrap();
        flow.session_mut().advance().unwrap();

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::EmptyCart));
        assert_eq!(flow.session().stage(), CheckoutStage::Payment);
    }

    #[tokio::test]
    async fn test_quote_tracks_live_cart() {
        let cart_api = FakeCartApi::clearing(vec![]);
        let order_api = FakeOrderApi::with(vec![]);
        let flow = flow_at_payment(&cart_api, &order_api);

        let quote = flow.quote();
        assert_eq!(quote.subtotal, Money::new(2700));
        assert_eq!(quote.total, Money::new(3135));

        flow.cart()
            .store()
            .replace(CartSnapshot::from_items(vec![line("dishA", 3500, 1)]));
        assert_eq!(flow.quote().delivery_fee, Money::new(200));
    }
}
