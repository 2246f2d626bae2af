//! Checkout: a three-step session, its transition rules, and the
//! submission coordinator that turns a confirmed payment step into a
//! placed order.
//!
//! Split the way the flow splits:
//! - [`session`]: what a checkout attempt holds ([`CheckoutSession`],
//!   stages, delivery and card fields)
//! - [`machine`]: how the stage is allowed to move (validation gates,
//!   [`CheckoutError`])
//! - [`submit`]: the one place that talks to the network
//!   ([`CheckoutFlow`], [`SubmitOutcome`])

mod machine;
mod session;
mod submit;

pub use machine::{CheckoutError, CheckoutField, MIN_CARD_NUMBER_LEN, MIN_CVV_LEN};
pub use session::{CardDetails, CheckoutSession, CheckoutStage, DeliveryDetails};
pub use submit::{AdvanceOutcome, CheckoutFlow, SubmitError, SubmitOutcome};
