//! Checkout session state.

use chopwell_core::PaymentMethod;

/// Where the user is in the checkout flow.
///
/// `DeliverTo`, `Summary` and `Payment` are the three user-visible steps;
/// `Submitting` is `Payment` with the submit in flight; `Completed` and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    DeliverTo,
    Summary,
    Payment,
    Submitting,
    Completed,
    Cancelled,
}

impl CheckoutStage {
    /// Zero-based index of the user-visible step, `None` once terminal.
    /// Submitting still renders as the payment step.
    #[must_use]
    pub const fn step_index(self) -> Option<u8> {
        match self {
            Self::DeliverTo => Some(0),
            Self::Summary => Some(1),
            Self::Payment | Self::Submitting => Some(2),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Whether this stage is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Where and how the order should be delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryDetails {
    /// Phone number or other contact line for the rider.
    pub contact: String,
    pub address: String,
    /// Free-form note for the rider ("gate code 4411").
    pub instructions: Option<String>,
}

/// Card fields entered on the payment step.
///
/// Held only for the lifetime of the session and never serialized; the
/// submitted order carries the payment *method*, not the card.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    pub holder_name: String,
    pub expiry: String,
    pub cvv: String,
}

// Card number and CVV never reach logs, even at trace level.
impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &"[redacted]")
            .field("holder_name", &self.holder_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"[redacted]")
            .finish()
    }
}

/// One checkout attempt, from the delivery step through submission.
///
/// The stage only moves through [`advance`](Self::advance) and
/// [`retreat`](Self::retreat); fields are free-form until the gate that
/// validates them.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    stage: CheckoutStage,
    pub delivery: DeliveryDetails,
    pub payment_method: PaymentMethod,
    pub card: CardDetails,
}

impl CheckoutSession {
    /// Start a fresh session at the delivery step, defaulting to cash on
    /// delivery.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: CheckoutStage::DeliverTo,
            delivery: DeliveryDetails::default(),
            payment_method: PaymentMethod::CashOnDelivery,
            card: CardDetails::default(),
        }
    }

    /// The current stage.
    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        self.stage
    }

    /// Whether a submission is currently in flight.
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self.stage, CheckoutStage::Submitting)
    }

    /// Progress through the user-visible steps as a fraction in `[0, 1]`,
    /// `None` once terminal.
    #[must_use]
    pub fn progress(&self) -> Option<f32> {
        self.stage.step_index().map(|i| f32::from(i) / 2.0)
    }

    pub(crate) const fn set_stage(&mut self, stage: CheckoutStage) {
        self.stage = stage;
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_indices() {
        assert_eq!(CheckoutStage::DeliverTo.step_index(), Some(0));
        assert_eq!(CheckoutStage::Summary.step_index(), Some(1));
        assert_eq!(CheckoutStage::Payment.step_index(), Some(2));
        assert_eq!(CheckoutStage::Submitting.step_index(), Some(2));
        assert_eq!(CheckoutStage::Completed.step_index(), None);
        assert_eq!(CheckoutStage::Cancelled.step_index(), None);
    }

    #[test]
    fn test_new_session_defaults() {
        let session = CheckoutSession::new();
        assert_eq!(session.stage(), CheckoutStage::DeliverTo);
        assert_eq!(session.payment_method, PaymentMethod::CashOnDelivery);
        assert!(!session.is_processing());
    }

    #[test]
    fn test_card_debug_redacts_sensitive_fields() {
        let card = CardDetails {
            number: "4111111111111111".to_string(),
            holder_name: "Ada O.".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
        };
        let debug = format!("{card:?}");
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("123"));
        assert!(debug.contains("[redacted]"));
        assert!(debug.contains("Ada O."));
    }
}
