//! Checkout stage transitions and validation gates.
//!
//! Advancing past a step validates that step's fields and nothing else;
//! retreating never validates. A session that is submitting refuses every
//! transition until the submit resolves, which is what makes double-taps on
//! the pay button harmless.

use thiserror::Error;

use chopwell_core::PaymentMethod;

use super::session::{CheckoutSession, CheckoutStage};

/// Minimum digits for a plausible card number. Full issuer validation is
/// the payment processor's job; this gate only catches obvious typos.
pub const MIN_CARD_NUMBER_LEN: usize = 12;

/// Minimum digits for a CVV.
pub const MIN_CVV_LEN: usize = 3;

/// A form field a [`CheckoutError`] points at, for inline UI highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    Contact,
    Address,
    CardNumber,
    CardHolder,
    CardExpiry,
    Cvv,
}

/// Why a stage transition was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("contact details are required")]
    MissingContact,

    #[error("delivery address is required")]
    MissingAddress,

    #[error("card number must have at least {MIN_CARD_NUMBER_LEN} digits")]
    InvalidCardNumber,

    #[error("card holder name is required")]
    MissingCardHolder,

    #[error("card expiry is required")]
    MissingCardExpiry,

    #[error("CVV must have at least {MIN_CVV_LEN} digits")]
    InvalidCvv,

    #[error("an order submission is already in progress")]
    Submitting,

    #[error("checkout has already finished")]
    Finished,
}

impl CheckoutError {
    /// The form field this error points at, if any.
    #[must_use]
    pub const fn field(&self) -> Option<CheckoutField> {
        match self {
            Self::MissingContact => Some(CheckoutField::Contact),
            Self::MissingAddress => Some(CheckoutField::Address),
            Self::InvalidCardNumber => Some(CheckoutField::CardNumber),
            Self::MissingCardHolder => Some(CheckoutField::CardHolder),
            Self::MissingCardExpiry => Some(CheckoutField::CardExpiry),
            Self::InvalidCvv => Some(CheckoutField::Cvv),
            Self::Submitting | Self::Finished => None,
        }
    }
}

impl CheckoutSession {
    /// Move forward one stage, validating the current step's fields.
    ///
    /// Advancing from `Payment` enters `Submitting`; the caller that
    /// drives the actual network submit is
    /// [`CheckoutFlow`](super::CheckoutFlow), which resolves `Submitting`
    /// to `Completed` or back to `Payment`.
    ///
    /// # Errors
    ///
    /// Returns the first failed validation for the current step, or
    /// [`CheckoutError::Submitting`] / [`CheckoutError::Finished`] when no
    /// transition is possible.
    pub fn advance(&mut self) -> Result<CheckoutStage, CheckoutError> {
        let next = match self.stage() {
            CheckoutStage::DeliverTo => {
                validate_delivery(self)?;
                CheckoutStage::Summary
            }
            CheckoutStage::Summary => CheckoutStage::Payment,
            CheckoutStage::Payment => {
                validate_payment(self)?;
                CheckoutStage::Submitting
            }
            CheckoutStage::Submitting => return Err(CheckoutError::Submitting),
            CheckoutStage::Completed | CheckoutStage::Cancelled => {
                return Err(CheckoutError::Finished);
            }
        };

        self.set_stage(next);
        Ok(next)
    }

    /// Move back one stage without validating anything. Backing out of the
    /// first step cancels the session.
    ///
    /// # Errors
    ///
    /// Refused while submitting or after the session has finished.
    pub fn retreat(&mut self) -> Result<CheckoutStage, CheckoutError> {
        let prev = match self.stage() {
            CheckoutStage::DeliverTo => CheckoutStage::Cancelled,
            CheckoutStage::Summary => CheckoutStage::DeliverTo,
            CheckoutStage::Payment => CheckoutStage::Summary,
            CheckoutStage::Submitting => return Err(CheckoutError::Submitting),
            CheckoutStage::Completed | CheckoutStage::Cancelled => {
                return Err(CheckoutError::Finished);
            }
        };

        self.set_stage(prev);
        Ok(prev)
    }

    /// Resolve an in-flight submission as placed.
    pub(crate) const fn complete(&mut self) {
        self.set_stage(CheckoutStage::Completed);
    }

    /// Resolve an in-flight submission as failed, returning to the payment
    /// step for a retry.
    pub(crate) const fn fail_submit(&mut self) {
        self.set_stage(CheckoutStage::Payment);
    }
}

fn validate_delivery(session: &CheckoutSession) -> Result<(), CheckoutError> {
    if session.delivery.contact.trim().is_empty() {
        return Err(CheckoutError::MissingContact);
    }
    if session.delivery.address.trim().is_empty() {
        return Err(CheckoutError::MissingAddress);
    }
    Ok(())
}

fn validate_payment(session: &CheckoutSession) -> Result<(), CheckoutError> {
    // Card fields only gate the card method; cash on delivery needs nothing
    if session.payment_method != PaymentMethod::Card {
        return Ok(());
    }

    if session.card.number.trim().len() < MIN_CARD_NUMBER_LEN {
        return Err(CheckoutError::InvalidCardNumber);
    }
    if session.card.holder_name.trim().is_empty() {
        return Err(CheckoutError::MissingCardHolder);
    }
    if session.card.expiry.trim().is_empty() {
        return Err(CheckoutError::MissingCardExpiry);
    }
    if session.card.cvv.trim().len() < MIN_CVV_LEN {
        return Err(CheckoutError::InvalidCvv);
    }
    Ok(())
}
