//! Pricing calculator: pure, deterministic derivations over a cart snapshot.
//!
//! Nothing here does I/O or holds state. Consumers recompute a [`Quote`]
//! from the live cart snapshot whenever the store notifies a replace.

use serde::{Deserialize, Serialize};

use chopwell_core::Money;

use crate::cart::CartSnapshot;

/// Delivery fee tiers and tax rate.
///
/// Policy values are configuration, not code; see
/// [`crate::config::ClientConfig::from_env`] for the environment knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Subtotal above which the reduced delivery fee applies.
    pub reduced_fee_threshold: Money,
    /// Delivery fee when the subtotal exceeds the threshold.
    pub reduced_delivery_fee: Money,
    /// Delivery fee otherwise.
    pub standard_delivery_fee: Money,
    /// Tax rate in basis points (500 = 5%).
    pub tax_rate_bps: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            reduced_fee_threshold: Money::new(3000),
            reduced_delivery_fee: Money::new(200),
            standard_delivery_fee: Money::new(300),
            tax_rate_bps: 500,
        }
    }
}

/// Derived pricing for a cart snapshot, surfaced to the UI at every
/// checkout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub tax: Money,
    pub total: Money,
}

impl Quote {
    /// The all-zero quote for an empty cart.
    pub const ZERO: Self = Self {
        subtotal: Money::ZERO,
        delivery_fee: Money::ZERO,
        tax: Money::ZERO,
        total: Money::ZERO,
    };
}

/// Sum of `unit_price x quantity` over all line items.
#[must_use]
pub fn subtotal(snapshot: &CartSnapshot) -> Money {
    snapshot
        .lines()
        .map(|line| line.unit_price * line.quantity)
        .sum()
}

/// Two-tier delivery fee: reduced above the threshold, standard otherwise.
#[must_use]
pub fn delivery_fee(subtotal: Money, config: &PricingConfig) -> Money {
    if subtotal > config.reduced_fee_threshold {
        config.reduced_delivery_fee
    } else {
        config.standard_delivery_fee
    }
}

/// Tax as a fixed percentage of the subtotal, rounded half-up to the
/// nearest whole currency unit.
#[must_use]
pub fn tax(subtotal: Money, config: &PricingConfig) -> Money {
    subtotal.apply_bps(config.tax_rate_bps)
}

/// Full quote for a snapshot. An empty cart quotes all zeros - no delivery
/// fee or tax on nothing.
#[must_use]
pub fn quote(snapshot: &CartSnapshot, config: &PricingConfig) -> Quote {
    if snapshot.is_empty() {
        return Quote::ZERO;
    }

    let subtotal = subtotal(snapshot);
    let delivery_fee = delivery_fee(subtotal, config);
    let tax = tax(subtotal, config);

    Quote {
        subtotal,
        delivery_fee,
        tax,
        total: subtotal + delivery_fee + tax,
    }
}
