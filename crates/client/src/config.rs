//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CHOPWELL_API_BASE_URL` - Base URL of the ordering service
//!
//! ## Optional
//! - `CHOPWELL_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: 10)
//! - `CHOPWELL_DELIVERY_FEE_THRESHOLD` - Subtotal above which the reduced
//!   delivery fee applies (default: 3000)
//! - `CHOPWELL_DELIVERY_FEE_REDUCED` - Delivery fee above the threshold
//!   (default: 200)
//! - `CHOPWELL_DELIVERY_FEE_STANDARD` - Delivery fee at or below the
//!   threshold (default: 300)
//! - `CHOPWELL_TAX_RATE_BPS` - Tax rate in basis points (default: 500, i.e. 5%)
//!
//! The session credential is NOT configuration; the auth collaborator hands
//! it to [`crate::api::ApiClient::new`] directly.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use chopwell_core::Money;

use crate::pricing::PricingConfig;

/// Default per-request timeout, matching the app shell's historical value.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Ordering service endpoint configuration.
    pub api: ApiConfig,
    /// Pricing policy (delivery fee tiers, tax rate).
    pub pricing: PricingConfig,
}

/// Ordering service endpoint configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the ordering service (e.g. `https://api.chopwell.app`).
    pub base_url: Url,
    /// Bounded timeout applied to every remote call. A timeout surfaces as
    /// a network failure and is treated like any other failure.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            api: ApiConfig::from_env()?,
            pricing: PricingConfig {
                reduced_fee_threshold: Money::new(parse_env_or(
                    "CHOPWELL_DELIVERY_FEE_THRESHOLD",
                    3000,
                )?),
                reduced_delivery_fee: Money::new(parse_env_or(
                    "CHOPWELL_DELIVERY_FEE_REDUCED",
                    200,
                )?),
                standard_delivery_fee: Money::new(parse_env_or(
                    "CHOPWELL_DELIVERY_FEE_STANDARD",
                    300,
                )?),
                tax_rate_bps: parse_env_or("CHOPWELL_TAX_RATE_BPS", 500)?,
            },
        })
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("CHOPWELL_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CHOPWELL_API_BASE_URL".to_string(), e.to_string())
            })?;
        let timeout_secs = parse_env_or("CHOPWELL_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
