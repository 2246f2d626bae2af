//! Chopwell client core.
//!
//! This crate is the engine room of the Chopwell mobile app: everything
//! between the screens and the ordering service. It keeps a local,
//! UI-facing view of the user's cart and favorites consistent with the
//! server-authoritative record, and drives the multi-step checkout wizard
//! through to order submission.
//!
//! # Architecture
//!
//! - The ordering service owns the truth. Every cart and favorites mutation
//!   goes to the server, and the local store is replaced wholesale with the
//!   server's response - never patched field by field. A failed call leaves
//!   the local store exactly as it was.
//! - Stores publish through [`tokio::sync::watch`], so screens subscribe to
//!   snapshots instead of reaching into shared mutable state.
//! - The checkout wizard is a closed finite state machine; skipping steps is
//!   unrepresentable, and step gates return field-level errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use chopwell_client::api::ApiClient;
//! use chopwell_client::cart::{CartStore, CartSyncEngine};
//! use chopwell_client::checkout::CheckoutFlow;
//! use chopwell_client::config::ClientConfig;
//!
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::new(&config.api, &session_token)?;
//!
//! let cart = CartSyncEngine::new(api.clone(), CartStore::new());
//! cart.fetch_all().await?;
//! cart.upsert("dish-1".into(), Money::new(1200), 2).await?;
//!
//! let mut checkout = CheckoutFlow::new(cart.clone(), api, config.pricing);
//! checkout.session_mut().delivery.contact = "0801 234 5678".into();
//! checkout.session_mut().delivery.address = "12 Awolowo Road, Lekki".into();
//! checkout.advance().await?; // DeliverTo -> Summary
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
// Service traits are consumed generically by the engines; no dyn dispatch,
// no spawned futures, so the missing Send bound is not a concern.
#![allow(async_fn_in_trait)]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod favorites;
pub mod orders;
pub mod pricing;
pub mod telemetry;
