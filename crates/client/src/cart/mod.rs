//! Cart state and synchronization.
//!
//! The [`CartStore`] is the client-side authority for "what the user
//! intends to buy"; the [`CartSyncEngine`] keeps it consistent with the
//! server-authoritative cart through wholesale replacement.

mod store;
mod sync;

pub use store::{CartLineItem, CartSnapshot, CartStore};
pub use sync::CartSyncEngine;
