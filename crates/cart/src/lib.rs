//! Tangerine Cart - Shopping cart subsystem.
//!
//! This crate owns the canonical cart state for a storefront session:
//! an ordered collection of line items with stock-aware quantity mutation,
//! derived aggregates (item count, monetary subtotal), durable persistence,
//! and checkout-total computation.
//!
//! # Architecture
//!
//! - [`line_item`] - Line items, inbound catalog snapshots, quantity clamping
//! - [`store`] - The canonical in-memory cart collection and its mutations
//! - [`persistence`] - Durable round-trip of the collection ([`CartStorage`])
//! - [`session`] - The single shared access surface with observer
//!   notification ([`CartSession`])
//! - [`checkout`] - Flat-rate shipping, order payload, order service client
//! - [`config`] - Environment-variable configuration
//!
//! # Failure policy
//!
//! Cart mutations never fail: invalid inputs (add beyond stock, remove of an
//! absent item) degrade to no-ops, and persistence failures are absorbed at
//! the storage boundary with the in-memory state remaining authoritative.
//! The only errors surfaced to callers are configuration errors at startup
//! and order-submission failures at checkout.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod line_item;
pub mod persistence;
pub mod session;
pub mod store;

pub use checkout::{BillingDetails, CheckoutTotals, OrderClient, OrderPayload};
pub use config::CartConfig;
pub use error::{CheckoutError, ConfigError, PersistenceError};
pub use line_item::{LineItem, ProductSnapshot, clamp_quantity};
pub use persistence::{CartStorage, JsonFileStorage, MemoryStorage};
pub use session::{CartEvent, CartSession};
pub use store::{CartSnapshot, CartStore};
