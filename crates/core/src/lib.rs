//! Tangerine Core - Shared types library.
//!
//! This crate provides common types used across all Tangerine components:
//! - `cart` - Shopping cart subsystem (line items, persistence, checkout)
//! - `cli` - Command-line tools for inspecting and mutating the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! storage access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
