//! Error types for the cart subsystem.
//!
//! Cart mutations themselves never error (see [`crate::store`]); these
//! types cover the boundaries that can fail: configuration at startup,
//! storage round-trips, and order submission at checkout. Storage errors
//! are absorbed inside the session layer and only ever reach logs.

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storage round-trip failure.
///
/// Never propagated past the session boundary: loads degrade to an empty
/// collection, save failures leave the in-memory state authoritative.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Order submission failure at checkout.
///
/// Surfaced to the caller as-is; the cart is left untouched and the user
/// may retry manually. There is no automatic retry.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Order service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Order service rejected the order: HTTP {0}")]
    Rejected(reqwest::StatusCode),

    #[error("Cannot check out an empty cart")]
    EmptyCart,
}
