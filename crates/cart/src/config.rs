//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TANGERINE_ORDER_URL` - Order service endpoint for checkout submission
//!
//! ## Optional
//! - `TANGERINE_CART_PATH` - Path of the persisted cart file (absent: the
//!   session runs in memory only)
//! - `TANGERINE_ORDER_TOKEN` - Bearer token for the order service
//! - `TANGERINE_FLAT_SHIPPING` - Flat shipping rate (default: 5.00)

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use url::Url;

use crate::error::ConfigError;

/// Flat shipping rate applied when `TANGERINE_FLAT_SHIPPING` is unset.
#[must_use]
pub fn default_flat_shipping() -> Decimal {
    Decimal::new(500, 2)
}

/// Cart subsystem configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Persisted cart file; `None` means memory-only.
    pub cart_path: Option<PathBuf>,
    /// Order service endpoint.
    pub order_url: Url,
    /// Bearer token for the order service, if it requires one.
    pub order_token: Option<SecretString>,
    /// Flat shipping rate added to every order.
    pub flat_shipping: Decimal,
}

impl CartConfig {
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

        let order_url = required("TANGERINE_ORDER_URL")?;
        let order_url = Url::parse(&order_url).map_err(|err| {
            ConfigError::InvalidEnvVar("TANGERINE_ORDER_URL".to_owned(), err.to_string())
        })?;

        let cart_path = optional("TANGERINE_CART_PATH").map(PathBuf::from);
        let order_token = optional("TANGERINE_ORDER_TOKEN").map(SecretString::from);

        let flat_shipping = match optional("TANGERINE_FLAT_SHIPPING") {
            Some(raw) => Decimal::from_str(&raw).map_err(|err| {
                ConfigError::InvalidEnvVar("TANGERINE_FLAT_SHIPPING".to_owned(), err.to_string())
            })?,
            None => default_flat_shipping(),
        };

        Ok(Self {
            cart_path,
            order_url,
            order_token,
            flat_shipping,
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
