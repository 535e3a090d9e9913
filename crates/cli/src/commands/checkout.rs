//! Checkout commands: build the order payload and optionally submit it.
//!
//! # Environment Variables
//!
//! - `TANGERINE_ORDER_URL` - Order service endpoint
//! - `TANGERINE_CART_PATH` - Persisted cart file
//! - `TANGERINE_ORDER_TOKEN` - Optional bearer token
//! - `TANGERINE_FLAT_SHIPPING` - Optional flat rate override

use thiserror::Error;

use tangerine_cart::{
    BillingDetails, CartConfig, CartSession, CheckoutError, ConfigError, JsonFileStorage,
    OrderClient, OrderPayload,
};

/// Errors that can occur during checkout commands.
#[derive(Debug, Error)]
pub enum CheckoutCommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("No cart file configured (set TANGERINE_CART_PATH)")]
    NoCartPath,

    #[error("Payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Build the order payload from the persisted cart. With `dry_run`, print
/// it; otherwise submit it to the order service and clear the cart on
/// success.
pub async fn run(dry_run: bool) -> Result<(), CheckoutCommandError> {
    let config = CartConfig::from_env()?;
    let path = config.cart_path.clone().ok_or(CheckoutCommandError::NoCartPath)?;
    let session = CartSession::new(JsonFileStorage::new(path));

    let payload = OrderPayload::from_cart(
        &session.items(),
        BillingDetails::default(),
        config.flat_shipping,
    )?;

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let client = OrderClient::new(config.order_url.clone(), config.order_token.clone());
    client.submit(&payload).await?;
    // Only a successful submission empties the cart; on failure above the
    // `?` returns and the persisted cart is untouched for a retry.
    session.clear();
    println!("Order {} submitted, total {}", payload.reference, payload.total);
    Ok(())
}
