//! Cart inspection and mutation commands.
//!
//! All commands operate on the cart file named by `TANGERINE_CART_PATH`,
//! the same file a storefront session persists to.

use thiserror::Error;

use tangerine_cart::{CartSession, JsonFileStorage, ProductSnapshot};
use tangerine_core::{CurrencyCode, Price, ProductId};

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
}

fn open_session() -> Result<CartSession, CartCommandError> {
    let _ = dotenvy::dotenv();
    let path = std::env::var("TANGERINE_CART_PATH")
        .map_err(|_| CartCommandError::MissingEnvVar("TANGERINE_CART_PATH"))?;
    Ok(CartSession::new(JsonFileStorage::new(path)))
}

/// Print the cart's line items and totals.
pub fn show() -> Result<(), CartCommandError> {
    let session = open_session()?;
    let items = session.items();
    if items.is_empty() {
        println!("Cart is empty");
        return Ok(());
    }
    for item in &items {
        let price = Price::new(item.unit_price, CurrencyCode::USD);
        println!(
            "{:>6}  {:<32} {:>3} x {:>10}",
            item.product_id.as_i64(),
            item.title,
            item.quantity,
            price.display(),
        );
    }
    let snapshot = session.snapshot();
    let subtotal = Price::new(snapshot.subtotal, CurrencyCode::USD);
    println!("{} items, subtotal {}", snapshot.count, subtotal.display());
    Ok(())
}

/// Add one unit of a product to the cart.
pub fn add(
    id: i64,
    title: String,
    price: String,
    stock: i64,
    image: Option<String>,
    category: Option<String>,
    description: Option<String>,
) -> Result<(), CartCommandError> {
    let session = open_session()?;
    let added = session.add(ProductSnapshot {
        product_id: ProductId::new(id),
        title,
        price_label: price,
        image,
        category,
        description,
        available_stock: stock,
    });
    if added {
        println!("Added product {id} ({} items in cart)", session.count());
    } else {
        println!("Product {id} not added (out of stock or at stock limit)");
    }
    Ok(())
}

/// Remove a line item from the cart.
pub fn remove(id: i64) -> Result<(), CartCommandError> {
    let session = open_session()?;
    if session.remove(ProductId::new(id)) {
        println!("Removed product {id}");
    } else {
        println!("Product {id} was not in the cart");
    }
    Ok(())
}

/// Set the quantity of a line item.
pub fn set(id: i64, quantity: i64, max: Option<u32>) -> Result<(), CartCommandError> {
    let session = open_session()?;
    if session.set_quantity(ProductId::new(id), quantity, max) {
        println!("Updated product {id} ({} items in cart)", session.count());
    } else {
        println!("No change for product {id}");
    }
    Ok(())
}

/// Empty the cart.
pub fn clear() -> Result<(), CartCommandError> {
    let session = open_session()?;
    session.clear();
    println!("Cart cleared");
    Ok(())
}
