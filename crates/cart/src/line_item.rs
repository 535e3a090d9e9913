//! Cart line items and the inbound catalog snapshot they are built from.
//!
//! A [`LineItem`] denormalizes display fields (title, image, category,
//! description) from the catalog snapshot at add time and never re-fetches
//! them afterwards. That is a deliberate trade-off for simplicity, not a
//! cache: a product renamed in the catalog keeps its old title in carts
//! that already hold it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tangerine_core::{Price, ProductId};
use tracing::debug;

/// A catalog product as consumed by the cart, snapshotted at add time.
///
/// This is the inbound shape from the catalog service; the cart never
/// mutates the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub product_id: ProductId,
    pub title: String,
    /// Display label for the price (e.g. `"$49.00"`). The numeric amount
    /// is derived via [`Price::parse_label`].
    pub price_label: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Sellable quantity known at snapshot time. Non-positive stock means
    /// the product cannot be added.
    pub available_stock: i64,
}

/// One distinct product held in the cart.
///
/// Serialized form matches the persisted cart record: `productId`,
/// `priceLabel`, `cartQuantity`, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub title: String,
    pub price_label: String,
    /// Parsed once at construction; malformed labels yield zero.
    pub unit_price: Decimal,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Always >= 1; a transition to zero or below removes the line item.
    #[serde(rename = "cartQuantity")]
    pub quantity: u32,
    /// Maximum sellable quantity known when the item was added or last
    /// updated. Used only to cap increases.
    pub stock_limit: Option<u32>,
}

impl LineItem {
    /// Build a line item with quantity 1 from a catalog snapshot.
    ///
    /// The caller is responsible for having checked that
    /// `snapshot.available_stock` is positive.
    #[must_use]
    pub fn from_snapshot(snapshot: ProductSnapshot) -> Self {
        let unit_price = Price::parse_label(&snapshot.price_label);
        if unit_price.is_zero() && !snapshot.price_label.is_empty() {
            debug!(
                product_id = %snapshot.product_id,
                price_label = %snapshot.price_label,
                "price label did not parse, treating as zero"
            );
        }
        Self {
            product_id: snapshot.product_id,
            title: snapshot.title,
            price_label: snapshot.price_label,
            unit_price,
            image: snapshot.image,
            category: snapshot.category,
            description: snapshot.description,
            quantity: 1,
            stock_limit: u32::try_from(snapshot.available_stock).ok(),
        }
    }

    /// Price contribution of this line: `unit_price * quantity`.
    #[must_use]
    pub fn line_subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Cap a requested quantity at the known stock limit.
///
/// Every mutation path that can raise a quantity goes through this one
/// function, so the silently-cap policy is defined (and tested) once.
#[must_use]
pub const fn clamp_quantity(requested: u32, stock_limit: Option<u32>) -> u32 {
    match stock_limit {
        Some(limit) if requested > limit => limit,
        _ => requested,
    }
}
