//! Checkout totals and order submission.
//!
//! Shipping is a flat rate, not derived from weight, distance, or item
//! count. Total computation is pure; the resulting figures are embedded in
//! the outbound order payload sent to the external order service. There is
//! no local order-state machine: submission either succeeds or fails, and
//! on failure the cart is left untouched for a manual retry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tangerine_core::{OrderStatus, ProductId};
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::error::CheckoutError;
use crate::line_item::LineItem;

/// Shipping, subtotal, and grand total for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl CheckoutTotals {
    /// Compute totals from a cart subtotal and the configured flat rate.
    #[must_use]
    pub fn compute(subtotal: Decimal, flat_rate: Decimal) -> Self {
        Self {
            subtotal,
            shipping: flat_rate,
            total: subtotal + flat_rate,
        }
    }
}

/// One order line in the outbound payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.title.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            image: item.image.clone(),
            category: item.category.clone(),
            description: item.description.clone(),
        }
    }
}

/// Buyer details captured by the checkout form.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Outbound order record for the order service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    /// Client-generated reference so a resubmission is attributable.
    pub reference: Uuid,
    pub items: Vec<OrderLine>,
    pub billing_details: BillingDetails,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

impl OrderPayload {
    /// Build the payload from the cart's final snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when there is nothing to order.
    pub fn from_cart(
        items: &[LineItem],
        billing_details: BillingDetails,
        flat_rate: Decimal,
    ) -> Result<Self, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let subtotal: Decimal = items.iter().map(LineItem::line_subtotal).sum();
        let totals = CheckoutTotals::compute(subtotal, flat_rate);
        Ok(Self {
            reference: Uuid::new_v4(),
            items: items.iter().map(OrderLine::from).collect(),
            billing_details,
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            total: totals.total,
            status: OrderStatus::Pending,
            placed_at: Utc::now(),
        })
    }
}

/// HTTP client for the external order service.
///
/// One non-blocking call per submission; no retry, no timeout beyond the
/// transport's own defaults.
#[derive(Debug, Clone)]
pub struct OrderClient {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<SecretString>,
}

impl OrderClient {
    #[must_use]
    pub fn new(endpoint: Url, token: Option<SecretString>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            token,
        }
    }

    /// Submit an order. The caller clears the cart only after success.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::Transport`] on a network failure,
    /// [`CheckoutError::Rejected`] when the service answers with a
    /// non-success status.
    pub async fn submit(&self, payload: &OrderPayload) -> Result<(), CheckoutError> {
        let mut request = self.http.post(self.endpoint.clone()).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CheckoutError::Rejected(status));
        }
        info!(reference = %payload.reference, total = %payload.total, "order accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::ProductSnapshot;

    fn item(id: i64, label: &str, quantity: u32) -> LineItem {
        let mut item = LineItem::from_snapshot(ProductSnapshot {
            product_id: ProductId::new(id),
            title: format!("Product {id}"),
            price_label: label.to_owned(),
            image: None,
            category: Some("widgets".to_owned()),
            description: Some("A widget".to_owned()),
            available_stock: 50,
        });
        item.quantity = quantity;
        item
    }

    #[test]
    fn test_totals_add_flat_shipping() {
        // A 100.00 subtotal with flat 5.00 shipping totals 105.00.
        let totals = CheckoutTotals::compute(Decimal::new(10000, 2), Decimal::new(500, 2));
        assert_eq!(totals.shipping, Decimal::new(500, 2));
        assert_eq!(totals.total, Decimal::new(10500, 2));
    }

    #[test]
    fn test_payload_carries_pending_status_and_totals() {
        let payload = OrderPayload::from_cart(
            &[item(1, "$40.00", 2), item(2, "$20.00", 1)],
            BillingDetails::default(),
            Decimal::new(500, 2),
        )
        .expect("payload");
        assert_eq!(payload.status, OrderStatus::Pending);
        assert_eq!(payload.subtotal, Decimal::new(10000, 2));
        assert_eq!(payload.total, Decimal::new(10500, 2));
        assert_eq!(payload.items.len(), 2);
    }

    #[test]
    fn test_payload_field_names_match_wire_shape() {
        let payload = OrderPayload::from_cart(
            &[item(1, "$1.00", 1)],
            BillingDetails::default(),
            Decimal::new(500, 2),
        )
        .expect("payload");
        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(value["status"], "pending");
        assert!(value.get("billingDetails").is_some());
        let line = &value["items"][0];
        assert!(line.get("productId").is_some());
        assert!(line.get("unitPrice").is_some());
        assert_eq!(line["quantity"], 1);
    }

    #[test]
    fn test_empty_cart_cannot_check_out() {
        let result = OrderPayload::from_cart(&[], BillingDetails::default(), Decimal::ZERO);
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }
}
