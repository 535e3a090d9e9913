//! The canonical in-memory cart collection.
//!
//! [`CartStore`] owns the ordered collection of line items and every
//! mutating operation on it. No operation here ever fails: invalid inputs
//! (add beyond stock, remove of an absent id) degrade to no-ops so the
//! shopping flow is never blocked. Each mutation reports whether it
//! actually changed the collection, which the session layer uses to decide
//! whether to persist and notify.

use rust_decimal::Decimal;
use serde::Serialize;
use tangerine_core::ProductId;
use tracing::debug;

use crate::line_item::{LineItem, ProductSnapshot, clamp_quantity};

/// Derived aggregate view of the cart. Recomputed on every read, never
/// persisted independently of the line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    /// Sum of all line quantities.
    pub count: u64,
    /// Sum of `unit_price * quantity` across all lines.
    pub subtotal: Decimal,
}

/// Ordered collection of line items with stock-aware mutation.
///
/// Insertion order is preserved across mutations so iteration and display
/// are deterministic.
#[derive(Debug, Default)]
pub struct CartStore {
    items: Vec<LineItem>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rehydrate a cart from previously persisted line items.
    ///
    /// Duplicate product ids (which a well-formed record never contains)
    /// are dropped after the first occurrence to re-establish the
    /// one-line-per-product invariant.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut store = Self::new();
        for item in items {
            if store.find(item.product_id).is_none() && item.quantity >= 1 {
                store.items.push(item);
            }
        }
        store
    }

    /// Add one unit of a catalog product.
    ///
    /// - Non-positive available stock: no-op (the product is not added).
    /// - Existing line: increment by 1 unless that would exceed the stock
    ///   known from this snapshot; an oversell attempt is a silent no-op.
    /// - New product: a line with quantity 1.
    ///
    /// Returns `true` when the collection actually changed.
    pub fn add(&mut self, snapshot: ProductSnapshot) -> bool {
        if snapshot.available_stock <= 0 {
            debug!(
                product_id = %snapshot.product_id,
                available_stock = snapshot.available_stock,
                "rejected add: product out of stock"
            );
            return false;
        }
        let stock = u32::try_from(snapshot.available_stock).ok();

        if let Some(item) = self.find_mut(snapshot.product_id) {
            let next = item.quantity.saturating_add(1);
            // An increment past the stock known from this snapshot is
            // rejected outright, never capped: a held quantity above a
            // freshly lowered stock must not be shrunk by an add.
            if clamp_quantity(next, stock) != next {
                debug!(
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    available_stock = snapshot.available_stock,
                    "rejected add: would exceed available stock"
                );
                return false;
            }
            item.quantity = next;
            item.stock_limit = stock;
            return true;
        }

        self.items.push(LineItem::from_snapshot(snapshot));
        true
    }

    /// Remove the line item for `product_id`, if present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        self.items.len() != before
    }

    /// Set the quantity for an existing line item.
    ///
    /// A requested quantity of zero or below removes the line. Otherwise
    /// the effective quantity is capped at `max_quantity` when supplied,
    /// and taken as given when not. Absent ids are a no-op.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        new_quantity: i64,
        max_quantity: Option<u32>,
    ) -> bool {
        if self.find(product_id).is_none() {
            return false;
        }
        if new_quantity <= 0 {
            return self.remove(product_id);
        }
        let requested = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        let effective = clamp_quantity(requested, max_quantity);

        let Some(item) = self.find_mut(product_id) else {
            return false;
        };
        let changed = item.quantity != effective || (max_quantity.is_some() && item.stock_limit != max_quantity);
        item.quantity = effective;
        if max_quantity.is_some() {
            item.stock_limit = max_quantity;
        }
        changed
    }

    /// Empty the collection unconditionally.
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    /// Sum of all line quantities; zero for an empty cart.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `unit_price * quantity` across all lines; zero for an empty
    /// cart.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_subtotal).sum()
    }

    /// Derived aggregate view.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            count: self.count(),
            subtotal: self.subtotal(),
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    fn find(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    fn find_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: i64, label: &str, stock: i64) -> ProductSnapshot {
        ProductSnapshot {
            product_id: ProductId::new(id),
            title: format!("Product {id}"),
            price_label: label.to_owned(),
            image: None,
            category: None,
            description: None,
            available_stock: stock,
        }
    }

    #[test]
    fn test_empty_cart_aggregates() {
        let store = CartStore::new();
        assert_eq!(store.count(), 0);
        assert_eq!(store.subtotal(), Decimal::ZERO);
        assert!(store.is_empty());
    }

    #[test]
    fn test_adds_within_stock_accumulate() {
        // Three adds within a stock of 3 accumulate; the fourth, past
        // stock, is a no-op.
        let mut store = CartStore::new();
        assert!(store.add(snapshot(1, "$10.00", 3)));
        assert!(store.add(snapshot(1, "$10.00", 3)));
        assert!(store.add(snapshot(1, "$10.00", 3)));
        assert_eq!(store.count(), 3);
        assert_eq!(store.subtotal(), Decimal::new(3000, 2));

        assert!(!store.add(snapshot(1, "$10.00", 3)));
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_add_is_idempotent_at_stock_limit() {
        let mut store = CartStore::new();
        store.add(snapshot(1, "$5.00", 1));
        for _ in 0..10 {
            assert!(!store.add(snapshot(1, "$5.00", 1)));
        }
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_add_after_stock_drop_is_noop() {
        // Catalog stock fell below the held quantity between adds. The
        // re-add is rejected; the held quantity is never shrunk.
        let mut store = CartStore::new();
        for _ in 0..5 {
            assert!(store.add(snapshot(1, "$10.00", 5)));
        }
        assert!(!store.add(snapshot(1, "$10.00", 2)));
        let item = store.items().first().expect("item");
        assert_eq!(item.quantity, 5);
        assert_eq!(item.stock_limit, Some(5));
        assert_eq!(store.subtotal(), Decimal::new(5000, 2));
    }

    #[test]
    fn test_add_out_of_stock_is_rejected() {
        let mut store = CartStore::new();
        assert!(!store.add(snapshot(1, "$5.00", 0)));
        assert!(!store.add(snapshot(2, "$5.00", -4)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_updates_stock_limit_from_latest_snapshot() {
        let mut store = CartStore::new();
        store.add(snapshot(1, "$5.00", 2));
        store.add(snapshot(1, "$5.00", 5));
        let item = store.items().first().expect("one item");
        assert_eq!(item.stock_limit, Some(5));
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_set_quantity_caps_at_max() {
        // Requesting 10 with a maximum of 5 silently caps at 5.
        let mut store = CartStore::new();
        store.add(snapshot(2, "$25.50", 5));
        assert!(store.set_quantity(ProductId::new(2), 10, Some(5)));
        assert_eq!(store.items().first().expect("item").quantity, 5);
        assert_eq!(store.subtotal(), Decimal::new(12750, 2));
    }

    #[test]
    fn test_set_quantity_is_idempotent() {
        let mut store = CartStore::new();
        store.add(snapshot(1, "$1.00", 10));
        assert!(store.set_quantity(ProductId::new(1), 4, None));
        assert!(!store.set_quantity(ProductId::new(1), 4, None));
        assert_eq!(store.count(), 4);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut store = CartStore::new();
        store.add(snapshot(1, "$1.00", 10));
        assert!(store.set_quantity(ProductId::new(1), 0, None));
        assert!(store.is_empty());
        assert!(!store.set_quantity(ProductId::new(1), -3, None));
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut store = CartStore::new();
        store.add(snapshot(1, "$1.00", 10));
        assert!(!store.set_quantity(ProductId::new(999), 2, None));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_set_quantity_without_max_is_taken_as_given() {
        let mut store = CartStore::new();
        store.add(snapshot(1, "$1.00", 3));
        assert!(store.set_quantity(ProductId::new(1), 7, None));
        assert_eq!(store.count(), 7);
    }

    #[test]
    fn test_remove_is_idempotent() {
        // Removing from an empty cart is a silent no-op.
        let mut store = CartStore::new();
        assert!(!store.remove(ProductId::new(999)));

        store.add(snapshot(1, "$1.00", 3));
        assert!(store.remove(ProductId::new(1)));
        assert!(!store.remove(ProductId::new(1)));
    }

    #[test]
    fn test_clear_empties_everything() {
        // Two distinct products, then clear: everything goes.
        let mut store = CartStore::new();
        store.add(snapshot(1, "$10.00", 3));
        store.add(snapshot(2, "$20.00", 3));
        assert!(store.clear());
        assert_eq!(store.count(), 0);
        assert_eq!(store.subtotal(), Decimal::ZERO);
        assert!(!store.clear());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = CartStore::new();
        store.add(snapshot(3, "$1.00", 5));
        store.add(snapshot(1, "$1.00", 5));
        store.add(snapshot(2, "$1.00", 5));
        store.remove(ProductId::new(1));
        store.add(snapshot(3, "$1.00", 5));
        let ids: Vec<i64> = store
            .items()
            .iter()
            .map(|item| item.product_id.as_i64())
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_malformed_price_counts_as_zero_in_subtotal() {
        let mut store = CartStore::new();
        store.add(snapshot(1, "$10.00", 3));
        store.add(snapshot(2, "priceless", 3));
        assert_eq!(store.subtotal(), Decimal::new(1000, 2));
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_from_items_drops_duplicate_ids() {
        let a = LineItem::from_snapshot(snapshot(1, "$1.00", 5));
        let mut b = LineItem::from_snapshot(snapshot(1, "$2.00", 5));
        b.quantity = 3;
        let store = CartStore::from_items(vec![a.clone(), b]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.items().first().expect("item").unit_price, a.unit_price);
    }
}
