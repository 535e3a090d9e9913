//! The single shared access surface over the cart store.
//!
//! Exactly one live [`CartStore`] exists per session; every consumer holds
//! a cheap clone of [`CartSession`] and observes the same state. Each
//! mutation persists the collection and notifies all registered observers
//! synchronously before the mutating call returns, so a cart-count badge
//! reflects an addition immediately.
//!
//! The persisted collection is loaded exactly once, in the constructor,
//! before any mutation is accepted. That ordering keeps an early mutation
//! from being overwritten by a stale load.

use std::sync::{Arc, Mutex, MutexGuard};

use tangerine_core::ProductId;
use tracing::warn;

use crate::line_item::{LineItem, ProductSnapshot};
use crate::persistence::{CartStorage, MemoryStorage};
use crate::store::{CartSnapshot, CartStore};

/// Change notification delivered to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// The collection changed; carries the fresh aggregate view.
    Updated(CartSnapshot),
    /// An item was actually added. UI consumers use this to reveal the
    /// cart surface; it is never emitted for silently rejected adds.
    Opened,
}

type Observer = Box<dyn Fn(&CartEvent) + Send>;

struct SessionInner {
    store: CartStore,
    storage: Box<dyn CartStorage>,
    observers: Vec<Observer>,
}

/// Cheaply cloneable handle to the one shared cart of a session.
#[derive(Clone)]
pub struct CartSession {
    inner: Arc<Mutex<SessionInner>>,
}

impl CartSession {
    /// Create a session over the given storage.
    ///
    /// Loads the persisted collection before returning, so the session is
    /// fully hydrated before any mutation can run.
    #[must_use]
    pub fn new(storage: impl CartStorage + 'static) -> Self {
        let store = CartStore::from_items(storage.load());
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                store,
                storage: Box::new(storage),
                observers: Vec::new(),
            })),
        }
    }

    /// Create a session with no durable storage, starting empty.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Register an observer for change notifications.
    ///
    /// Observers run synchronously inside the mutating call and must not
    /// call back into the session.
    pub fn subscribe(&self, observer: impl Fn(&CartEvent) + Send + 'static) {
        self.lock().observers.push(Box::new(observer));
    }

    /// Add one unit of a catalog product. See [`CartStore::add`].
    pub fn add(&self, snapshot: ProductSnapshot) -> bool {
        let mut inner = self.lock();
        let changed = inner.store.add(snapshot);
        if changed {
            Self::persist_and_notify(&mut inner, true);
        }
        changed
    }

    /// Remove the line item for `product_id`, if present.
    pub fn remove(&self, product_id: ProductId) -> bool {
        let mut inner = self.lock();
        let changed = inner.store.remove(product_id);
        if changed {
            Self::persist_and_notify(&mut inner, false);
        }
        changed
    }

    /// Set the quantity for an existing line item. See
    /// [`CartStore::set_quantity`].
    pub fn set_quantity(
        &self,
        product_id: ProductId,
        new_quantity: i64,
        max_quantity: Option<u32>,
    ) -> bool {
        let mut inner = self.lock();
        let changed = inner.store.set_quantity(product_id, new_quantity, max_quantity);
        if changed {
            Self::persist_and_notify(&mut inner, false);
        }
        changed
    }

    /// Empty the cart, typically after a successful order.
    pub fn clear(&self) -> bool {
        let mut inner = self.lock();
        let changed = inner.store.clear();
        if changed {
            Self::persist_and_notify(&mut inner, false);
        }
        changed
    }

    /// Current aggregate view.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.lock().store.snapshot()
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.lock().store.items().to_vec()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lock().store.count()
    }

    /// Monetary subtotal of the cart.
    #[must_use]
    pub fn subtotal(&self) -> rust_decimal::Decimal {
        self.lock().store.subtotal()
    }

    /// Persist the collection and notify observers, in that order, while
    /// still inside the mutating call. A failed save is logged and
    /// absorbed; the in-memory state stays authoritative.
    fn persist_and_notify(inner: &mut SessionInner, added: bool) {
        let items = inner.store.items().to_vec();
        if let Err(err) = inner.storage.save(&items) {
            warn!(error = %err, "cart save failed, in-memory state remains authoritative");
        }
        let updated = CartEvent::Updated(inner.store.snapshot());
        for observer in &inner.observers {
            observer(&updated);
            if added {
                observer(&CartEvent::Opened);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // A poisoned lock means an observer panicked mid-notification; the
        // cart data itself is still consistent, so keep serving it.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
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

    fn recording_session() -> (CartSession, Arc<Mutex<Vec<CartEvent>>>) {
        let session = CartSession::in_memory();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        session.subscribe(move |event| {
            sink.lock().expect("event sink").push(*event);
        });
        (session, events)
    }

    #[test]
    fn test_observer_notified_before_mutation_returns() {
        let (session, events) = recording_session();
        assert!(session.add(snapshot(1, "$10.00", 3)));
        let events = events.lock().expect("event sink");
        assert_eq!(
            *events,
            vec![
                CartEvent::Updated(CartSnapshot {
                    count: 1,
                    subtotal: rust_decimal::Decimal::new(1000, 2),
                }),
                CartEvent::Opened,
            ]
        );
    }

    #[test]
    fn test_rejected_add_emits_nothing() {
        let (session, events) = recording_session();
        assert!(!session.add(snapshot(1, "$10.00", 0)));
        assert!(events.lock().expect("event sink").is_empty());
    }

    #[test]
    fn test_only_actual_adds_emit_opened() {
        let (session, events) = recording_session();
        session.add(snapshot(1, "$10.00", 5));
        session.set_quantity(ProductId::new(1), 3, None);
        session.remove(ProductId::new(1));
        let opened = events
            .lock()
            .expect("event sink")
            .iter()
            .filter(|event| matches!(event, CartEvent::Opened))
            .count();
        assert_eq!(opened, 1);
    }

    #[test]
    fn test_clones_share_state() {
        let session = CartSession::in_memory();
        let other = session.clone();
        session.add(snapshot(1, "$10.00", 3));
        assert_eq!(other.count(), 1);
        other.clear();
        assert_eq!(session.count(), 0);
    }

    #[test]
    fn test_rehydrates_from_storage_on_construction() {
        let mut seed = MemoryStorage::new();
        let mut item = LineItem::from_snapshot(snapshot(7, "$2.00", 9));
        item.quantity = 4;
        seed.save(&[item]).expect("seed save");
        let session = CartSession::new(seed);
        assert_eq!(session.count(), 4);
        assert_eq!(session.subtotal(), rust_decimal::Decimal::new(800, 2));
    }
}
