//! # Order Store
//!
//! The persistence seam used by the bill counter and the order creation flow.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         OrderStore trait                                │
//! │                                                                         │
//! │  latest_bill_number(tenant)  ◄── BillCounter::initialize (once)        │
//! │  persist_order(order, items) ◄── OrderCreator::create (every order)    │
//! │                                                                         │
//! │  ┌───────────────────────┐        ┌────────────────────────┐           │
//! │  │  OrderRepository      │        │  MemoryOrderStore      │           │
//! │  │  (SQLite, meridian-db)│        │  (tests, demos)        │           │
//! │  └───────────────────────┘        └────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use meridian_core::{Order, OrderItem};
use meridian_db::{DbError, DbResult, OrderRepository};

/// Where orders live.
pub trait OrderStore: Send + Sync {
    /// Raw `bill_number` of the tenant's most recently created order,
    /// the one with the greatest `created_at`.
    ///
    /// `None` when the tenant has no orders or that order has no bill number.
    /// The value is returned unparsed.
    fn latest_bill_number(
        &self,
        tenant_id: &str,
    ) -> impl Future<Output = DbResult<Option<String>>> + Send;

    /// Writes an order and its items atomically.
    fn persist_order(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> impl Future<Output = DbResult<()>> + Send;
}

impl OrderStore for OrderRepository {
    async fn latest_bill_number(&self, tenant_id: &str) -> DbResult<Option<String>> {
        OrderRepository::latest_bill_number(self, tenant_id).await
    }

    async fn persist_order(&self, order: &Order, items: &[OrderItem]) -> DbResult<()> {
        self.insert_order(order, items).await
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

#[derive(Debug)]
struct BillRecord {
    tenant_id: String,
    bill_number: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Bill number of every order, seeded ones included, in insertion order.
    history: Vec<BillRecord>,
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    read_error: Option<String>,
    write_error: Option<String>,
    read_delay: Option<Duration>,
}

/// Order store held in process memory.
///
/// Clones share state. Reads and writes can be made to fail or stall so
/// that startup degradation and persist failures can be exercised.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records an earlier order of `tenant_id` carrying `bill_number`,
    /// created now.
    ///
    /// The value is stored as given, so malformed numbers can be seeded too.
    pub fn seed_bill_number(&self, tenant_id: &str, bill_number: Option<&str>) -> &Self {
        self.state().history.push(BillRecord {
            tenant_id: tenant_id.to_string(),
            bill_number: bill_number.map(str::to_string),
            created_at: Utc::now(),
        });
        self
    }

    /// Makes every `latest_bill_number` call fail with `message`.
    pub fn fail_reads(&self, message: &str) -> &Self {
        self.state().read_error = Some(message.to_string());
        self
    }

    /// Makes every `persist_order` call fail with `message`.
    pub fn fail_writes(&self, message: &str) -> &Self {
        self.state().write_error = Some(message.to_string());
        self
    }

    /// Clears a failure set by [`MemoryOrderStore::fail_writes`].
    pub fn heal_writes(&self) -> &Self {
        self.state().write_error = None;
        self
    }

    /// Delays every `latest_bill_number` answer by `delay`.
    pub fn delay_reads(&self, delay: Duration) -> &Self {
        self.state().read_delay = Some(delay);
        self
    }

    /// Persisted orders, oldest first.
    pub fn orders(&self) -> Vec<Order> {
        self.state().orders.clone()
    }

    pub fn items_for(&self, order_id: &str) -> Vec<OrderItem> {
        self.state()
            .items
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect()
    }
}

impl OrderStore for MemoryOrderStore {
    async fn latest_bill_number(&self, tenant_id: &str) -> DbResult<Option<String>> {
        let delay = self.state().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        if let Some(message) = &state.read_error {
            return Err(DbError::Unavailable(message.clone()));
        }

        // Same instant: the record inserted last wins
        Ok(state
            .history
            .iter()
            .enumerate()
            .filter(|(_, record)| record.tenant_id == tenant_id)
            .max_by_key(|(position, record)| (record.created_at, *position))
            .and_then(|(_, record)| record.bill_number.clone()))
    }

    async fn persist_order(&self, order: &Order, items: &[OrderItem]) -> DbResult<()> {
        let mut state = self.state();
        if let Some(message) = &state.write_error {
            return Err(DbError::Unavailable(message.clone()));
        }

        if state.orders.iter().any(|existing| existing.id == order.id) {
            return Err(DbError::duplicate("orders.id", order.id.clone()));
        }

        state.history.push(BillRecord {
            tenant_id: order.tenant_id.clone(),
            bill_number: Some(order.bill_number.clone()),
            created_at: order.created_at,
        });
        state.orders.push(order.clone());
        state.items.extend_from_slice(items);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_has_no_latest() {
        let store = MemoryOrderStore::new();
        assert_eq!(store.latest_bill_number("tenant-a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_latest_is_most_recent_for_tenant() {
        let store = MemoryOrderStore::new();
        store
            .seed_bill_number("tenant-a", Some("004-010"))
            .seed_bill_number("tenant-b", Some("099-999"))
            .seed_bill_number("tenant-a", Some("004-011"));

        assert_eq!(
            store.latest_bill_number("tenant-a").await.unwrap().as_deref(),
            Some("004-011")
        );
        assert_eq!(
            store.latest_bill_number("tenant-b").await.unwrap().as_deref(),
            Some("099-999")
        );
    }

    #[tokio::test]
    async fn test_latest_without_bill_number() {
        let store = MemoryOrderStore::new();
        store
            .seed_bill_number("tenant-a", Some("004-010"))
            .seed_bill_number("tenant-a", None);

        assert_eq!(store.latest_bill_number("tenant-a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_injected_read_failure() {
        let store = MemoryOrderStore::new();
        store.fail_reads("disk on fire");

        let err = store.latest_bill_number("tenant-a").await.unwrap_err();
        assert!(matches!(err, DbError::Unavailable(ref m) if m == "disk on fire"));
    }
}
