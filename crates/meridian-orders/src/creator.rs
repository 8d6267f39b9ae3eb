//! # Order Creation
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  NewOrder + OrderContext                                                │
//! │       │                                                                 │
//! │       ├── 1. validate_new_order   ── Err ──► OrderError::Validation     │
//! │       ├── 2. BillCounter::next_stamped ── number + created_at, atomic   │
//! │       ├── 3. generate_order_number                                      │
//! │       ├── 4. assemble Order + OrderItems (tenant, branch, timestamps)   │
//! │       ├── 5. OrderStore::persist_order ── Err ──► OrderError::Store     │
//! │       ▼                                    (bill number stays consumed) │
//! │  OrderSummary { id, order_number, bill_number, status, total }          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use meridian_core::order_number::generate_order_number;
use meridian_core::validation::validate_new_order;
use meridian_core::{
    NewOrder, Order, OrderItem, OrderStatus, OrderSummary, PaymentStatus, POS_CHANNEL,
};

use crate::config::ServiceConfig;
use crate::counter::BillCounter;
use crate::error::OrderResult;
use crate::store::OrderStore;

/// Who is placing the order.
#[derive(Debug, Clone, Default)]
pub struct OrderContext {
    /// Authenticated user, recorded on the order.
    pub user_id: Option<String>,
    /// The user's branch; the configured default branch is used when absent.
    pub branch_id: Option<String>,
}

impl OrderContext {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        OrderContext {
            user_id: Some(user_id.into()),
            branch_id: None,
        }
    }

    pub fn with_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }
}

/// Creates orders for one tenant.
pub struct OrderCreator<S> {
    store: S,
    counter: Arc<BillCounter>,
    tenant_id: String,
    default_branch_id: String,
}

impl<S: OrderStore> OrderCreator<S> {
    pub fn new(
        store: S,
        counter: Arc<BillCounter>,
        tenant_id: impl Into<String>,
        default_branch_id: impl Into<String>,
    ) -> Self {
        OrderCreator {
            store,
            counter,
            tenant_id: tenant_id.into(),
            default_branch_id: default_branch_id.into(),
        }
    }

    /// Builds a creator scoped to the configured tenant and branch.
    pub fn from_config(store: S, counter: Arc<BillCounter>, config: &ServiceConfig) -> Self {
        Self::new(store, counter, config.tenant_id(), config.branch_id())
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn counter(&self) -> &Arc<BillCounter> {
        &self.counter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates, numbers, and persists an order.
    pub async fn create(&self, request: &NewOrder, context: &OrderContext) -> OrderResult<OrderSummary> {
        validate_new_order(request)?;

        let (bill_number, now) = self.counter.next_stamped();
        let bill_number = bill_number.to_string();
        let order_number = generate_order_number(now);

        let (order, items) = self.assemble(request, context, order_number, bill_number, now);

        if let Err(e) = self.store.persist_order(&order, &items).await {
            warn!(
                order_number = %order.order_number,
                bill_number = %order.bill_number,
                error = %e,
                "Failed to persist order, bill number left unused"
            );
            return Err(e.into());
        }

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            bill_number = %order.bill_number,
            items = items.len(),
            total_cents = order.total_cents,
            "Order created"
        );

        Ok(OrderSummary::from(&order))
    }

    fn assemble(
        &self,
        request: &NewOrder,
        context: &OrderContext,
        order_number: String,
        bill_number: String,
        now: DateTime<Utc>,
    ) -> (Order, Vec<OrderItem>) {
        let order_id = Uuid::new_v4().to_string();
        let branch_id = context
            .branch_id
            .clone()
            .unwrap_or_else(|| self.default_branch_id.clone());

        let items = request
            .items
            .iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                item_id: item.item_id.clone(),
                variant_id: item.variant_id.clone(),
                item_name_en: item.name.clone(),
                item_name_ar: item.name_ar.clone(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
                total_price_cents: item.total_price_cents,
                notes: item.notes.clone(),
                status: OrderStatus::Pending,
                created_at: now,
            })
            .collect();

        let order = Order {
            id: order_id,
            tenant_id: self.tenant_id.clone(),
            branch_id,
            order_number,
            bill_number,
            order_type: request.order_type,
            order_source: request.order_source,
            channel: POS_CHANNEL.to_string(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::for_method(request.payment_method),
            payment_method: request.payment_method,
            subtotal_cents: request.subtotal_cents,
            tax_cents: request.tax_cents,
            service_charge_cents: request.service_charge_cents,
            delivery_fee_cents: request.delivery_fee_cents,
            discount_cents: 0,
            total_cents: request.total_cents,
            customer_name: request.customer_name.clone(),
            customer_phone: request.customer_phone.clone(),
            delivery_address: request.customer_address.clone(),
            notes: request.notes.clone(),
            user_id: context.user_id.clone(),
            created_at: now,
            updated_at: now,
        };

        (order, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderError;
    use crate::store::MemoryOrderStore;
    use meridian_core::{NewOrderItem, OrderType, PaymentMethod};

    fn shawarma_order() -> NewOrder {
        NewOrder {
            order_type: OrderType::Takeaway,
            order_source: Default::default(),
            items: vec![NewOrderItem {
                item_id: "item-1".to_string(),
                variant_id: None,
                name: "Chicken Shawarma".to_string(),
                name_ar: "شاورما دجاج".to_string(),
                quantity: 2,
                unit_price_cents: 450,
                total_price_cents: 900,
                notes: None,
            }],
            subtotal_cents: 900,
            tax_cents: 45,
            service_charge_cents: 0,
            delivery_fee_cents: 0,
            total_cents: 945,
            payment_method: Some(PaymentMethod::Cash),
            cash_received_cents: Some(1000),
            change_due_cents: Some(55),
            customer_name: None,
            customer_phone: None,
            customer_address: None,
            notes: None,
        }
    }

    fn creator(store: MemoryOrderStore) -> OrderCreator<MemoryOrderStore> {
        OrderCreator::new(store, Arc::new(BillCounter::default()), "tenant-a", "branch-main")
    }

    #[tokio::test]
    async fn test_create_assigns_bill_number() {
        let store = MemoryOrderStore::new();
        let creator = creator(store.clone());

        let summary = creator
            .create(&shawarma_order(), &OrderContext::for_user("cashier-1"))
            .await
            .unwrap();

        assert_eq!(summary.bill_number, "001-001");
        assert_eq!(summary.status, OrderStatus::Pending);
        assert_eq!(summary.total_cents, 945);
        assert!(summary.order_number.starts_with("ORD-"));

        let orders = store.orders();
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.id, summary.id);
        assert_eq!(order.tenant_id, "tenant-a");
        assert_eq!(order.branch_id, "branch-main");
        assert_eq!(order.channel, "pos");
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.user_id.as_deref(), Some("cashier-1"));

        let items = store.items_for(&order.id);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name_ar, "شاورما دجاج");
    }

    #[tokio::test]
    async fn test_caller_branch_wins() {
        let store = MemoryOrderStore::new();
        let creator = creator(store.clone());

        creator
            .create(
                &shawarma_order(),
                &OrderContext::for_user("cashier-2").with_branch("branch-airport"),
            )
            .await
            .unwrap();

        assert_eq!(store.orders()[0].branch_id, "branch-airport");
    }

    #[tokio::test]
    async fn test_invalid_order_consumes_no_bill_number() {
        let creator = creator(MemoryOrderStore::new());

        let mut request = shawarma_order();
        request.items.clear();
        let err = creator
            .create(&request, &OrderContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));

        let summary = creator
            .create(&shawarma_order(), &OrderContext::default())
            .await
            .unwrap();
        assert_eq!(summary.bill_number, "001-001");
    }

    #[tokio::test]
    async fn test_unpaid_order_is_pending_payment() {
        let store = MemoryOrderStore::new();
        let creator = creator(store.clone());

        let mut request = shawarma_order();
        request.payment_method = None;
        creator.create(&request, &OrderContext::default()).await.unwrap();

        assert_eq!(store.orders()[0].payment_status, PaymentStatus::Pending);
    }
}
