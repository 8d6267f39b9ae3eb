//! # Order Repository
//!
//! Database operations for orders and order items.
//!
//! ## Queries the Bill Counter Depends On
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  latest_bill_number(tenant)                                            │
//! │    SELECT bill_number FROM orders                                      │
//! │    WHERE tenant_id = ?                                                 │
//! │    ORDER BY created_at DESC, rowid DESC LIMIT 1                        │
//! │                                                                         │
//! │  insert_order(order, items)                                            │
//! │    BEGIN; INSERT orders; INSERT order_items ...; COMMIT                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `rowid` breaks ties between orders stamped in the same instant, so the
//! row inserted last wins.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use meridian_core::{Order, OrderItem};

const ORDER_COLUMNS: &str = r#"
    id, tenant_id, branch_id, order_number, bill_number,
    order_type, order_source, channel, status, payment_status, payment_method,
    subtotal_cents, tax_cents, service_charge_cents, delivery_fee_cents,
    discount_cents, total_cents,
    customer_name, customer_phone, delivery_address, notes, user_id,
    created_at, updated_at
"#;

const ORDER_ITEM_COLUMNS: &str = r#"
    id, order_id, item_id, variant_id, item_name_en, item_name_ar,
    quantity, unit_price_cents, total_price_cents, notes, status, created_at
"#;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Returns the bill number of the tenant's most recently created order.
    ///
    /// `None` when the tenant has no orders, or when its latest order was
    /// written without a bill number.
    pub async fn latest_bill_number(&self, tenant_id: &str) -> DbResult<Option<String>> {
        let latest: Option<Option<String>> = sqlx::query_scalar(
            r#"
            SELECT bill_number
            FROM orders
            WHERE tenant_id = ?1
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(latest.flatten())
    }

    /// Inserts an order and all of its items in one transaction.
    ///
    /// Either the whole order is visible afterwards or none of it is.
    pub async fn insert_order(&self, order: &Order, items: &[OrderItem]) -> DbResult<()> {
        debug!(
            id = %order.id,
            bill_number = %order.bill_number,
            items = items.len(),
            "Inserting order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, tenant_id, branch_id, order_number, bill_number,
                order_type, order_source, channel, status, payment_status, payment_method,
                subtotal_cents, tax_cents, service_charge_cents, delivery_fee_cents,
                discount_cents, total_cents,
                customer_name, customer_phone, delivery_address, notes, user_id,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, ?15,
                ?16, ?17,
                ?18, ?19, ?20, ?21, ?22,
                ?23, ?24
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.tenant_id)
        .bind(&order.branch_id)
        .bind(&order.order_number)
        .bind(&order.bill_number)
        .bind(order.order_type)
        .bind(order.order_source)
        .bind(&order.channel)
        .bind(order.status)
        .bind(order.payment_status)
        .bind(order.payment_method)
        .bind(order.subtotal_cents)
        .bind(order.tax_cents)
        .bind(order.service_charge_cents)
        .bind(order.delivery_fee_cents)
        .bind(order.discount_cents)
        .bind(order.total_cents)
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(&order.delivery_address)
        .bind(&order.notes)
        .bind(&order.user_id)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, item_id, variant_id, item_name_en, item_name_ar,
                    quantity, unit_price_cents, total_price_cents, notes, status, created_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6,
                    ?7, ?8, ?9, ?10, ?11, ?12
                )
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.item_id)
            .bind(&item.variant_id)
            .bind(&item.item_name_en)
            .bind(&item.item_name_ar)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.total_price_cents)
            .bind(&item.notes)
            .bind(item.status)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Gets an order by its bill number within a tenant (receipt reprint).
    pub async fn get_by_bill_number(&self, tenant_id: &str, bill_number: &str) -> DbResult<Order> {
        let sql = format!(
            "SELECT {} FROM orders WHERE tenant_id = ?1 AND bill_number = ?2 \
             ORDER BY created_at DESC LIMIT 1",
            ORDER_COLUMNS
        );
        sqlx::query_as::<_, Order>(&sql)
            .bind(tenant_id)
            .bind(bill_number)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Order", bill_number))
    }

    /// Gets all items for an order, in insertion order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let sql = format!(
            "SELECT {} FROM order_items WHERE order_id = ?1 ORDER BY created_at, rowid",
            ORDER_ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Counts the tenant's orders.
    pub async fn count(&self, tenant_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE tenant_id = ?1")
            .bind(tenant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, Utc};
    use meridian_core::{
        OrderSource, OrderStatus, OrderType, PaymentMethod, PaymentStatus, DEFAULT_BRANCH_ID,
        DEFAULT_TENANT_ID, POS_CHANNEL,
    };
    use uuid::Uuid;

    fn test_order(tenant_id: &str, bill_number: &str, age_secs: i64) -> Order {
        let created_at = Utc::now() - Duration::seconds(age_secs);
        Order {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            branch_id: DEFAULT_BRANCH_ID.to_string(),
            order_number: "ORD-20260131-ABCD".to_string(),
            bill_number: bill_number.to_string(),
            order_type: OrderType::Qsr,
            order_source: OrderSource::Walkin,
            channel: POS_CHANNEL.to_string(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Paid,
            payment_method: Some(PaymentMethod::Cash),
            subtotal_cents: 1000,
            tax_cents: 50,
            service_charge_cents: 0,
            delivery_fee_cents: 0,
            discount_cents: 0,
            total_cents: 1050,
            customer_name: None,
            customer_phone: None,
            delivery_address: None,
            notes: None,
            user_id: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn test_item(order: &Order) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            item_id: "item-1".to_string(),
            variant_id: None,
            item_name_en: "Mixed Grill".to_string(),
            item_name_ar: "مشاوي مشكلة".to_string(),
            quantity: 1,
            unit_price_cents: 1000,
            total_price_cents: 1000,
            notes: None,
            status: OrderStatus::Pending,
            created_at: order.created_at,
        }
    }

    async fn repo() -> OrderRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().orders()
    }

    #[tokio::test]
    async fn test_latest_bill_number_empty() {
        let repo = repo().await;
        assert_eq!(repo.latest_bill_number(DEFAULT_TENANT_ID).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_latest_bill_number_follows_created_at() {
        let repo = repo().await;

        // Inserted out of creation order on purpose
        let newest = test_order(DEFAULT_TENANT_ID, "004-010", 0);
        let oldest = test_order(DEFAULT_TENANT_ID, "004-008", 20);
        let middle = test_order(DEFAULT_TENANT_ID, "004-009", 10);
        for order in [&newest, &oldest, &middle] {
            repo.insert_order(order, &[]).await.unwrap();
        }

        assert_eq!(
            repo.latest_bill_number(DEFAULT_TENANT_ID).await.unwrap(),
            Some("004-010".to_string())
        );
    }

    #[tokio::test]
    async fn test_latest_bill_number_is_tenant_scoped() {
        let repo = repo().await;
        repo.insert_order(&test_order(DEFAULT_TENANT_ID, "001-005", 10), &[])
            .await
            .unwrap();
        repo.insert_order(&test_order("other-tenant", "009-900", 0), &[])
            .await
            .unwrap();

        assert_eq!(
            repo.latest_bill_number(DEFAULT_TENANT_ID).await.unwrap(),
            Some("001-005".to_string())
        );
        assert_eq!(repo.latest_bill_number("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_latest_bill_number_null_column() {
        let repo = repo().await;
        let order = test_order(DEFAULT_TENANT_ID, "001-001", 0);
        repo.insert_order(&order, &[]).await.unwrap();

        sqlx::query("UPDATE orders SET bill_number = NULL WHERE id = ?1")
            .bind(&order.id)
            .execute(&repo.pool)
            .await
            .unwrap();

        assert_eq!(repo.latest_bill_number(DEFAULT_TENANT_ID).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let repo = repo().await;
        let order = test_order(DEFAULT_TENANT_ID, "002-017", 0);
        let item = test_item(&order);

        repo.insert_order(&order, std::slice::from_ref(&item))
            .await
            .unwrap();

        let stored = repo.get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.bill_number, "002-017");
        assert_eq!(stored.order_type, OrderType::Qsr);
        assert_eq!(stored.payment_method, Some(PaymentMethod::Cash));
        assert_eq!(stored.total_cents, 1050);

        let items = repo.get_items(&order.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name_ar, "مشاوي مشكلة");

        let by_bill = repo
            .get_by_bill_number(DEFAULT_TENANT_ID, "002-017")
            .await
            .unwrap();
        assert_eq!(by_bill.id, order.id);
        assert_eq!(repo.count(DEFAULT_TENANT_ID).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_item_insert_rolls_back_order() {
        let repo = repo().await;
        let order = test_order(DEFAULT_TENANT_ID, "003-001", 0);
        let mut bad_item = test_item(&order);
        bad_item.quantity = 0; // violates CHECK (quantity > 0)

        let err = repo.insert_order(&order, &[bad_item]).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));

        assert!(repo.get_by_id(&order.id).await.unwrap().is_none());
        assert_eq!(repo.count(DEFAULT_TENANT_ID).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_order_id() {
        let repo = repo().await;
        let order = test_order(DEFAULT_TENANT_ID, "003-002", 0);
        repo.insert_order(&order, &[]).await.unwrap();

        let err = repo.insert_order(&order, &[]).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_get_by_bill_number_missing() {
        let repo = repo().await;
        let err = repo
            .get_by_bill_number(DEFAULT_TENANT_ID, "001-001")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
