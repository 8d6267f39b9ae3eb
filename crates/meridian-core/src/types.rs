//! # Domain Types
//!
//! Order types shared by the order store and the order creation flow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                         │
//! │  │    NewOrder     │ ─────► │      Order      │ ◄──┐                    │
//! │  │  (request)      │        │  id (UUID)      │    │ order_id (FK)      │
//! │  │  items          │        │  order_number   │    │                    │
//! │  │  amounts        │        │  bill_number    │  ┌─┴───────────────┐   │
//! │  │  payment_method │        │  status         │  │    OrderItem    │   │
//! │  └─────────────────┘        └─────────────────┘  └─────────────────┘   │
//! │                                                                         │
//! │  OrderType: qsr | takeaway | delivery                                   │
//! │  OrderStatus: pending → preparing → ready → completed | cancelled       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Triple-Key Identity
//! Every order has:
//! - `id`: UUID v4, immutable, used for relations
//! - `order_number`: `ORD-YYYYMMDD-XXXX`, internal reference
//! - `bill_number`: `PPP-NNN`, sequential, printed on the receipt
//!
//! All monetary amounts are integer minor units (cents).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Order Type
// =============================================================================

/// How the order is fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Quick bill at the counter.
    Qsr,
    Takeaway,
    Delivery,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Qsr => write!(f, "qsr"),
            OrderType::Takeaway => write!(f, "takeaway"),
            OrderType::Delivery => write!(f, "delivery"),
        }
    }
}

// =============================================================================
// Order Source
// =============================================================================

/// Where the order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderSource {
    #[default]
    Walkin,
    Website,
    Talabat,
    Cari,
    Jahez,
    Katch,
    Other,
}

// =============================================================================
// Order Status
// =============================================================================

/// Kitchen-facing status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Just created, waiting for the kitchen.
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

// =============================================================================
// Payment
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

impl PaymentStatus {
    /// An order that arrives with a payment method has already been paid.
    pub fn for_method(method: Option<PaymentMethod>) -> Self {
        match method {
            Some(_) => PaymentStatus::Paid,
            None => PaymentStatus::Pending,
        }
    }
}

/// Sales channel recorded on orders created by this service.
pub const POS_CHANNEL: &str = "pos";

// =============================================================================
// New Order (request)
// =============================================================================

/// A line of an incoming order request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrderItem {
    pub item_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    /// English name as shown on the terminal.
    pub name: String,
    /// Arabic name for the bilingual receipt.
    #[serde(default)]
    pub name_ar: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An order as submitted by a POS terminal.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrder {
    pub order_type: OrderType,
    #[serde(default)]
    pub order_source: OrderSource,
    pub items: Vec<NewOrderItem>,
    pub subtotal_cents: i64,
    #[serde(default)]
    pub tax_cents: i64,
    #[serde(default)]
    pub service_charge_cents: i64,
    #[serde(default)]
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub cash_received_cents: Option<i64>,
    #[serde(default)]
    pub change_due_cents: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewOrder {
    /// Sum of the components that make up the order total.
    ///
    /// `None` if the sum does not fit in an `i64`.
    pub fn computed_total_cents(&self) -> Option<i64> {
        self.subtotal_cents
            .checked_add(self.tax_cents)?
            .checked_add(self.service_charge_cents)?
            .checked_add(self.delivery_fee_cents)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A persisted order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub tenant_id: String,
    pub branch_id: String,
    pub order_number: String,
    /// `PPP-NNN`, assigned by the bill counter before the order is written.
    pub bill_number: String,
    pub order_type: OrderType,
    pub order_source: OrderSource,
    pub channel: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub service_charge_cents: i64,
    pub delivery_fee_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub user_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item of a persisted order; also what the KDS displays.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub item_id: String,
    pub variant_id: Option<String>,
    pub item_name_en: String,
    pub item_name_ar: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
    pub notes: Option<String>,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Summary
// =============================================================================

/// What order creation hands back to the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderSummary {
    pub id: String,
    pub order_number: String,
    pub bill_number: String,
    pub status: OrderStatus,
    pub total_cents: i64,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        OrderSummary {
            id: order.id.clone(),
            order_number: order.order_number.clone(),
            bill_number: order.bill_number.clone(),
            status: order.status,
            total_cents: order.total_cents,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
