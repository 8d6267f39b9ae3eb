//! # meridian-core: Pure Business Logic for Meridian POS
//!
//! This crate holds the order-side domain logic of Meridian POS as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Meridian POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 POS Terminal / KDS frontends                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                meridian-orders (order creation)                 │   │
//! │  │        OrderCreator ──► BillCounter ──► OrderStore              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ meridian-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐  ┌──────────────┐  ┌───────────┐             │   │
//! │  │   │ bill_number │  │ order_number │  │   types   │ validation  │   │
//! │  │   │ PPP-NNN     │  │ ORD-date-hex │  │ Order     │             │   │
//! │  │   └─────────────┘  └──────────────┘  └───────────┘             │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`bill_number`] - The `PPP-NNN` receipt number and its rollover rule
//! - [`order_number`] - Internal `ORD-YYYYMMDD-XXXX` order numbers
//! - [`types`] - Order domain types (Order, OrderItem, statuses)
//! - [`validation`] - Order request validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::BillNumber;
//!
//! let last: BillNumber = "012-998".parse().unwrap();
//! assert_eq!(last.successor().to_string(), "012-999");
//! assert_eq!(last.successor().successor().to_string(), "013-001");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill_number;
pub mod error;
pub mod order_number;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bill_number::BillNumber;
pub use error::{BillNumberError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tenant ID (single-tenant runtime with a multi-tenant schema).
///
/// Every order row carries a tenant id and the latest-bill-number lookup is
/// scoped by it. Deployments override it through configuration.
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Default branch ID used when the caller carries no branch of its own.
pub const DEFAULT_BRANCH_ID: &str = "00000000-0000-0000-0000-000000000101";

/// Maximum line items allowed in a single order.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 999;
