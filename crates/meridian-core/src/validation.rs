//! # Validation Module
//!
//! Business rule checks for incoming orders.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: POS terminal                                                 │
//! │  └── Cart math, required customer fields for delivery                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Order creation flow (Rust)                                   │
//! │  └── THIS MODULE: runs before a bill number is consumed                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database                                                     │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key order_items.order_id → orders.id                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{NewOrder, NewOrderItem, OrderType, PaymentMethod};
use crate::{MAX_ORDER_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of free-text notes.
pub const MAX_NOTES_LEN: usize = 500;

// =============================================================================
// Order Validators
// =============================================================================

/// Validates a whole order request.
///
/// ## Rules
/// - 1..=100 line items, each valid per [`validate_item`]
/// - No negative amounts
/// - `total = subtotal + tax + service_charge + delivery_fee`
/// - Delivery orders carry a customer address
/// - Cash orders: `cash_received >= total`, `change_due = cash_received - total`
pub fn validate_new_order(order: &NewOrder) -> ValidationResult<()> {
    if order.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if order.items.len() > MAX_ORDER_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_ITEMS as i64,
        });
    }

    for item in &order.items {
        validate_item(item)?;
    }

    validate_amount("subtotal", order.subtotal_cents)?;
    validate_amount("tax", order.tax_cents)?;
    validate_amount("service_charge", order.service_charge_cents)?;
    validate_amount("delivery_fee", order.delivery_fee_cents)?;
    validate_amount("total", order.total_cents)?;

    let computed = order
        .computed_total_cents()
        .ok_or_else(|| ValidationError::AmountOverflow {
            field: "total".to_string(),
        })?;
    if computed != order.total_cents {
        return Err(ValidationError::TotalMismatch {
            total: order.total_cents,
            computed,
        });
    }

    if order.order_type == OrderType::Delivery
        && order
            .customer_address
            .as_deref()
            .map_or(true, |a| a.trim().is_empty())
    {
        return Err(ValidationError::Required {
            field: "customer_address".to_string(),
        });
    }

    if let Some(notes) = &order.notes {
        validate_notes(notes)?;
    }

    if order.payment_method == Some(PaymentMethod::Cash) {
        validate_cash(order)?;
    }

    Ok(())
}

/// Checks the cash handed over and the change due against the total.
///
/// Both fields are optional; when given, `change_due = cash_received - total`.
fn validate_cash(order: &NewOrder) -> ValidationResult<()> {
    let Some(received) = order.cash_received_cents else {
        if order.change_due_cents.is_some() {
            return Err(ValidationError::Required {
                field: "cash_received".to_string(),
            });
        }
        return Ok(());
    };

    validate_amount("cash_received", received)?;
    if received < order.total_cents {
        return Err(ValidationError::InsufficientCash {
            received,
            total: order.total_cents,
        });
    }

    // Both operands are non-negative here
    let expected = received - order.total_cents;
    if let Some(change_due) = order.change_due_cents {
        if change_due != expected {
            return Err(ValidationError::ChangeMismatch {
                change_due,
                expected,
            });
        }
    }

    Ok(())
}

/// Validates a single order line.
pub fn validate_item(item: &NewOrderItem) -> ValidationResult<()> {
    if item.item_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "item_id".to_string(),
        });
    }

    validate_quantity(item.quantity)?;
    validate_amount("unit_price", item.unit_price_cents)?;
    validate_amount("total_price", item.total_price_cents)?;

    if let Some(notes) = &item.notes {
        validate_notes(notes)?;
    }

    Ok(())
}

/// Validates a line quantity (1..=999).
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

fn validate_amount(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
