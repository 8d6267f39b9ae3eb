//! Internal order numbers (`ORD-YYYYMMDD-XXXX`).
//!
//! Unlike bill numbers these carry no sequence: the suffix is taken from a
//! fresh UUID, so they need neither a counter nor a store lookup.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Prefix shared by every order number.
pub const ORDER_NUMBER_PREFIX: &str = "ORD";

/// Generates an order number for an order created at `now`.
///
/// ## Format
/// - `YYYYMMDD`: UTC creation date
/// - `XXXX`: first four hex characters of a UUID v4, uppercased
///
/// ## Example
/// `ORD-20260131-9F2C`
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(4)
        .collect::<String>()
        .to_uppercase();

    format!("{}-{}-{}", ORDER_NUMBER_PREFIX, now.format("%Y%m%d"), suffix)
}
