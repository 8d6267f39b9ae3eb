//! # Order Service Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderError    returned by OrderCreator::create                        │
//! │  ├── Validation   request rejected before a bill number is consumed    │
//! │  └── Store        the order could not be persisted                     │
//! │                                                                         │
//! │  InitFailure   produced by BillCounter::initialize, logged and kept    │
//! │  ├── Store        latest-bill-number query failed                      │
//! │  ├── Timeout      query did not answer within init_timeout             │
//! │  └── Malformed    stored value is not PPP-NNN                          │
//! │                                                                         │
//! │  ConfigError   ServiceConfig load/validation                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no allocation error: `BillCounter::next` is total.

use std::time::Duration;

use meridian_core::{BillNumberError, ValidationError};
use meridian_db::DbError;
use thiserror::Error;

/// Result type alias for order operations.
pub type OrderResult<T> = Result<T, OrderError>;

/// Errors returned by the order creation flow.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Invalid order: {0}")]
    Validation(#[from] ValidationError),

    #[error("Order store error: {0}")]
    Store(#[from] DbError),
}

/// Why the bill counter started from its default position.
///
/// Every variant is recoverable: the counter logs it and continues from
/// `001-000`. It never reaches an order-creation caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitFailure {
    #[error("order store query failed: {0}")]
    Store(String),

    #[error("order store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("stored bill number '{value}' is malformed: {reason}")]
    Malformed {
        value: String,
        reason: BillNumberError,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidValue(String),

    #[error("No config path available")]
    NoConfigPath,
}
