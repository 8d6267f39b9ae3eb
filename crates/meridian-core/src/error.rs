//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── ValidationError   - Order request validation failures             │
//! │  └── BillNumberError   - Text that is not a PPP-NNN bill number        │
//! │                                                                         │
//! │  meridian-db errors (separate crate)                                   │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  meridian-orders errors                                                │
//! │  ├── OrderError        - What order creation returns to its caller     │
//! │  └── InitFailure       - Logged, never returned (counter start-up)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store access so a rejected order never consumes
/// a bill number.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Order total does not add up.
    #[error("total {total} does not match computed total {computed}")]
    TotalMismatch { total: i64, computed: i64 },

    /// Amounts whose sum does not fit in an `i64`.
    #[error("{field} exceeds the supported amount range")]
    AmountOverflow { field: String },

    /// Cash handed over is less than the order total.
    #[error("cash received {received} is less than total {total}")]
    InsufficientCash { received: i64, total: i64 },

    /// Change due disagrees with cash received minus total.
    #[error("change due {change_due} should be {expected}")]
    ChangeMismatch { change_due: i64, expected: i64 },
}

// =============================================================================
// Bill Number Error
// =============================================================================

/// Text that is not a valid `PPP-NNN` bill number.
///
/// Callers that reconcile against persisted data treat every variant the
/// same way as "no previous bill number".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillNumberError {
    #[error("bill number '{0}' has no '-' separator")]
    MissingSeparator(String),

    #[error("bill number '{0}' has a non-numeric segment")]
    NonNumericSegment(String),

    #[error("low segment {0} exceeds 999")]
    LowSegmentOutOfRange(u32),

    #[error("high segment must be at least 1")]
    HighSegmentZero,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::TotalMismatch {
            total: 1000,
            computed: 1050,
        };
        assert_eq!(
            err.to_string(),
            "total 1000 does not match computed total 1050"
        );
    }

    #[test]
    fn test_bill_number_error_messages() {
        let err = BillNumberError::MissingSeparator("012998".to_string());
        assert_eq!(err.to_string(), "bill number '012998' has no '-' separator");
        assert_eq!(
            BillNumberError::LowSegmentOutOfRange(1000).to_string(),
            "low segment 1000 exceeds 999"
        );
    }

    #[test]
    fn test_cash_error_messages() {
        let err = ValidationError::ChangeMismatch {
            change_due: 50,
            expected: 55,
        };
        assert_eq!(err.to_string(), "change due 50 should be 55");
        assert_eq!(
            ValidationError::AmountOverflow { field: "total".to_string() }.to_string(),
            "total exceeds the supported amount range"
        );
    }

    #[test]
    fn test_out_of_range_message() {
        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");
    }
}
