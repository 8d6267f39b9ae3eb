//! # Bill Numbers
//!
//! The human-readable sequential number printed on receipts.
//!
//! ## Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         PPP-NNN                                         │
//! │                                                                         │
//! │   PPP  high segment   1, 2, 3, ...     zero-padded to 3 digits          │
//! │   NNN  low segment    1..=999          zero-padded to 3 digits          │
//! │                                                                         │
//! │   001-001 → 001-002 → ... → 001-999 → 002-001 → ... → 002-999 → ...     │
//! │                                                                         │
//! │   The low segment never issues 000: after 999 it resets to 001 and     │
//! │   the high segment increments by one.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `{1, 0}` state ([`BillNumber::INITIAL`]) is never printed. It is the
//! counter position before the first order, so its successor is `001-001`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BillNumberError;

/// Largest value the low segment can hold.
pub const LOW_SEGMENT_MAX: u16 = 999;

/// Low segment value after a rollover.
pub const LOW_SEGMENT_AFTER_ROLLOVER: u16 = 1;

/// A bill number, ordered by `(high, low)`.
///
/// Field order matters: the derived `Ord` compares `high` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BillNumber {
    high: u32,
    low: u16,
}

impl BillNumber {
    /// Counter position before any order has been issued.
    pub const INITIAL: BillNumber = BillNumber { high: 1, low: 0 };

    /// Builds a bill number from its segments.
    ///
    /// ## Errors
    /// - `high` must be at least 1
    /// - `low` must be at most 999
    pub fn new(high: u32, low: u16) -> Result<Self, BillNumberError> {
        if high == 0 {
            return Err(BillNumberError::HighSegmentZero);
        }
        if low > LOW_SEGMENT_MAX {
            return Err(BillNumberError::LowSegmentOutOfRange(u32::from(low)));
        }
        Ok(BillNumber { high, low })
    }

    /// The high (prefix) segment.
    #[inline]
    pub const fn high(&self) -> u32 {
        self.high
    }

    /// The low (sequence) segment.
    #[inline]
    pub const fn low(&self) -> u16 {
        self.low
    }

    /// Returns the next bill number.
    ///
    /// ```rust
    /// use meridian_core::BillNumber;
    ///
    /// let n = BillNumber::new(1, 999).unwrap();
    /// assert_eq!(n.successor().to_string(), "002-001");
    /// ```
    pub fn successor(&self) -> BillNumber {
        let low = self.low + 1;
        if low > LOW_SEGMENT_MAX {
            BillNumber {
                high: self.high.saturating_add(1),
                low: LOW_SEGMENT_AFTER_ROLLOVER,
            }
        } else {
            BillNumber {
                high: self.high,
                low,
            }
        }
    }
}

impl Default for BillNumber {
    fn default() -> Self {
        BillNumber::INITIAL
    }
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}-{:03}", self.high, self.low)
    }
}

impl FromStr for BillNumber {
    type Err = BillNumberError;

    /// Parses `PPP-NNN`. Both segments must be non-empty and all ASCII digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (high, low) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| BillNumberError::MissingSeparator(s.to_string()))?;

        let high = parse_segment(high, s)?;
        let low = parse_segment(low, s)?;

        if low > u32::from(LOW_SEGMENT_MAX) {
            return Err(BillNumberError::LowSegmentOutOfRange(low));
        }

        // low <= 999 here, so the narrowing is lossless
        BillNumber::new(high, low as u16)
    }
}

fn parse_segment(segment: &str, input: &str) -> Result<u32, BillNumberError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BillNumberError::NonNumericSegment(input.to_string()));
    }
    segment
        .parse()
        .map_err(|_| BillNumberError::NonNumericSegment(input.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(high: u32, low: u16) -> BillNumber {
        BillNumber::new(high, low).unwrap()
    }

    #[test]
    fn test_format_pads_both_segments() {
        assert_eq!(bill(7, 3).to_string(), "007-003");
        assert_eq!(bill(12, 999).to_string(), "012-999");
        assert_eq!(bill(1000, 1).to_string(), "1000-001");
    }

    #[test]
    fn test_successor_within_segment() {
        assert_eq!(bill(7, 3).successor().to_string(), "007-004");
        assert_eq!(BillNumber::INITIAL.successor().to_string(), "001-001");
    }

    #[test]
    fn test_successor_rolls_over_to_one() {
        let next = bill(1, 999).successor();
        assert_eq!(next, bill(2, 1));
        assert_eq!(next.to_string(), "002-001");
    }

    #[test]
    fn test_successor_is_strictly_greater() {
        let mut current = bill(1, 995);
        for _ in 0..10 {
            let next = current.successor();
            assert!(next > current, "{} should follow {}", next, current);
            current = next;
        }
        assert_eq!(current, bill(2, 6));
    }

    #[test]
    fn test_one_high_segment_issues_999_numbers() {
        let mut current = BillNumber::INITIAL;
        let mut issued = 0;
        while current.successor().high() == 1 {
            current = current.successor();
            issued += 1;
        }
        assert_eq!(issued, 999);
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!("012-998".parse::<BillNumber>().unwrap(), bill(12, 998));
        assert_eq!("1-0".parse::<BillNumber>().unwrap(), bill(1, 0));
        assert_eq!(" 003-045 ".parse::<BillNumber>().unwrap(), bill(3, 45));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "012998", "abc-001", "001-xyz", "-001", "001-", "001-002-003", "+1-002", "001- 02"] {
            assert!(
                input.parse::<BillNumber>().is_err(),
                "'{}' should not parse",
                input
            );
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(
            "001-1000".parse::<BillNumber>(),
            Err(BillNumberError::LowSegmentOutOfRange(1000))
        ));
        assert!(matches!(
            "000-005".parse::<BillNumber>(),
            Err(BillNumberError::HighSegmentZero)
        ));
    }

    #[test]
    fn test_display_parse_agree() {
        let original = bill(42, 7);
        let reparsed: BillNumber = original.to_string().parse().unwrap();
        assert_eq!(original, reparsed);
    }
}
