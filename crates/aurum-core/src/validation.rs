//! # Validation Module
//!
//! Input validation for the estimation entry screens.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Entry form                                                   │
//! │  ├── Raw text from weight / rate / charge fields                       │
//! │  └── THIS MODULE: parse + reject before anything is priced             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Pricing (aurum_core::pricing)                                │
//! │  └── Total functions; trusts its inputs, never fails                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE estimation_number                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aurum_core::validation::{parse_weight, validate_piece_count};
//! use rust_decimal_macros::dec;
//!
//! assert_eq!(parse_weight(" 5.500 ").unwrap(), dec!(5.500));
//! assert!(parse_weight("-1").is_err());
//! assert_eq!(validate_piece_count(2).unwrap(), 2);
//! ```

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::MAX_PIECE_COUNT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest customer name accepted.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;

/// Longest chit / advance reference accepted.
pub const MAX_REFERENCE_LEN: usize = 50;

/// Digits in an Indian mobile number (without country code).
pub const MOBILE_DIGITS: usize = 10;

// =============================================================================
// Numeric Parsers
// =============================================================================

/// Parses a non-negative decimal typed into a form field.
fn parse_non_negative(input: &str, field: &str) -> ValidationResult<Decimal> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let value = Decimal::from_str(input).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a number", input),
    })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(value)
}

/// Parses a weight in grams.
///
/// ## Rules
/// - Must not be empty
/// - Must be a plain decimal number (`5.5`, `12.345`)
/// - Must not be negative (zero is allowed, e.g. stone weight)
pub fn parse_weight(input: &str) -> ValidationResult<Decimal> {
    parse_non_negative(input, "weight")
}

/// Parses a rupee amount (rate, making charge, chit or advance credit).
///
/// ## Example
/// ```rust
/// use aurum_core::validation::parse_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_amount("6123.45").unwrap(), dec!(6123.45));
/// assert!(parse_amount("abc").is_err());
/// assert!(parse_amount("").is_err());
/// ```
pub fn parse_amount(input: &str) -> ValidationResult<Decimal> {
    parse_non_negative(input, "amount")
}

/// Parses a percentage (wastage %, making charge %, loss %).
///
/// ## Rules
/// - Must not be negative
/// - Values above 100 are allowed; a 120% making charge is unusual, not invalid
pub fn parse_percentage(input: &str) -> ValidationResult<Decimal> {
    parse_non_negative(input, "percentage")
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a piece count.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_PIECE_COUNT (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Manual Entry: Pieces                                                   │
/// │                                                                         │
/// │  Clerk enters: 2                                                       │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_piece_count(2) ← THIS FUNCTION                               │
/// │       │                                                                 │
/// │       ├── pcs < 1?   → Error: "piece count must be between 1 and 999"  │
/// │       ├── pcs > 999? → Error: "piece count must be between 1 and 999"  │
/// │       └── OK → u32 stored on the item                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_piece_count(count: i64) -> ValidationResult<u32> {
    if !(1..=MAX_PIECE_COUNT).contains(&count) {
        return Err(ValidationError::OutOfRange {
            field: "piece count".to_string(),
            min: 1,
            max: MAX_PIECE_COUNT,
        });
    }

    u32::try_from(count).map_err(|_| ValidationError::OutOfRange {
        field: "piece count".to_string(),
        min: 1,
        max: MAX_PIECE_COUNT,
    })
}

/// Validates a tax percentage (0% to 100%).
pub fn validate_tax_percent(percent: Decimal) -> ValidationResult<()> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "tax percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Rejects a stone weight heavier than the piece it is set in.
///
/// Pricing itself floors net weight at zero; this catches the typo earlier.
pub fn validate_gross_vs_stone(gross: Decimal, stone: Decimal) -> ValidationResult<()> {
    if stone > gross {
        return Err(ValidationError::StoneExceedsGross {
            gross: gross.to_string(),
            stone: stone.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates and normalizes a mobile number.
///
/// ## Rules
/// - Spaces and hyphens are ignored
/// - An optional `+91` / `91` country prefix on a 12-digit number is stripped
/// - Exactly 10 digits must remain
///
/// ## Example
/// ```rust
/// use aurum_core::validation::validate_mobile;
///
/// assert_eq!(validate_mobile("98765 43210").unwrap(), "9876543210");
/// assert_eq!(validate_mobile("+91-9876543210").unwrap(), "9876543210");
/// assert!(validate_mobile("12345").is_err());
/// ```
pub fn validate_mobile(mobile: &str) -> ValidationResult<String> {
    let compact: String = mobile
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if compact.is_empty() {
        return Err(ValidationError::Required {
            field: "mobile".to_string(),
        });
    }

    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    let digits = match digits.strip_prefix("91") {
        Some(rest) if digits.len() == MOBILE_DIGITS + 2 => rest,
        _ => digits,
    };

    if digits.len() != MOBILE_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "mobile".to_string(),
            reason: format!("must be {} digits", MOBILE_DIGITS),
        });
    }

    Ok(digits.to_string())
}

/// Validates a customer name and returns it trimmed.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a chit account or advance receipt reference.
pub fn validate_reference_id(reference: &str) -> ValidationResult<String> {
    let reference = reference.trim();

    if reference.is_empty() {
        return Err(ValidationError::Required {
            field: "reference".to_string(),
        });
    }

    if reference.len() > MAX_REFERENCE_LEN {
        return Err(ValidationError::TooLong {
            field: "reference".to_string(),
            max: MAX_REFERENCE_LEN,
        });
    }

    Ok(reference.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("5.5").unwrap(), dec!(5.5));
        assert_eq!(parse_weight("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_weight("  10.250 ").unwrap(), dec!(10.250));

        assert!(matches!(
            parse_weight(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_weight("5,5g"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_weight("-0.5"),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_parse_amount_and_percentage() {
        assert_eq!(parse_amount("500").unwrap(), dec!(500));
        assert_eq!(parse_percentage("10").unwrap(), dec!(10));
        assert_eq!(parse_percentage("120").unwrap(), dec!(120));
        assert!(parse_amount("ten").is_err());
        assert!(parse_percentage("-3").is_err());
    }

    #[test]
    fn test_validate_piece_count() {
        assert_eq!(validate_piece_count(1).unwrap(), 1);
        assert_eq!(validate_piece_count(999).unwrap(), 999);

        assert!(validate_piece_count(0).is_err());
        assert!(validate_piece_count(-1).is_err());
        assert!(validate_piece_count(1000).is_err());
    }

    #[test]
    fn test_validate_tax_percent() {
        assert!(validate_tax_percent(dec!(0)).is_ok());
        assert!(validate_tax_percent(dec!(3)).is_ok());
        assert!(validate_tax_percent(dec!(100)).is_ok());
        assert!(validate_tax_percent(dec!(100.01)).is_err());
        assert!(validate_tax_percent(dec!(-1)).is_err());
    }

    #[test]
    fn test_validate_gross_vs_stone() {
        assert!(validate_gross_vs_stone(dec!(10), dec!(2)).is_ok());
        assert!(validate_gross_vs_stone(dec!(10), dec!(10)).is_ok());
        assert!(validate_gross_vs_stone(dec!(10), dec!(10.001)).is_err());
    }

    #[test]
    fn test_validate_mobile() {
        assert_eq!(validate_mobile("9876543210").unwrap(), "9876543210");
        assert_eq!(validate_mobile("+91 98765 43210").unwrap(), "9876543210");
        assert_eq!(validate_mobile("919876543210").unwrap(), "9876543210");

        assert!(validate_mobile("").is_err());
        assert!(validate_mobile("98765").is_err());
        assert!(validate_mobile("98765abcde").is_err());
        assert!(validate_mobile("+1 9876543210").is_err());
    }

    #[test]
    fn test_validate_customer_name() {
        assert_eq!(validate_customer_name("  Lakshmi R ").unwrap(), "Lakshmi R");
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_reference_id() {
        assert_eq!(validate_reference_id(" CH-1042 ").unwrap(), "CH-1042");
        assert!(validate_reference_id("").is_err());
        assert!(validate_reference_id(&"9".repeat(51)).is_err());
    }
}
