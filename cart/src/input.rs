//! Boundary validation for user-entered cart values.
//!
//! The reducer tolerates bad input by ignoring it; these parsers reject it
//! before any action is built so the user gets an error instead of silence.

use crate::types::ProductId;
use thiserror::Error;

/// Rejected user input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Input was empty or whitespace
    #[error("Value is required")]
    Empty,

    /// Input was not a whole number
    #[error("Not a whole number: {0:?}")]
    NotANumber(String),

    /// Quantity or count below 1
    #[error("Must be at least 1, got {0}")]
    TooSmall(i64),

    /// Quantity or count above the supported maximum
    #[error("Must be at most {max}, got {value}")]
    TooLarge {
        /// Parsed value
        value: String,
        /// Largest accepted value
        max: u32,
    },
}

/// Parse a quantity field for `AddItem`
///
/// # Errors
///
/// Returns [`InputError`] for empty, fractional, non-numeric, or sub-1 input.
pub fn parse_quantity(raw: &str) -> Result<u32, InputError> {
    let value = parse_whole(raw)?;
    if value < 1 {
        return Err(InputError::TooSmall(value));
    }
    u32::try_from(value).map_err(|_| InputError::TooLarge {
        value: value.to_string(),
        max: u32::MAX,
    })
}

/// Parse a count field for `UpdateCount`
///
/// Same rules as [`parse_quantity`]; the result is ready for
/// `CartAction::UpdateCount`.
///
/// # Errors
///
/// Returns [`InputError`] for empty, fractional, non-numeric, or sub-1 input.
pub fn parse_count(raw: &str) -> Result<i64, InputError> {
    parse_quantity(raw).map(i64::from)
}

/// Validate a product identifier taken from a form or URL
///
/// # Errors
///
/// Returns [`InputError::Empty`] if the id is blank.
pub fn parse_product_id(raw: &str) -> Result<ProductId, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(ProductId::new(trimmed))
}

fn parse_whole(raw: &str) -> Result<i64, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    trimmed.parse::<i64>().map_err(|error| {
        use std::num::IntErrorKind;
        match error.kind() {
            IntErrorKind::PosOverflow => InputError::TooLarge {
                value: trimmed.to_string(),
                max: u32::MAX,
            },
            _ => InputError::NotANumber(trimmed.to_string()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_whole_numbers() {
        assert_eq!(parse_quantity("1"), Ok(1));
        assert_eq!(parse_quantity(" 12 "), Ok(12));
        assert_eq!(parse_count("7"), Ok(7));
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert_eq!(parse_quantity("0"), Err(InputError::TooSmall(0)));
        assert_eq!(parse_count("-3"), Err(InputError::TooSmall(-3)));
    }

    #[test]
    fn rejects_fractional_and_garbage() {
        assert_eq!(
            parse_quantity("1.5"),
            Err(InputError::NotANumber("1.5".to_string()))
        );
        assert_eq!(
            parse_quantity("two"),
            Err(InputError::NotANumber("two".to_string()))
        );
        assert_eq!(parse_quantity("   "), Err(InputError::Empty));
    }

    #[test]
    fn rejects_values_beyond_u32() {
        assert!(matches!(
            parse_quantity("4294967296"),
            Err(InputError::TooLarge { .. })
        ));
        assert!(matches!(
            parse_quantity("99999999999999999999999"),
            Err(InputError::TooLarge { .. })
        ));
    }

    #[test]
    fn product_id_is_trimmed_and_required() {
        assert_eq!(parse_product_id(" 17 "), Ok(ProductId::new("17")));
        assert_eq!(parse_product_id(""), Err(InputError::Empty));
    }
}
