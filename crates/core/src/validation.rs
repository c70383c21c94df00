//! Shared field validation helpers.
//!
//! Reusable checks for string enumerations and non-negative amounts used by
//! several domain modules.

use rust_decimal::Decimal;

use crate::error::CoreError;

/// Validate that `value` is one of `allowed`.
///
/// Returns a `CoreError::Validation` naming the field and the accepted values.
pub fn validate_one_of(value: &str, allowed: &[&str], field: &str) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {field} '{value}'. Must be one of: {}",
            allowed.join(", ")
        )))
    }
}

/// Validate that a monetary or hour amount is not negative.
pub fn validate_non_negative(value: Decimal, field: &str) -> Result<(), CoreError> {
    if value < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: &[&str] = &["red", "green"];

    #[test]
    fn accepts_listed_value() {
        assert!(validate_one_of("red", COLORS, "color").is_ok());
    }

    #[test]
    fn rejects_unlisted_value_with_choices_in_message() {
        let err = validate_one_of("blue", COLORS, "color").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("blue"));
        assert!(msg.contains("red, green"));
    }

    #[test]
    fn zero_is_not_negative() {
        assert!(validate_non_negative(Decimal::ZERO, "amount").is_ok());
    }

    #[test]
    fn rejects_negative_amount() {
        assert!(validate_non_negative(Decimal::new(-1, 1), "amount").is_err());
    }
}
