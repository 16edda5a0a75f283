//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! here before anything reaches the repositories.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: vendor, menu item, discount, student
pub const MAX_NAME_LEN: usize = 100;

/// Usernames
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 50;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Short identifiers: phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Descriptions, addresses
pub const MAX_TEXT_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a username (length bounds)
pub fn validate_username(username: &str) -> Result<(), AppError> {
    if username.trim().is_empty() {
        return Err(AppError::validation("username must not be empty"));
    }
    if username.len() < MIN_USERNAME_LEN || username.len() > MAX_USERNAME_LEN {
        return Err(AppError::validation(format!(
            "username must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} chars"
        )));
    }
    Ok(())
}

/// Validate a raw password (length bounds, checked before hashing)
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN || password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} chars"
        )));
    }
    Ok(())
}

/// Validate a discount percentage (0–100 inclusive, finite)
pub fn validate_percentage(percentage: f64) -> Result<(), AppError> {
    if !percentage.is_finite() {
        return Err(AppError::validation(format!(
            "percentage must be a finite number, got {percentage}"
        )));
    }
    if !(0.0..=100.0).contains(&percentage) {
        return Err(AppError::validation(format!(
            "percentage must be between 0 and 100, got {percentage}"
        )));
    }
    Ok(())
}

/// Validate a discount window (start must not be after end)
pub fn validate_window(starts_at: i64, ends_at: i64) -> Result<(), AppError> {
    if ends_at < starts_at {
        return Err(AppError::validation(
            "ends_at must be on or after starts_at",
        ));
    }
    Ok(())
}

/// Validate a menu price (non-negative minor units)
pub fn validate_price(price: i64) -> Result<(), AppError> {
    if price < 0 {
        return Err(AppError::validation(format!(
            "price must be non-negative, got {price}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_empty_and_overlong() {
        assert!(validate_required_text("Nasi Goreng", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(101), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_percentage_bounds_are_inclusive() {
        assert!(validate_percentage(0.0).is_ok());
        assert!(validate_percentage(100.0).is_ok());
        assert!(validate_percentage(-0.1).is_err());
        assert!(validate_percentage(100.1).is_err());
        assert!(validate_percentage(f64::NAN).is_err());
    }

    #[test]
    fn test_window_allows_equal_bounds() {
        assert!(validate_window(100, 100).is_ok());
        assert!(validate_window(100, 99).is_err());
    }
}
