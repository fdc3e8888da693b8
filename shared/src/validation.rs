//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Length rules live on the request types as `validator` derives;
//! the checks here cover what the derives cannot express.

use regex_lite::Regex;

/// Minimum user name length
pub const USER_NAME_MIN_LEN: usize = 4;
/// Maximum user name length
pub const USER_NAME_MAX_LEN: usize = 32;
/// Minimum password length
pub const PASSWORD_MIN_LEN: usize = 8;
/// Maximum password length
pub const PASSWORD_MAX_LEN: usize = 128;

/// Validate user name format
///
/// Letters, digits, `_`, `-` and `.` only, starting with a letter or digit.
pub fn validate_user_name(user_name: &str) -> Result<(), String> {
    let len = user_name.chars().count();
    if len < USER_NAME_MIN_LEN {
        return Err(format!(
            "User name must be at least {} characters",
            USER_NAME_MIN_LEN
        ));
    }
    if len > USER_NAME_MAX_LEN {
        return Err(format!(
            "User name must be at most {} characters",
            USER_NAME_MAX_LEN
        ));
    }
    let pattern = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$")
        .map_err(|e| format!("Invalid user name pattern: {}", e))?;
    if !pattern.is_match(user_name) {
        return Err(
            "User name may only contain letters, digits, '_', '-' and '.'".to_string(),
        );
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    // Characters, not bytes, to agree with the `validator` length derive
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        ));
    }
    if len > PASSWORD_MAX_LEN {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate that a text field is not blank after trimming
pub fn validate_not_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    Ok(())
}
