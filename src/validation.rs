//! Client-side checks run before a request is sent.

use crate::error::ValidationError;
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

pub const MAX_NAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 6;

lazy_static! {
    static ref LETTERS_ONLY: Regex = Regex::new(r"^[a-zA-Z]+$").expect("name pattern is valid");
}

/// Display name: required, at most 50 characters, ASCII letters only
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    if !LETTERS_ONLY.is_match(name) {
        return Err(ValidationError::NameNotLetters);
    }
    Ok(())
}

/// Password strength plus confirmation match, checked in that order
pub fn validate_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::PasswordMissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::PasswordMissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_signup(name: &str, password: &str, confirm: &str) -> Result<(), ValidationError> {
    validate_name(name)?;
    validate_password(password, confirm)
}

/// Quantities are whole, non-negative counts
pub fn validate_quantity(quantity: i64) -> Result<u32, ValidationError> {
    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity(quantity));
    }
    u32::try_from(quantity).map_err(|_| ValidationError::QuantityTooLarge(quantity))
}

/// User ids issued by the identity provider are UUIDs
pub fn validate_user_id(user_id: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(user_id.trim()).map_err(|_| ValidationError::InvalidUserId(user_id.to_string()))
}
