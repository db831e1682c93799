//! Server-side input validation
//!
//! Every check fails with [`ApiError::InvalidJson`], whatever the client
//! side already enforced.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::ApiError;

/// Maximum allowed password length (prevent DoS with very large passwords)
pub const MAX_PASSWORD_LENGTH: usize = 256;
/// Minimum password length at registration
pub const MIN_PASSWORD_LENGTH: usize = 12;
pub const MAX_FULL_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is valid")
});

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+62|0)\d{8,13}$").expect("phone pattern is valid"));

fn invalid(message: &str) -> ApiError {
    ApiError::InvalidJson(message.to_string())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.len() > MAX_EMAIL_LENGTH || !EMAIL_PATTERN.is_match(email) {
        return Err(invalid("Invalid email"));
    }
    Ok(())
}

/// Indonesian mobile numbers: `+62` or `0` prefix followed by 8 to 13 digits
pub fn validate_phone_number(phone_number: &str) -> Result<(), ApiError> {
    if !PHONE_PATTERN.is_match(phone_number) {
        return Err(invalid("Invalid phone number"));
    }
    Ok(())
}

pub fn validate_full_name(full_name: &str) -> Result<(), ApiError> {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        return Err(invalid("Full name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(ApiError::InvalidJson(format!(
            "Full name exceeds maximum length of {} characters",
            MAX_FULL_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Length bound applied to every password the server hashes or verifies
pub fn validate_password_length(password: &str) -> Result<(), ApiError> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::InvalidJson(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Registration password policy: at least 12 characters with a lowercase
/// letter, an uppercase letter, a digit and a symbol
pub fn validate_new_password(password: &str) -> Result<(), ApiError> {
    validate_password_length(password)?;

    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if !(long_enough && has_lower && has_upper && has_digit && has_symbol) {
        return Err(invalid("Invalid password"));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ApiError::InvalidJson(format!(
            "Description exceeds maximum length of {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_rating(rating: i64) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(invalid("Rating must be between 1 and 5"));
    }
    Ok(())
}

/// Combine `YYYY-MM-DD` and `HH:MM[:SS]` into a UTC instant
pub fn parse_reservation_datetime(date: &str, time: &str) -> Result<DateTime<Utc>, ApiError> {
    if date.len() != 10 {
        return Err(invalid("Invalid date"));
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid("Invalid date"))?;

    let time = match time.len() {
        5 => NaiveTime::parse_from_str(time, "%H:%M"),
        8 => NaiveTime::parse_from_str(time, "%H:%M:%S"),
        _ => return Err(invalid("Invalid time")),
    }
    .map_err(|_| invalid("Invalid time"))?;

    Ok(date.and_time(time).and_utc())
}
