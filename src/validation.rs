//! Field-level validation rules.
//!
//! Pure functions over raw field values. String validators are wired into
//! the payload structs through `validator`'s `custom` hook; the year
//! validators are called directly by the services since year is optional
//! on every payload that carries one.

use std::borrow::Cow;

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Username: non-empty, `[A-Za-z0-9_]` only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(invalid(
            "username_empty",
            "Username cannot be empty or whitespace",
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(invalid(
            "username_invalid_chars",
            "Username can only contain letters, numbers, and underscores",
        ));
    }
    Ok(())
}

/// Password: non-empty, at least 6 characters, at least one letter and one
/// number. Optional-password contexts skip this entirely when the field is
/// absent.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(invalid(
            "password_empty",
            "Password cannot be empty or whitespace",
        ));
    }
    if password.len() < 6 {
        return Err(invalid(
            "password_min_length",
            "Password must be at least 6 characters long",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(
            "password_missing_letter",
            "Password must contain at least one letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "password_missing_number",
            "Password must contain at least one number",
        ));
    }
    Ok(())
}

/// Generic required text field.
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("field_empty", "Field cannot be empty or whitespace"));
    }
    Ok(())
}

/// Strict year check: 1000 up to the current calendar year.
pub fn validate_year(year: i32) -> Result<(), ValidationError> {
    let current_year = Utc::now().year();
    if year < 1000 || year > current_year {
        return Err(invalid(
            "year_range",
            format!("Year must be between 1000 and {}", current_year),
        ));
    }
    Ok(())
}

/// Future-only year check used on create and update paths; no lower bound.
pub fn validate_year_not_future(year: i32) -> Result<(), ValidationError> {
    let current_year = Utc::now().year();
    if year > current_year {
        return Err(invalid(
            "year_future",
            format!("Year cannot be greater than {}", current_year),
        ));
    }
    Ok(())
}

/// ISBN shape check, checksum-free.
///
/// Hyphens and spaces are stripped before checking; the stored value stays
/// the original string. ISBN-10 allows a trailing `X`/`x` check character,
/// ISBN-13 must be all digits.
pub fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    let cleaned: Vec<char> = isbn.chars().filter(|c| *c != '-' && *c != ' ').collect();

    match cleaned.len() {
        10 => {
            let (body, check) = cleaned.split_at(9);
            let body_ok = body.iter().all(|c| c.is_ascii_digit());
            let check_ok = check[0].is_ascii_digit() || check[0].eq_ignore_ascii_case(&'X');
            if !(body_ok && check_ok) {
                return Err(invalid("isbn_10_invalid", "Invalid ISBN-10 format"));
            }
        }
        13 => {
            if !cleaned.iter().all(|c| c.is_ascii_digit()) {
                return Err(invalid("isbn_13_invalid", "Invalid ISBN-13 format"));
            }
        }
        _ => {
            return Err(invalid(
                "isbn_length",
                "ISBN must be 10 or 13 characters (excluding hyphens)",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};

    #[test]
    fn username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("bad-name!").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("pass123").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("ab1").is_err());
        assert!(validate_password("abcdefg").is_err());
        assert!(validate_password("1234567").is_err());
    }

    #[test]
    fn not_empty_rule() {
        assert!(validate_not_empty("Dune").is_ok());
        assert!(validate_not_empty("  \t ").is_err());
    }

    #[test]
    fn year_rules() {
        let current = Utc::now().year();
        assert!(validate_year(1000).is_ok());
        assert!(validate_year(current).is_ok());
        assert!(validate_year(999).is_err());
        assert!(validate_year(current + 1).is_err());

        // The future-only variant has no lower bound.
        assert!(validate_year_not_future(999).is_ok());
        assert!(validate_year_not_future(current).is_ok());
        assert!(validate_year_not_future(current + 1).is_err());
    }

    #[test]
    fn isbn_shapes() {
        assert!(validate_isbn("0-306-40615-2").is_ok());
        assert!(validate_isbn("123456789X").is_ok());
        assert!(validate_isbn("123456789x").is_ok());
        assert!(validate_isbn("978-0-306-40615-7").is_ok());
        assert!(validate_isbn("9780306406157").is_ok());

        assert!(validate_isbn("12345").is_err());
        assert!(validate_isbn("12345678901234").is_err());
        assert!(validate_isbn("12345678AX").is_err());
        assert!(validate_isbn("123456789012X").is_err());
        assert!(validate_isbn("").is_err());
    }

    #[test]
    fn isbn_length_error_mentions_length() {
        let err = validate_isbn("12345").unwrap_err();
        assert_eq!(
            err.message.as_deref(),
            Some("ISBN must be 10 or 13 characters (excluding hyphens)")
        );
    }
}
