//! Input validation shared by the HTTP handlers.
//!
//! Every function returns [`CoreError::Validation`] with a message that is
//! safe to show to the caller.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_PERSON_NAME_LENGTH: usize = 150;
pub const MAX_NAME_LENGTH: usize = 256;
pub const MAX_SLUG_LENGTH: usize = 50;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

/// Username that would shadow the `/users/me` route.
pub const RESERVED_USERNAME: &str = "me";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("static regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("static regex"));

pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::Validation("username must not be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if username == RESERVED_USERNAME {
        return Err(CoreError::Validation(format!(
            "username '{RESERVED_USERNAME}' is reserved"
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(CoreError::Validation(
            "username may contain only letters, digits and @/./+/-/_".into(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(CoreError::Validation(format!(
            "email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// `first_name` / `last_name`. Empty is allowed.
pub fn validate_person_name(field: &str, value: &str) -> Result<(), CoreError> {
    if value.chars().count() > MAX_PERSON_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_PERSON_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Display name of a title, category, or genre.
pub fn validate_name(value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "slug must be between 1 and {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use only latin letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

/// A title's release year must be positive and not after `current_year`.
pub fn validate_year(year: i32, current_year: i32) -> Result<(), CoreError> {
    if year <= 0 {
        return Err(CoreError::Validation("year must be positive".into()));
    }
    if year > current_year {
        return Err(CoreError::Validation(format!(
            "year {year} is in the future (current year is {current_year})"
        )));
    }
    Ok(())
}

pub fn validate_score(score: i32) -> Result<(), CoreError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(CoreError::Validation(format!(
            "score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )));
    }
    Ok(())
}

/// Body text of a review or comment.
pub fn validate_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("text must not be empty".into()));
    }
    Ok(())
}
