//! Input validation for account registration.

use thiserror::Error;

use crate::db::Role;

/// Maximum name length.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum phone length.
pub const MAX_PHONE_LENGTH: usize = 32;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields are missing or blank.
    #[error("All fields are required")]
    MissingFields,

    /// Role is not one of the known roles.
    #[error("Invalid role")]
    InvalidRole,

    /// Name is too long.
    #[error("name must be at most {MAX_NAME_LENGTH} characters")]
    NameTooLong,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// Phone is too long or contains invalid characters.
    #[error("invalid phone number")]
    PhoneInvalid,
}

/// Validate a display name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

/// Validate an email address.
///
/// Accepts anything shaped like `local@domain.tld`: a non-empty local part,
/// then a domain with a dot that is neither its first nor last character.
///
/// # Examples
///
/// ```
/// use estate::auth::validation::validate_email;
///
/// assert!(validate_email("amina@example.com").is_ok());
/// assert!(validate_email("amina@example").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let well_formed = email
        .char_indices()
        .filter(|&(_, c)| c == '@')
        .any(|(at, _)| at > 0 && has_inner_dot(&email[at + 1..]));

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::EmailInvalidFormat)
    }
}

fn has_inner_dot(domain: &str) -> bool {
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Validate a contact phone.
///
/// Digits, spaces and the usual punctuation (`+ - ( )`) are allowed.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if phone.len() > MAX_PHONE_LENGTH {
        return Err(ValidationError::PhoneInvalid);
    }
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ');
    if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PhoneInvalid);
    }
    Ok(())
}

/// Parse a role name, which must match exactly.
pub fn validate_role(role: &str) -> Result<Role, ValidationError> {
    if role.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    role.parse().map_err(|_| ValidationError::InvalidRole)
}
