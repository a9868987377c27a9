use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

const PASSWORD_SPECIALS: &str = "@$!%*?&";

lazy_static! {
    static ref PASSWORD_CHARSET_RE: Regex = Regex::new(r"^[A-Za-z\d@$!%*?&]{8,}$").unwrap();
    static ref NAME_RE: Regex = Regex::new(r"^[a-zA-Z\s]{2,30}$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^(\+\d{1,3}[- ]?)?\d{10}$").unwrap();
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// At least 8 characters from letters, digits and `@$!%*?&`, with one of each
/// class present.
pub fn is_strong_password(value: &str) -> bool {
    PASSWORD_CHARSET_RE.is_match(value)
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if is_strong_password(value) {
        Ok(())
    } else {
        Err(invalid(
            "password_policy",
            "Password must be at least 8 characters long, contain at least one uppercase letter, one lowercase letter, one digit, and one special character.",
        ))
    }
}

/// Checked after trimming, since names are stored trimmed.
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    if NAME_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(invalid(
            "name_format",
            "Name must be between 2 and 30 characters long and contain only letters and spaces",
        ))
    }
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(value) {
        Ok(())
    } else {
        Err(invalid(
            "phone_format",
            "Phone number must be in the format +1234567890 or 1234567890",
        ))
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(invalid("blank", "must not be blank"))
    } else {
        Ok(())
    }
}

/// Emails are compared trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_policy() {
        assert!(is_strong_password("Secur3P@ss"));
        assert!(!is_strong_password("Sh0rt@"));
        assert!(!is_strong_password("alllower1@x"));
        assert!(!is_strong_password("ALLUPPER1@X"));
        assert!(!is_strong_password("NoDigits@@x"));
        assert!(!is_strong_password("NoSpecial11x"));
        assert!(!is_strong_password("Bad#Char11x"));
    }

    #[test]
    fn name_format() {
        assert!(validate_name("Ada Lovelace").is_ok());
        assert!(validate_name("A").is_err());
        assert!(validate_name("R2D2").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("\n\n").is_err());
        assert!(validate_name(" A  ").is_err());
        assert!(validate_name("  Ada ").is_ok());
    }

    #[test]
    fn phone_format() {
        assert!(validate_phone("1234567890").is_ok());
        assert!(validate_phone("+11234567890").is_ok());
        assert!(validate_phone("+91-1234567890").is_ok());
        assert!(validate_phone("+44 1234567890").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("+12345-1234567890").is_err());
    }

    #[test]
    fn blank_and_email_normalization() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank(" x ").is_ok());
        assert_eq!(normalize_email("  Foo@Example.COM "), "foo@example.com");
    }

    #[test]
    fn errors_carry_messages() {
        let err = validate_phone("nope").unwrap_err();
        assert_eq!(err.code, "phone_format");
        assert!(err.message.unwrap().contains("Phone number"));
    }
}
