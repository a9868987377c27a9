use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::repo_types::User;
use crate::validation::{validate_name, validate_password, validate_phone};

/// Request body for user registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

/// Request body for login. Only the email shape is checked so that a
/// password failing today's policy still gets "Invalid credentials".
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(alias = "refresh_token")]
    pub refresh_token: String,
}

/// Access/refresh pair returned by login and refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            phone: u.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_reports_each_bad_field() {
        let req = RegisterRequest {
            email: "not-an-email".into(),
            password: "weak".into(),
            name: "X".into(),
            phone: "12".into(),
        };
        let errs = req.validate().unwrap_err();
        let fields = errs.field_errors();
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn register_request_accepts_good_input() {
        let req = RegisterRequest {
            email: "ada@example.com".into(),
            password: "Secur3P@ss".into(),
            name: "Ada Lovelace".into(),
            phone: "+11234567890".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn register_request_rejects_whitespace_name() {
        let req = RegisterRequest {
            email: "ada@example.com".into(),
            password: "Secur3P@ss".into(),
            name: "   ".into(),
            phone: "1234567890".into(),
        };
        let errs = req.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("name"));
    }

    #[test]
    fn token_pair_uses_camel_case() {
        let json = serde_json::to_value(TokenPair {
            access_token: "a".into(),
            refresh_token: "r".into(),
        })
        .unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
    }

    #[test]
    fn refresh_request_accepts_both_spellings() {
        let a: RefreshRequest = serde_json::from_str(r#"{"refreshToken":"t"}"#).unwrap();
        let b: RefreshRequest = serde_json::from_str(r#"{"refresh_token":"t"}"#).unwrap();
        assert_eq!(a.refresh_token, b.refresh_token);
    }
}
