//! Authentication request and response bodies

use serde::{Deserialize, Serialize};
use crate::utils::errors::ValidationError;
use super::driver::validate_new_password;
use super::status::UserRole;
use super::user::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Token and account returned by login and setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupData {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SetupData {
    /// Build the first-admin body after checking the confirmation
    pub fn from_draft(
        name: &str,
        email: &str,
        password: &str,
        repeat: &str,
    ) -> Result<Self, ValidationError> {
        if password != repeat {
            return Err(ValidationError::PasswordMismatch);
        }
        if name.trim().is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }
        if email.trim().is_empty() {
            return Err(ValidationError::Required { field: "email" });
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupStatus {
    pub is_setup_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

impl ResetPasswordRequest {
    /// Length, confirmation and token checks, in the order the reset form applies them
    pub fn from_draft(token: &str, password: &str, repeat: &str) -> Result<Self, ValidationError> {
        if password.chars().count() < super::driver::MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: super::driver::MIN_PASSWORD_LENGTH,
            });
        }
        validate_new_password(password, repeat)?;
        if token.trim().is_empty() {
            return Err(ValidationError::MissingToken);
        }
        Ok(Self {
            token: token.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_checks_length_before_match() {
        assert_eq!(
            ResetPasswordRequest::from_draft("tok", "abc", "xyz"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            ResetPasswordRequest::from_draft("tok", "abcdef", "abcdeg"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            ResetPasswordRequest::from_draft("", "abcdef", "abcdef"),
            Err(ValidationError::MissingToken)
        );
        assert!(ResetPasswordRequest::from_draft("tok", "abcdef", "abcdef").is_ok());
    }

    #[test]
    fn test_setup_requires_matching_passwords() {
        assert_eq!(
            SetupData::from_draft("Admin", "admin@example.com", "one", "two"),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_login_omits_missing_role() {
        let body = LoginCredentials {
            email: "a@b.c".into(),
            password: "secret".into(),
            role: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"email": "a@b.c", "password": "secret"})
        );
    }
}
