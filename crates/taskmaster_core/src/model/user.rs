//! User domain model.
//!
//! # Responsibility
//! - Define the public user projection returned to callers.
//! - Define the credential record that stays inside core.
//! - Validate sign-up input before any hashing or persistence happens.
//!
//! # Invariants
//! - `User` never carries the password hash.
//! - Email is kept exactly as supplied; comparisons are exact-match.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned user identity.
pub type UserId = i64;

/// Public user projection. Safe to hand to any transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Stored user row including the password hash.
///
/// Only the auth service reads this; it is never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub user: User,
    /// PHC-formatted one-way hash.
    pub password_hash: String,
}

/// Raw sign-up input as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignUpInput {
    /// Checks that every field is present and not blank.
    ///
    /// Fields are checked in declaration order; the first missing field wins.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if self.email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if self.password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(())
    }
}

/// Validation failures for user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyEmail,
    EmptyPassword,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name is required"),
            Self::EmptyEmail => write!(f, "email is required"),
            Self::EmptyPassword => write!(f, "password is required"),
        }
    }
}

impl Error for UserValidationError {}

#[cfg(test)]
mod tests {
    use super::{SignUpInput, UserValidationError};

    fn input(name: &str, email: &str, password: &str) -> SignUpInput {
        SignUpInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn validate_accepts_complete_input() {
        assert!(input("Alice", "alice@example.com", "pw123456")
            .validate()
            .is_ok());
    }

    #[test]
    fn validate_reports_first_blank_field() {
        assert_eq!(
            input("  ", "", "").validate(),
            Err(UserValidationError::EmptyName)
        );
        assert_eq!(
            input("Alice", " \t", "pw").validate(),
            Err(UserValidationError::EmptyEmail)
        );
        assert_eq!(
            input("Alice", "alice@example.com", "").validate(),
            Err(UserValidationError::EmptyPassword)
        );
    }
}
