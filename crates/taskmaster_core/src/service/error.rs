//! Service-level error taxonomy.
//!
//! This is the only error type surfaced to transports. Each variant has a
//! stable machine-readable `code()`.

use crate::auth::password::PasswordError;
use crate::model::task::TaskValidationError;
use crate::model::user::UserValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No identity for an operation that requires one.
    Unauthenticated,
    /// Unknown email or wrong password. The two are never distinguished.
    InvalidCredentials,
    /// Uniqueness violation, e.g. duplicate email.
    Conflict(String),
    /// Missing/blank required field or out-of-enumeration value.
    Validation(String),
    /// Task missing, or owned by someone else.
    NotFound,
    /// Persistence cannot be reached or returned unusable data.
    StoreUnavailable(String),
    /// Failure inside core that is not the caller's fault.
    Internal(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "not authenticated"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::Conflict(message) => write!(f, "{message}"),
            Self::Validation(message) => write!(f, "{message}"),
            Self::NotFound => write!(f, "task not found"),
            // Store details go to logs, not to callers.
            Self::StoreUnavailable(_) => write!(f, "storage is unavailable"),
            Self::Internal(_) => write!(f, "internal error"),
        }
    }
}

impl Error for ServiceError {}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { .. } => Self::NotFound,
            RepoError::Conflict(message) => Self::Conflict(message),
            // The session points at a user that was deleted.
            RepoError::MissingReference(_) => Self::Unauthenticated,
            RepoError::Db(err) => Self::StoreUnavailable(err.to_string()),
            RepoError::InvalidData(message) => Self::StoreUnavailable(message),
        }
    }
}

impl From<UserValidationError> for ServiceError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(value: PasswordError) -> Self {
        Self::Internal(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;
    use crate::repo::RepoError;

    #[test]
    fn not_found_from_repo_hides_entity_and_id() {
        let err = ServiceError::from(RepoError::NotFound {
            entity: "task",
            id: 42,
        });
        assert_eq!(err, ServiceError::NotFound);
        assert_eq!(err.to_string(), "task not found");
    }

    #[test]
    fn store_failures_do_not_leak_details() {
        let err = ServiceError::from(RepoError::InvalidData("bad row".to_string()));
        assert_eq!(err.code(), "STORE_UNAVAILABLE");
        assert!(!err.to_string().contains("bad row"));
    }
}
