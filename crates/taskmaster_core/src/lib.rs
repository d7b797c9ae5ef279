//! Core domain logic for TaskMaster.
//! This crate is the single source of truth for authentication and
//! task-ownership invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::password::{CredentialHasher, HashCost, PasswordError};
pub use auth::session::{resolve_caller, Caller, SessionData, SESSION_USER_ID_KEY};
pub use logging::{default_log_level, init_console_logging, init_logging, logging_status, LogTarget};
pub use model::task::{
    NewTask, Task, TaskDraft, TaskId, TaskPatch, TaskStatus, TaskUpdate, TaskValidationError,
};
pub use model::user::{SignUpInput, User, UserCredentials, UserId, UserValidationError};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::auth_service::{logout, AuthService};
pub use service::error::{ServiceError, ServiceResult};
pub use service::gate::{authorize, Owner};
pub use service::task_service::TaskService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
