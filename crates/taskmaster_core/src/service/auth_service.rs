//! Auth use-case service.
//!
//! # Responsibility
//! - Sign-up, login, logout and current-user lookup.
//! - Attach or clear the identity on the caller's explicit session value.
//!
//! # Invariants
//! - Unknown email and wrong password fail with the same error.
//! - The session is only mutated after the store call succeeded.
//! - Logs carry user ids only, never emails, names or passwords.

use crate::auth::password::CredentialHasher;
use crate::auth::session::{Caller, SessionData};
use crate::model::user::{SignUpInput, User};
use crate::repo::user_repo::UserRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};

/// Use-case service for account and session lifecycle.
pub struct AuthService<'h, R: UserRepository> {
    repo: R,
    hasher: &'h CredentialHasher,
}

impl<'h, R: UserRepository> AuthService<'h, R> {
    pub fn new(repo: R, hasher: &'h CredentialHasher) -> Self {
        Self { repo, hasher }
    }

    /// Registers a user and signs the session in as that user.
    ///
    /// # Errors
    /// - `Validation` when any field is blank.
    /// - `Conflict` when the email is already registered.
    pub fn sign_up(&self, session: &mut SessionData, input: &SignUpInput) -> ServiceResult<User> {
        input.validate()?;
        let password_hash = self.hasher.hash(&input.password)?;

        let user = match self
            .repo
            .create_user(&input.name, &input.email, &password_hash)
        {
            Ok(user) => user,
            Err(err) => {
                let err = ServiceError::from(err);
                warn!(
                    "event=sign_up module=auth status=error error_code={}",
                    err.code()
                );
                return Err(err);
            }
        };

        session.attach(user.id);
        info!("event=sign_up module=auth status=ok user_id={}", user.id);
        Ok(user)
    }

    /// Verifies credentials and signs the session in.
    ///
    /// # Errors
    /// - `InvalidCredentials` for an unknown email or a wrong password.
    pub fn login(
        &self,
        session: &mut SessionData,
        email: &str,
        password: &str,
    ) -> ServiceResult<User> {
        let Some(credentials) = self.repo.find_credentials_by_email(email)? else {
            self.hasher.verify_dummy(password);
            warn!("event=login module=auth status=rejected");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &credentials.password_hash) {
            warn!("event=login module=auth status=rejected");
            return Err(ServiceError::InvalidCredentials);
        }

        session.attach(credentials.user.id);
        info!(
            "event=login module=auth status=ok user_id={}",
            credentials.user.id
        );
        Ok(credentials.user)
    }

    /// Returns the signed-in user, or `None` for anonymous callers.
    ///
    /// A session pointing at a deleted user also yields `None`.
    pub fn me(&self, caller: Caller) -> ServiceResult<Option<User>> {
        match caller {
            Caller::Anonymous => Ok(None),
            Caller::User(id) => Ok(self.repo.get_user(id)?),
        }
    }
}

/// Clears all session state. Idempotent; always succeeds.
///
/// Needs no store access, so it is not tied to a repository.
pub fn logout(session: &mut SessionData) -> bool {
    if let Some(user_id) = session.user_id {
        info!("event=logout module=auth status=ok user_id={user_id}");
    }
    session.clear();
    true
}
