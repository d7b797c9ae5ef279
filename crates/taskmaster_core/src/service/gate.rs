//! Authorization gate for owner-scoped operations.
//!
//! # Invariants
//! - [`Owner`] can only be obtained through [`authorize`], so any code that
//!   holds one has passed the identity check.
//! - `authorize` never touches the store.

use crate::auth::session::Caller;
use crate::model::user::UserId;
use crate::service::error::{ServiceError, ServiceResult};
use log::debug;

/// Proof that the caller is authenticated, carrying the identity that every
/// task query must be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(UserId);

impl Owner {
    pub fn user_id(self) -> UserId {
        self.0
    }
}

/// Admits authenticated callers; rejects anonymous ones with `Unauthenticated`.
pub fn authorize(caller: Caller) -> ServiceResult<Owner> {
    match caller {
        Caller::User(id) => Ok(Owner(id)),
        Caller::Anonymous => {
            debug!("event=authorize module=gate status=rejected reason=anonymous");
            Err(ServiceError::Unauthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::authorize;
    use crate::auth::session::Caller;
    use crate::service::error::ServiceError;

    #[test]
    fn anonymous_caller_is_rejected() {
        assert_eq!(
            authorize(Caller::Anonymous),
            Err(ServiceError::Unauthenticated)
        );
    }

    #[test]
    fn user_caller_becomes_owner() {
        assert_eq!(authorize(Caller::User(9)).unwrap().user_id(), 9);
    }
}
