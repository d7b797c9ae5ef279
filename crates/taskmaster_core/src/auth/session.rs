//! Session state and caller resolution.
//!
//! The session middleware owns storage, cookies and expiry. Core only sees
//! the materialized [`SessionData`] for the current request and turns it into
//! a [`Caller`] once, at the request boundary.

use crate::model::user::UserId;

/// Key under which the authenticated user id is stored in the session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Server-held session payload.
///
/// Holds at most one identity; attaching a new one replaces the old one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Option<UserId>,
}

impl SessionData {
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn attach(&mut self, user_id: UserId) {
        self.user_id = Some(user_id);
    }

    pub fn clear(&mut self) {
        self.user_id = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Identity of whoever issued the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(UserId),
}

impl Caller {
    pub fn user_id(self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }
}

/// Resolves the caller from session state. Performs no I/O.
pub fn resolve_caller(session: &SessionData) -> Caller {
    match session.user_id {
        Some(id) => Caller::User(id),
        None => Caller::Anonymous,
    }
}
