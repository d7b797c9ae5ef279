//! Bridge between cookie sessions and the core's explicit `SessionData`.
//!
//! # Responsibility
//! - Load the stored identity once per HTTP request.
//! - Hold the per-request session value that auth mutations rewrite.
//! - Persist the final value back: cycle the session id when an identity is
//!   attached, destroy the session on logout.

use log::debug;
use std::sync::{Mutex, PoisonError};
use taskmaster_core::{logout, resolve_caller, Caller, SessionData, UserId, SESSION_USER_ID_KEY};
use tower_sessions::session::Error as SessionError;
use tower_sessions::Session;

#[derive(Debug, Clone, Copy)]
struct SlotState {
    loaded: SessionData,
    current: SessionData,
    signed_out: bool,
}

/// Session value for one GraphQL request.
#[derive(Debug)]
pub struct RequestSession {
    state: Mutex<SlotState>,
}

impl RequestSession {
    pub fn new(loaded: SessionData) -> Self {
        Self {
            state: Mutex::new(SlotState {
                loaded,
                current: loaded,
                signed_out: false,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current session value, including changes made earlier in the request.
    pub fn current(&self) -> SessionData {
        self.lock().current
    }

    pub fn caller(&self) -> Caller {
        resolve_caller(&self.lock().current)
    }

    /// Stores the value returned by a successful sign-up or login.
    pub fn replace(&self, data: SessionData) {
        self.lock().current = data;
    }

    pub fn sign_out(&self) -> bool {
        let mut state = self.lock();
        state.signed_out = true;
        logout(&mut state.current)
    }
}

/// Reads the identity stored in the cookie session.
pub async fn load(session: &Session) -> Result<RequestSession, SessionError> {
    let user_id = session.get::<UserId>(SESSION_USER_ID_KEY).await?;
    Ok(RequestSession::new(SessionData { user_id }))
}

/// Writes the request's final session value back to the cookie session.
pub async fn commit(session: &Session, request: &RequestSession) -> Result<(), SessionError> {
    let SlotState {
        loaded,
        current,
        signed_out,
    } = *request.lock();

    if signed_out {
        session.flush().await?;
        debug!("event=session_commit module=server status=ok action=flush");
    }

    if let Some(user_id) = current.user_id {
        if signed_out || loaded.user_id != Some(user_id) {
            session.cycle_id().await?;
            session.insert(SESSION_USER_ID_KEY, user_id).await?;
            debug!("event=session_commit module=server status=ok action=attach user_id={user_id}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::RequestSession;
    use taskmaster_core::{Caller, SessionData};

    #[test]
    fn replace_changes_resolved_caller() {
        let request = RequestSession::new(SessionData::default());
        assert_eq!(request.caller(), Caller::Anonymous);

        request.replace(SessionData::signed_in(4));
        assert_eq!(request.caller(), Caller::User(4));
    }

    #[test]
    fn sign_out_clears_identity_and_is_idempotent() {
        let request = RequestSession::new(SessionData::signed_in(4));
        assert!(request.sign_out());
        assert!(request.sign_out());
        assert_eq!(request.caller(), Caller::Anonymous);
        assert!(request.lock().signed_out);
    }
}
