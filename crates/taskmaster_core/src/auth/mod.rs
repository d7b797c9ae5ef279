//! Authentication primitives.
//!
//! # Responsibility
//! - Hash and verify passwords (`password`).
//! - Resolve request session state into a caller identity (`session`).
//!
//! # Invariants
//! - Identity only ever comes from server-held session state, never from
//!   client-supplied ids.
//! - Plaintext passwords never leave this module's call stack.

pub mod password;
pub mod session;
