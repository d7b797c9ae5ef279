//! Domain model for users and their tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own field-level validation for user and task input.
//!
//! # Invariants
//! - Every domain object is identified by a store-assigned integer id.
//! - Every task has exactly one owner and is never reassigned.

pub mod task;
pub mod user;
