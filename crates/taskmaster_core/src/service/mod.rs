//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce authentication and ownership before any store access.
//! - Keep transport layers decoupled from storage details.

pub mod auth_service;
pub mod error;
pub mod gate;
pub mod task_service;
