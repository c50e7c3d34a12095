//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate entity operations and repository calls into use-case APIs.
//! - Keep the HTTP layer decoupled from storage details.

pub mod todo_service;
