//! Core domain logic for the todo list.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::todo::{is_valid_title, Todo, TodoId, TodoPatch, TodoValidationError};
pub use repo::todo_repo::{JsonFileTodoRepository, RepoError, RepoResult, TodoRepository};
pub use service::todo_service::{ServiceResult, TodoService, TodoServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
