//! Terminal client for the todo list API.
//!
//! # Responsibility
//! - Wrap the REST API in a typed async client.
//! - Keep list/edit view state and render it for the terminal.

pub mod client;
pub mod view;

pub use client::{ClientError, ClientResult, TodoClient};
pub use view::{EditDraft, TodoView};

/// Server root used when neither `--server` nor `TODOLIST_SERVER` is set.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3001";
