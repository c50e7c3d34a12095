//! Domain model for the todo list.
//!
//! # Responsibility
//! - Define the single entity managed by the system.
//! - Keep construction/update rules pure so callers own persistence.
//!
//! # Invariants
//! - Every todo is identified by an opaque, stable `TodoId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod todo;
