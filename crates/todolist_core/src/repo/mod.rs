//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract used by services.
//! - Isolate JSON file details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Todo::validate()` on new or changed titles.
//! - A missing or unparsable data file reads as an empty list.

pub mod todo_repo;
