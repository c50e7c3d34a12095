//! Todo use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/toggle/delete entry points.
//! - Apply pure entity operations and persist their results.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Unknown ids surface as `NotFound` before any patch is validated.
//! - Log events carry ids and counts only, never titles or descriptions.

use crate::model::todo::{Todo, TodoId, TodoPatch, TodoValidationError};
use crate::repo::todo_repo::{RepoError, TodoRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, TodoServiceError>;

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Input violates entity rules (empty title).
    Validation(TodoValidationError),
    /// Target todo does not exist.
    NotFound(TodoId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Use-case service wrapper for todo operations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists all todos in stored order (possibly empty).
    pub fn list_todos(&self) -> ServiceResult<Vec<Todo>> {
        Ok(self.repo.get_all()?)
    }

    /// Gets one todo by id.
    pub fn get_todo(&self, id: &str) -> ServiceResult<Todo> {
        self.repo
            .get_by_id(id)?
            .ok_or_else(|| TodoServiceError::NotFound(id.to_string()))
    }

    /// Creates and persists a new todo.
    pub fn create_todo(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> ServiceResult<Todo> {
        let todo = Todo::create(title, description)?;
        self.repo.save(&todo)?;
        info!(
            "event=todo_create module=service status=ok todo_id={}",
            todo.id
        );
        Ok(todo)
    }

    /// Applies a partial update to an existing todo and persists it.
    ///
    /// # Contract
    /// - Unknown `id` returns `NotFound` regardless of the patch contents.
    /// - An explicitly empty title returns `Validation`.
    pub fn update_todo(&self, id: &str, patch: &TodoPatch) -> ServiceResult<Todo> {
        let existing = self.get_todo(id)?;
        let updated = existing.update(patch)?;
        self.repo.save(&updated)?;
        info!(
            "event=todo_update module=service status=ok todo_id={} title_changed={} description_changed={}",
            updated.id,
            patch.title.is_some(),
            patch.description.is_some()
        );
        Ok(updated)
    }

    /// Flips completion of an existing todo and persists it.
    pub fn toggle_todo(&self, id: &str) -> ServiceResult<Todo> {
        let toggled = self.get_todo(id)?.toggle_completion();
        self.repo.save(&toggled)?;
        info!(
            "event=todo_toggle module=service status=ok todo_id={} completed={}",
            toggled.id, toggled.completed
        );
        Ok(toggled)
    }

    /// Deletes a todo by id.
    pub fn delete_todo(&self, id: &str) -> ServiceResult<()> {
        if !self.repo.delete_by_id(id)? {
            return Err(TodoServiceError::NotFound(id.to_string()));
        }
        info!("event=todo_delete module=service status=ok todo_id={id}");
        Ok(())
    }
}
