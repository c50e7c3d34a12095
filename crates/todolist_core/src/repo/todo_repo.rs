//! Todo repository contract and JSON file implementation.
//!
//! # Responsibility
//! - Provide get-all/get-by-id/upsert/delete over a single JSON array file.
//! - Keep serialization details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Todo::validate()` before touching the file. A record
//!   that keeps its stored title is only checked for timestamp order, so
//!   toggling a legacy record with a blank title still succeeds.
//! - The file is rewritten wholesale (pretty-printed) on every mutation.
//! - Reads are best-effort: absent, blank or unparsable files are "no data".
//!
//! # Limitations
//! - Every mutation is a full read-modify-write with no locking and no atomic
//!   rename. Two concurrent writers race and the last write wins; only a
//!   single writer process is supported.

use crate::model::todo::{Todo, TodoValidationError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Entity failed validation before write.
    Validation(TodoValidationError),
    /// File system failure other than "file absent".
    Io { path: PathBuf, source: io::Error },
    /// Entities could not be encoded for writing.
    Serialize(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "todo store I/O failed at `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to encode todos: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Repository interface for todo storage.
pub trait TodoRepository {
    /// Returns every stored todo in file order.
    fn get_all(&self) -> RepoResult<Vec<Todo>>;
    /// Returns the todo with `id`, if any.
    fn get_by_id(&self, id: &str) -> RepoResult<Option<Todo>>;
    /// Replaces the entry with the same id, or appends when absent.
    fn save(&self, todo: &Todo) -> RepoResult<()>;
    /// Removes the entry with `id`; returns whether anything was removed.
    fn delete_by_id(&self, id: &str) -> RepoResult<bool>;
}

/// Todo repository backed by one pretty-printed JSON array file.
#[derive(Debug, Clone)]
pub struct JsonFileTodoRepository {
    path: PathBuf,
}

impl JsonFileTodoRepository {
    /// Creates a repository for `path`. The file is not touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_todos(&self) -> RepoResult<Vec<Todo>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("event=store_read module=repo status=ok reason=file_absent");
                return Ok(Vec::new());
            }
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!("event=store_read module=repo status=degraded reason=invalid_utf8");
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=store_read module=repo status=error path={} error={}",
                    self.path.display(),
                    err
                );
                return Err(RepoError::Io {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Todo>>(&raw) {
            Ok(todos) => Ok(todos),
            Err(err) => {
                warn!(
                    "event=store_read module=repo status=degraded reason=unparsable line={} column={}",
                    err.line(),
                    err.column()
                );
                Ok(Vec::new())
            }
        }
    }

    fn write_todos(&self, todos: &[Todo]) -> RepoResult<()> {
        let started_at = Instant::now();

        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|source| RepoError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let body = serde_json::to_string_pretty(todos)?;
        if let Err(source) = fs::write(&self.path, body) {
            error!(
                "event=store_write module=repo status=error path={} duration_ms={} error={}",
                self.path.display(),
                started_at.elapsed().as_millis(),
                source
            );
            return Err(RepoError::Io {
                path: self.path.clone(),
                source,
            });
        }

        info!(
            "event=store_write module=repo status=ok count={} duration_ms={}",
            todos.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

impl TodoRepository for JsonFileTodoRepository {
    fn get_all(&self) -> RepoResult<Vec<Todo>> {
        self.read_todos()
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<Todo>> {
        Ok(self.read_todos()?.into_iter().find(|todo| todo.id == id))
    }

    fn save(&self, todo: &Todo) -> RepoResult<()> {
        let mut todos = self.read_todos()?;
        match todos.iter_mut().find(|existing| existing.id == todo.id) {
            Some(existing) => {
                if existing.title == todo.title {
                    todo.validate_timestamps()?;
                } else {
                    todo.validate()?;
                }
                *existing = todo.clone();
            }
            None => {
                todo.validate()?;
                todos.push(todo.clone());
            }
        }

        self.write_todos(&todos)
    }

    fn delete_by_id(&self, id: &str) -> RepoResult<bool> {
        let mut todos = self.read_todos()?;
        let initial_len = todos.len();
        todos.retain(|todo| todo.id != id);

        if todos.len() == initial_len {
            return Ok(false);
        }

        self.write_todos(&todos)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonFileTodoRepository, RepoError, TodoRepository};
    use crate::model::todo::Todo;
    use std::fs;

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/todos.json");
        let repo = JsonFileTodoRepository::new(&path);

        repo.save(&Todo::create("a", "").unwrap()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_rejects_invalid_entity_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        let repo = JsonFileTodoRepository::new(&path);

        let mut todo = Todo::create("valid", "").unwrap();
        todo.title = "   ".to_string();

        let err = repo.save(&todo).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert!(!path.exists());
    }

    #[test]
    fn save_keeps_a_stored_blank_title_but_rejects_a_new_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        let repo = JsonFileTodoRepository::new(&path);

        let mut legacy = Todo::create("valid", "").unwrap();
        legacy.title = "  ".to_string();
        fs::write(&path, serde_json::to_string(&vec![legacy.clone()]).unwrap()).unwrap();

        repo.save(&legacy.toggle_completion()).unwrap();
        assert!(repo.get_by_id(&legacy.id).unwrap().unwrap().completed);

        let mut renamed = legacy.clone();
        renamed.title = String::new();
        let err = repo.save(&renamed).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[test]
    fn read_of_directory_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileTodoRepository::new(dir.path());

        let err = repo.get_all().unwrap_err();
        assert!(matches!(err, RepoError::Io { .. }));
    }

    #[test]
    fn write_uses_two_space_indentation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        let repo = JsonFileTodoRepository::new(&path);

        repo.save(&Todo::create("pretty", "").unwrap()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"id\""));
    }
}
