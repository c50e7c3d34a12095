//! Shared handler state.
//!
//! # Responsibility
//! - Own the todo service behind an `Arc` shared by all handlers.
//! - Run blocking file-backed service calls off the async executor.

use crate::error::ApiError;
use log::error;
use std::path::PathBuf;
use std::sync::Arc;
use todolist_core::{JsonFileTodoRepository, ServiceResult, TodoService};

/// Service type served by the HTTP layer.
pub type FileTodoService = TodoService<JsonFileTodoRepository>;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    service: Arc<FileTodoService>,
}

impl AppState {
    pub fn new(service: FileTodoService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Builds state for a JSON data file path supplied by configuration.
    pub fn from_data_file(path: impl Into<PathBuf>) -> Self {
        Self::new(TodoService::new(JsonFileTodoRepository::new(path)))
    }

    pub fn service(&self) -> &FileTodoService {
        &self.service
    }

    /// Runs one service operation on the blocking pool and maps its error.
    ///
    /// `failure_message` is the generic client-facing text for 500 responses.
    pub(crate) async fn with_service<T, F>(
        &self,
        failure_message: &'static str,
        operation: F,
    ) -> Result<T, ApiError>
    where
        F: FnOnce(&FileTodoService) -> ServiceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let joined = tokio::task::spawn_blocking(move || operation(&service)).await;

        match joined {
            Ok(result) => result.map_err(|err| ApiError::from_service(err, failure_message)),
            Err(join_err) => {
                error!(
                    "event=service_call module=api status=error reason=join_failed error={}",
                    join_err
                );
                Err(ApiError::internal(failure_message).with_source(join_err.to_string()))
            }
        }
    }
}
