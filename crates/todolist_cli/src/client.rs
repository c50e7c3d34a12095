//! HTTP client for the todo API.
//!
//! # Responsibility
//! - Issue one request per user action against the fixed `/api` prefix.
//! - Decode entity bodies into `todolist_core::Todo`.
//!
//! # Invariants
//! - Any non-2xx status is an error; there are no retries or timeouts.

use reqwest::{Response, StatusCode};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use todolist_api::API_PREFIX;
use todolist_core::{Todo, TodoPatch};

pub type ClientResult<T> = Result<T, ClientError>;

/// Client error for todo API calls.
#[derive(Debug)]
pub enum ClientError {
    /// Connection, transport or body decoding failure.
    Transport {
        operation: &'static str,
        source: reqwest::Error,
    },
    /// Server answered with a non-success status.
    Status {
        operation: &'static str,
        status: StatusCode,
    },
}

impl ClientError {
    /// Returns the HTTP status for `Status` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport { operation, source } => write!(f, "Failed to {operation}: {source}"),
            Self::Status { operation, status } => {
                write!(f, "Failed to {operation}: server returned {status}")
            }
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            Self::Status { .. } => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    title: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Thin async client over the todo REST API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: reqwest::Client,
    base_url: String,
}

impl TodoClient {
    /// Creates a client for a server root such as `http://127.0.0.1:3001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_todos(&self) -> ClientResult<Vec<Todo>> {
        const OP: &str = "fetch todos";
        let response = self.http.get(self.todos_url()).send().await;
        decode(check(response, OP)?, OP).await
    }

    pub async fn create_todo(&self, title: &str, description: &str) -> ClientResult<Todo> {
        const OP: &str = "create todo";
        let response = self
            .http
            .post(self.todos_url())
            .json(&CreateBody { title, description })
            .send()
            .await;
        decode(check(response, OP)?, OP).await
    }

    pub async fn update_todo(&self, id: &str, patch: &TodoPatch) -> ClientResult<Todo> {
        const OP: &str = "update todo";
        let body = UpdateBody {
            title: patch.title.as_deref(),
            description: patch.description.as_deref(),
        };
        let response = self
            .http
            .put(self.todo_url(id))
            .json(&body)
            .send()
            .await;
        decode(check(response, OP)?, OP).await
    }

    pub async fn toggle_todo(&self, id: &str) -> ClientResult<Todo> {
        const OP: &str = "toggle todo";
        let response = self
            .http
            .patch(format!("{}/toggle", self.todo_url(id)))
            .send()
            .await;
        decode(check(response, OP)?, OP).await
    }

    pub async fn delete_todo(&self, id: &str) -> ClientResult<()> {
        const OP: &str = "delete todo";
        let response = self.http.delete(self.todo_url(id)).send().await;
        check(response, OP)?;
        Ok(())
    }

    fn todos_url(&self) -> String {
        format!("{}{API_PREFIX}/todos", self.base_url)
    }

    fn todo_url(&self, id: &str) -> String {
        format!("{}/{id}", self.todos_url())
    }
}

fn check(
    response: Result<Response, reqwest::Error>,
    operation: &'static str,
) -> ClientResult<Response> {
    let response = response.map_err(|source| ClientError::Transport { operation, source })?;
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status { operation, status });
    }
    Ok(response)
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: Response,
    operation: &'static str,
) -> ClientResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|source| ClientError::Transport { operation, source })
}
