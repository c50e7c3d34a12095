//! Todo CRUD handlers.
//!
//! # Responsibility
//! - Decode request bodies and reject malformed input before entity operations.
//! - Translate service outcomes into status codes and JSON bodies.
//!
//! # Invariants
//! - Unknown ids yield 404 before the request body is inspected.
//! - A provided title must be non-empty after trimming (400 otherwise).

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer};
use todolist_core::{is_valid_title, Todo, TodoPatch, TodoValidationError};

/// Body for `POST /todos`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body for `PUT /todos/:id`.
///
/// `title` distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`); the latter is treated as a provided empty title.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "deserialize_provided")]
    pub title: Option<Option<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateTodoRequest {
    fn into_patch(self) -> Result<TodoPatch, ApiError> {
        let title = match self.title {
            None => None,
            Some(Some(title)) if is_valid_title(&title) => Some(title),
            Some(_) => {
                return Err(ApiError::bad_request(
                    TodoValidationError::EmptyTitle.to_string(),
                ))
            }
        };

        Ok(TodoPatch {
            title,
            description: self.description,
        })
    }
}

fn deserialize_provided<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// `GET /todos`
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state
        .with_service("Failed to fetch todos", |service| service.list_todos())
        .await?;
    Ok(Json(todos))
}

/// `GET /todos/:id`
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state
        .with_service("Failed to fetch todo", move |service| service.get_todo(&id))
        .await?;
    Ok(Json(todo))
}

/// `POST /todos`
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(request) = payload?;
    let title = request
        .title
        .filter(|title| is_valid_title(title))
        .ok_or_else(|| ApiError::bad_request("Title is required"))?;
    let description = request.description.unwrap_or_default();

    let todo = state
        .with_service("Failed to create todo", move |service| {
            service.create_todo(title, description)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `PUT /todos/:id`
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let lookup_id = id.clone();
    state
        .with_service("Failed to update todo", move |service| {
            service.get_todo(&lookup_id)
        })
        .await?;

    let Json(request) = payload?;
    let patch = request.into_patch()?;

    let todo = state
        .with_service("Failed to update todo", move |service| {
            service.update_todo(&id, &patch)
        })
        .await?;
    Ok(Json(todo))
}

/// `PATCH /todos/:id/toggle`
pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state
        .with_service("Failed to toggle todo", move |service| {
            service.toggle_todo(&id)
        })
        .await?;
    Ok(Json(todo))
}

/// `DELETE /todos/:id`
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .with_service("Failed to delete todo", move |service| {
            service.delete_todo(&id)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
