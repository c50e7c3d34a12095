//! In-memory todo list view synchronized through the HTTP client.
//!
//! # Responsibility
//! - Hold the list, the add-form draft and the edit draft.
//! - Apply each user action via one API call, then update local state.
//! - Render the list as plain text.
//!
//! # Invariants
//! - Local state changes only after the API call succeeds; failures are
//!   logged and leave the view untouched (no rollback logic exists).
//! - At most one row is being edited; that row renders as an edit form.

use crate::client::TodoClient;
use log::error;
use std::fmt::Write as _;
use todolist_core::{is_valid_title, Todo, TodoId, TodoPatch};

pub const EMPTY_STATE_MESSAGE: &str = "No todos yet. Add one above!";

/// Draft values for the row currently being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: TodoId,
    pub title: String,
    pub description: String,
}

/// Client-side view state for the todo list.
#[derive(Debug, Clone)]
pub struct TodoView {
    todos: Vec<Todo>,
    loading: bool,
    /// Add-form title field.
    pub draft_title: String,
    /// Add-form description field.
    pub draft_description: String,
    editing: Option<EditDraft>,
}

impl Default for TodoView {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoView {
    /// Creates an empty view in the loading state.
    pub fn new() -> Self {
        Self {
            todos: Vec::new(),
            loading: true,
            draft_title: String::new(),
            draft_description: String::new(),
            editing: None,
        }
    }

    /// Creates a loaded view over an existing list.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            loading: false,
            ..Self::new()
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    /// Mutable access to the edit draft fields, when editing.
    pub fn editing_mut(&mut self) -> Option<&mut EditDraft> {
        self.editing.as_mut()
    }

    /// Fetches the full list. Loading ends whether or not the call succeeds.
    pub async fn load(&mut self, client: &TodoClient) -> bool {
        let loaded = match client.fetch_todos().await {
            Ok(todos) => {
                self.todos = todos;
                true
            }
            Err(err) => {
                error!("event=todos_load module=client status=error error={err}");
                false
            }
        };
        self.loading = false;
        loaded
    }

    /// Submits the add form. A blank title is ignored without a request.
    pub async fn add(&mut self, client: &TodoClient) -> bool {
        if !is_valid_title(&self.draft_title) {
            return false;
        }

        let created = client
            .create_todo(&self.draft_title, &self.draft_description)
            .await;
        match created {
            Ok(todo) => {
                self.todos.push(todo);
                self.draft_title.clear();
                self.draft_description.clear();
                true
            }
            Err(err) => {
                error!("event=todo_add module=client status=error error={err}");
                false
            }
        }
    }

    pub async fn toggle(&mut self, client: &TodoClient, id: &str) -> bool {
        match client.toggle_todo(id).await {
            Ok(updated) => {
                self.replace(updated);
                true
            }
            Err(err) => {
                error!("event=todo_toggle module=client status=error todo_id={id} error={err}");
                false
            }
        }
    }

    pub async fn delete(&mut self, client: &TodoClient, id: &str) -> bool {
        match client.delete_todo(id).await {
            Ok(()) => {
                self.todos.retain(|todo| todo.id != id);
                true
            }
            Err(err) => {
                error!("event=todo_delete module=client status=error todo_id={id} error={err}");
                false
            }
        }
    }

    /// Enters edit mode for `id`, seeding the draft from the current row.
    ///
    /// Returns `false` when no row has that id.
    pub fn start_editing(&mut self, id: &str) -> bool {
        match self.todos.iter().find(|todo| todo.id == id) {
            Some(todo) => {
                self.editing = Some(EditDraft {
                    id: todo.id.clone(),
                    title: todo.title.clone(),
                    description: todo.description.clone(),
                });
                true
            }
            None => false,
        }
    }

    /// Sends the edit draft. Edit mode is left only on success.
    pub async fn save_edit(&mut self, client: &TodoClient) -> bool {
        let Some(draft) = self.editing.clone() else {
            return false;
        };

        let patch = TodoPatch {
            title: Some(draft.title),
            description: Some(draft.description),
        };
        match client.update_todo(&draft.id, &patch).await {
            Ok(updated) => {
                self.replace(updated);
                self.editing = None;
                true
            }
            Err(err) => {
                error!(
                    "event=todo_update module=client status=error todo_id={} error={err}",
                    draft.id
                );
                false
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Renders the view as plain text.
    pub fn render(&self) -> String {
        if self.loading {
            return "Loading...\n".to_string();
        }

        let mut out = String::from("Todo App\n\n");
        if self.todos.is_empty() {
            out.push_str(EMPTY_STATE_MESSAGE);
            out.push('\n');
            return out;
        }

        for todo in &self.todos {
            match self.editing.as_ref().filter(|draft| draft.id == todo.id) {
                Some(draft) => {
                    let _ = writeln!(out, "[edit] {}", draft.id);
                    let _ = writeln!(out, "    title: {}", draft.title);
                    let _ = writeln!(out, "    description: {}", draft.description);
                }
                None => {
                    let mark = if todo.completed { 'x' } else { ' ' };
                    let _ = writeln!(out, "[{mark}] {}  ({})", todo.title, todo.id);
                    if !todo.description.is_empty() {
                        let _ = writeln!(out, "    {}", todo.description);
                    }
                }
            }
        }
        out
    }

    fn replace(&mut self, updated: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|todo| todo.id == updated.id) {
            *slot = updated;
        }
    }
}
