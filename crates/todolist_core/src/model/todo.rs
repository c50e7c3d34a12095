//! Todo entity and its pure lifecycle operations.
//!
//! # Responsibility
//! - Define the persisted/wire shape of a todo.
//! - Provide `create`, `update` and `toggle_completion` with title validation.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `create` and `update` never produce an empty or whitespace-only title.
//! - `updated_at >= created_at`, and it never moves backwards across mutations.
//! - Timestamps carry millisecond precision so the ISO-8601 form round-trips.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier generated at creation time.
///
/// Kept as a plain string: ids arrive verbatim from URL paths and persisted
/// files, and only equality matters.
pub type TodoId = String;

const TIMESTAMP_PRECISION_DIGITS: u16 = 3;

/// Validation error for todo construction and mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// `updated_at` precedes `created_at`.
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title cannot be empty"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updatedAt ({}) must be >= createdAt ({})",
                timestamp::format(updated_at),
                timestamp::format(created_at)
            ),
        }
    }
}

impl Error for TodoValidationError {}

/// Partial update for [`Todo::update`].
///
/// `None` means "leave unchanged"; `Some(String::new())` for `title` is an
/// explicit empty title and is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TodoPatch {
    /// Patch that replaces only the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    /// Patch that replaces only the description.
    pub fn description(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: Some(description.into()),
        }
    }
}

/// The single domain entity: one item on the todo list.
///
/// Serialized with camelCase keys and ISO-8601 timestamp strings, which is
/// both the HTTP body shape and the on-disk record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new, incomplete todo with a generated id.
    ///
    /// # Errors
    /// - Returns `EmptyTitle` when `title` is empty or whitespace-only.
    pub fn create(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, TodoValidationError> {
        Self::create_at(title, description, Utc::now())
    }

    /// Same as [`Todo::create`] with a caller-provided clock reading.
    ///
    /// `created_at` and `updated_at` are stamped identically.
    pub fn create_at(
        title: impl Into<String>,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, TodoValidationError> {
        let title = title.into();
        validate_title(&title)?;

        let now = now.trunc_subsecs(TIMESTAMP_PRECISION_DIGITS);
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            description: description.into(),
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns a copy with the patch applied and `updated_at` refreshed.
    ///
    /// # Errors
    /// - Returns `EmptyTitle` when the patch provides an empty/whitespace title.
    pub fn update(&self, patch: &TodoPatch) -> Result<Self, TodoValidationError> {
        self.update_at(patch, Utc::now())
    }

    /// Same as [`Todo::update`] with a caller-provided clock reading.
    pub fn update_at(
        &self,
        patch: &TodoPatch,
        now: DateTime<Utc>,
    ) -> Result<Self, TodoValidationError> {
        if let Some(title) = patch.title.as_deref() {
            validate_title(title)?;
        }

        Ok(Self {
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            updated_at: self.next_updated_at(now),
            ..self.clone()
        })
    }

    /// Returns a copy with `completed` flipped and `updated_at` refreshed.
    pub fn toggle_completion(&self) -> Self {
        self.toggle_completion_at(Utc::now())
    }

    /// Same as [`Todo::toggle_completion`] with a caller-provided clock reading.
    pub fn toggle_completion_at(&self, now: DateTime<Utc>) -> Self {
        Self {
            completed: !self.completed,
            updated_at: self.next_updated_at(now),
            ..self.clone()
        }
    }

    /// Checks entity-level invariants before persistence.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_title(&self.title)?;
        self.validate_timestamps()
    }

    /// Checks `updated_at >= created_at` only.
    pub fn validate_timestamps(&self) -> Result<(), TodoValidationError> {
        if self.updated_at < self.created_at {
            return Err(TodoValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    // Clamp to the previous stamp so a wall-clock step back never makes
    // `updated_at` go backwards.
    fn next_updated_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.trunc_subsecs(TIMESTAMP_PRECISION_DIGITS)
            .max(self.updated_at)
    }
}

/// Returns whether `title` is acceptable for a todo.
pub fn is_valid_title(title: &str) -> bool {
    !title.trim().is_empty()
}

fn validate_title(title: &str) -> Result<(), TodoValidationError> {
    if is_valid_title(title) {
        Ok(())
    } else {
        Err(TodoValidationError::EmptyTitle)
    }
}

/// ISO-8601 (RFC 3339, UTC, millisecond) serde adapter for timestamps.
///
/// Writes always use the `...sssZ` form. Reads also accept offset-less
/// date-times and bare dates, both taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    /// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS.sssZ`.
    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
    }

    /// Parses an ISO-8601 timestamp. Values without an offset are UTC.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value.with_timezone(&Utc));
        }
        if let Some(value) = NAIVE_DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        {
            return Some(value.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|value| value.and_utc())
    }
}
