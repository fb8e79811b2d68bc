use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::Patch;

const TITLE_MAX: u64 = 200;
const DESCRIPTION_MAX: u64 = 1000;

/// Input structure for creating a task.
///
/// Any owner field the client sends is ignored: serde drops unknown keys and the
/// owner is always taken from the authenticated identity.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// The title of the task. Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description, at most 1000 characters.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Whether every authenticated user may read the task. Defaults to `false`.
    #[serde(default)]
    pub is_shared: Option<bool>,
}

/// Partial update of a task. Only fields present in the request body are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Patch<String>,
    /// `null` clears the description.
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub is_shared: Patch<bool>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Owner of the task. Fixed at creation.
    pub user_id: Uuid,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` owned by `owner`.
    pub fn new(input: TaskInput, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            user_id: owner,
            is_shared: input.is_shared.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TaskPatch {
    /// Applies the present fields to `task`, leaving absent ones untouched.
    ///
    /// Nothing is written if any present field is invalid.
    pub fn apply(self, task: &mut Task) -> Result<(), AppError> {
        let title = match self.title {
            Patch::Missing => None,
            Patch::Null => return Err(invalid("title", "cannot be null")),
            Patch::Value(title) => {
                let len = title.chars().count() as u64;
                if len == 0 || len > TITLE_MAX {
                    return Err(invalid("title", "must be between 1 and 200 characters"));
                }
                Some(title)
            }
        };
        let description = match self.description {
            Patch::Missing => None,
            Patch::Null => Some(None),
            Patch::Value(description) => {
                if description.chars().count() as u64 > DESCRIPTION_MAX {
                    return Err(invalid("description", "must be at most 1000 characters"));
                }
                Some(Some(description))
            }
        };
        let is_shared = match self.is_shared {
            Patch::Missing => None,
            Patch::Null => return Err(invalid("isShared", "cannot be null")),
            Patch::Value(flag) => Some(flag),
        };

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = description {
            task.description = description;
        }
        if let Some(is_shared) = is_shared {
            task.is_shared = is_shared;
        }
        task.updated_at = Utc::now();
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> AppError {
    AppError::ValidationError(format!("{}: {}", field, reason))
}
