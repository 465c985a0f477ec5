use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::repository::schema::tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: NaiveDateTime,
}

/// Validated input for inserting a task. `id`, `is_completed` and
/// `created_at` come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::repository::schema::tasks)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

/// Full replacement of a task's editable fields.
///
/// `title` and `description` always overwrite the stored values, while
/// `is_completed` keeps the stored value when `None`. A `None` title is
/// handed to the store as NULL and rejected by its NOT NULL constraint.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl CreateTaskRequest {
    pub fn validate(self) -> Result<NewTask, ApiError> {
        match self.title {
            Some(title) if !title.is_empty() => Ok(NewTask {
                title,
                description: self.description,
            }),
            _ => Err(ApiError::TitleRequired),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

// Unlike create, nothing is validated here.
impl From<UpdateTaskRequest> for TaskChanges {
    fn from(request: UpdateTaskRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            is_completed: request.is_completed,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DeletedTaskResponse {
    pub message: String,
    #[serde(rename = "deletedTask")]
    pub deleted_task: Task,
}

impl DeletedTaskResponse {
    pub fn new(deleted_task: Task) -> Self {
        Self {
            message: "Task deleted successfully".to_string(),
            deleted_task,
        }
    }
}
