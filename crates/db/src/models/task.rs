//! Task model, DTOs and list filters.

use lockedin_core::reports::TaskSnapshot;
use lockedin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
///
/// `user_id` is the owner (assignee); `creator_id` is whoever created it,
/// which differs when a task manager assigns work to someone else.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub user_id: DbId,
    pub creator_id: DbId,
    pub category_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub status: String,
    pub deadline: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub reminder_sent_at: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub overdue_notified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Task> for TaskSnapshot {
    fn from(task: &Task) -> Self {
        Self {
            status: task.status.clone(),
            priority: task.priority.clone(),
            deadline: task.deadline,
        }
    }
}

/// DTO for creating a task. `user_id` defaults to the caller.
#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub user_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<Timestamp>,
    pub category_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTask {
    pub user_id: Option<DbId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<Timestamp>,
    pub category_id: Option<DbId>,
}

/// Optional filters for task listings.
#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category_id: Option<DbId>,
}
