//! Task vocabulary, validation and access rules.

use crate::fields::{validate_optional_text, validate_required_text};
use crate::roles::{self, ROLE_ADMIN};
use crate::types::{DbId, Timestamp};

/// Maximum length of a task title.
pub const MAX_TITLE_LENGTH: usize = 255;

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";

/// All accepted priority values.
pub const VALID_PRIORITIES: &[&str] = &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH];

pub const STATUS_TODO: &str = "todo";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_DONE: &str = "done";

/// All accepted status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_TODO, STATUS_IN_PROGRESS, STATUS_DONE];

/// Validate a task title.
pub fn validate_title(title: &str) -> Result<(), String> {
    validate_required_text("title", title, MAX_TITLE_LENGTH)
}

/// Validate a task description. Descriptions have no length limit beyond
/// what the column holds.
pub fn validate_description(description: Option<&str>) -> Result<(), String> {
    validate_optional_text("description", description, 10_000)
}

pub fn validate_priority(priority: &str) -> Result<(), String> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_PRIORITIES.join(", ")
        ))
    }
}

pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

/// A task is overdue when it has a deadline in the past and is not done.
pub fn is_overdue(status: &str, deadline: Option<Timestamp>, now: Timestamp) -> bool {
    status != STATUS_DONE && deadline.is_some_and(|d| d < now)
}

/// Whether `user_id` may place a task in `assignee_id`'s list.
pub fn can_assign_to(user_id: DbId, role: &str, assignee_id: DbId) -> bool {
    assignee_id == user_id || roles::can_assign_tasks(role)
}

/// Whether `user_id` may edit a task: its owner, its creator, or an admin.
pub fn can_edit(owner_id: DbId, creator_id: DbId, user_id: DbId, role: &str) -> bool {
    user_id == owner_id || user_id == creator_id || role == ROLE_ADMIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_END_USER, ROLE_TASK_MANAGER};
    use chrono::{Duration, Utc};

    #[test]
    fn vocabularies_validate() {
        assert!(validate_priority("high").is_ok());
        assert!(validate_priority("urgent").is_err());
        assert!(validate_status("in_progress").is_ok());
        let err = validate_status("To Do").unwrap_err();
        assert!(err.contains("todo, in_progress, done"));
    }

    #[test]
    fn overdue_requires_past_deadline_and_open_status() {
        let now = Utc::now();
        let past = Some(now - Duration::hours(1));
        let future = Some(now + Duration::hours(1));
        assert!(is_overdue(STATUS_TODO, past, now));
        assert!(!is_overdue(STATUS_DONE, past, now));
        assert!(!is_overdue(STATUS_IN_PROGRESS, future, now));
        assert!(!is_overdue(STATUS_TODO, None, now));
    }

    #[test]
    fn assignment_rules() {
        assert!(can_assign_to(1, ROLE_END_USER, 1));
        assert!(!can_assign_to(1, ROLE_END_USER, 2));
        assert!(can_assign_to(1, ROLE_TASK_MANAGER, 2));
        assert!(can_assign_to(1, ROLE_ADMIN, 2));
    }

    #[test]
    fn edit_rules() {
        // owner=1, creator=2
        assert!(can_edit(1, 2, 1, ROLE_END_USER));
        assert!(can_edit(1, 2, 2, ROLE_END_USER));
        assert!(!can_edit(1, 2, 3, ROLE_TASK_MANAGER));
        assert!(can_edit(1, 2, 3, ROLE_ADMIN));
    }
}
