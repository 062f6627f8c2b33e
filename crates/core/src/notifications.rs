//! Notification types, streak milestones and message text.
//!
//! Drafts are built here so the notification router and the background
//! jobs produce identical wording.

use serde::Serialize;
use serde_json::json;

use crate::types::{DbId, Timestamp};

pub const TYPE_TASK_REMINDER: &str = "task_reminder";
pub const TYPE_HABIT_REMINDER: &str = "habit_reminder";
pub const TYPE_DEADLINE_APPROACHING: &str = "deadline_approaching";
pub const TYPE_DEADLINE_OVERDUE: &str = "deadline_overdue";
pub const TYPE_POMODORO_COMPLETE: &str = "pomodoro_complete";
pub const TYPE_STREAK_MILESTONE: &str = "streak_milestone";
pub const TYPE_SYSTEM: &str = "system";

/// All accepted `notification_type` values.
pub const VALID_TYPES: &[&str] = &[
    TYPE_TASK_REMINDER,
    TYPE_HABIT_REMINDER,
    TYPE_DEADLINE_APPROACHING,
    TYPE_DEADLINE_OVERDUE,
    TYPE_POMODORO_COMPLETE,
    TYPE_STREAK_MILESTONE,
    TYPE_SYSTEM,
];

/// Streak lengths worth celebrating.
pub const STREAK_MILESTONES: &[i32] = &[3, 7, 14, 30, 60, 100, 365];

/// Default and maximum page sizes for notification listings.
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

/// The milestone reached when a streak moves from `previous` to `current`,
/// if any. Only an increase that lands on or passes a milestone counts.
pub fn crossed_milestone(previous: i32, current: i32) -> Option<i32> {
    STREAK_MILESTONES
        .iter()
        .rev()
        .copied()
        .find(|m| previous < *m && current >= *m)
}

/// A new personal best worth announcing. A best of one is not news.
pub fn is_new_best(previous_best: i32, new_best: i32) -> bool {
    new_best > previous_best && new_best > 1
}

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// A notification ready to be inserted for `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationDraft {
    pub user_id: DbId,
    pub notification_type: &'static str,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub metadata: serde_json::Value,
}

impl NotificationDraft {
    pub fn streak_milestone(user_id: DbId, habit_id: DbId, habit_title: &str, streak: i32) -> Self {
        Self {
            user_id,
            notification_type: TYPE_STREAK_MILESTONE,
            title: format!("{streak}-day streak!"),
            message: format!("You've completed \"{habit_title}\" {streak} days in a row. Keep it up!"),
            action_url: Some(format!("/habits/{habit_id}")),
            metadata: json!({ "habit_id": habit_id, "streak": streak }),
        }
    }

    pub fn new_best_streak(user_id: DbId, habit_id: DbId, habit_title: &str, best: i32) -> Self {
        Self {
            user_id,
            notification_type: TYPE_STREAK_MILESTONE,
            title: "New personal best".to_string(),
            message: format!("\"{habit_title}\" reached a new best streak of {best} days."),
            action_url: Some(format!("/habits/{habit_id}")),
            metadata: json!({ "habit_id": habit_id, "best_streak": best }),
        }
    }

    pub fn pomodoro_complete(
        user_id: DbId,
        session_id: DbId,
        duration_minutes: i32,
        task_title: Option<&str>,
    ) -> Self {
        let message = match task_title {
            Some(title) => {
                format!("You focused for {duration_minutes} minutes on \"{title}\". Time for a break.")
            }
            None => format!("You focused for {duration_minutes} minutes. Time for a break."),
        };
        Self {
            user_id,
            notification_type: TYPE_POMODORO_COMPLETE,
            title: "Pomodoro complete".to_string(),
            message,
            action_url: Some("/pomodoro".to_string()),
            metadata: json!({ "session_id": session_id, "duration_minutes": duration_minutes }),
        }
    }

    pub fn deadline_approaching(
        user_id: DbId,
        task_id: DbId,
        task_title: &str,
        deadline: Timestamp,
    ) -> Self {
        Self {
            user_id,
            notification_type: TYPE_DEADLINE_APPROACHING,
            title: "Deadline approaching".to_string(),
            message: format!(
                "\"{task_title}\" is due {}.",
                deadline.format("%Y-%m-%d %H:%M UTC")
            ),
            action_url: Some(format!("/tasks/{task_id}")),
            metadata: json!({ "task_id": task_id, "deadline": deadline }),
        }
    }

    pub fn deadline_overdue(
        user_id: DbId,
        task_id: DbId,
        task_title: &str,
        deadline: Timestamp,
    ) -> Self {
        Self {
            user_id,
            notification_type: TYPE_DEADLINE_OVERDUE,
            title: "Task overdue".to_string(),
            message: format!(
                "\"{task_title}\" was due {}.",
                deadline.format("%Y-%m-%d %H:%M UTC")
            ),
            action_url: Some(format!("/tasks/{task_id}")),
            metadata: json!({ "task_id": task_id, "deadline": deadline }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn milestone_crossed_only_on_increase() {
        assert_eq!(crossed_milestone(2, 3), Some(3));
        assert_eq!(crossed_milestone(6, 7), Some(7));
        assert_eq!(crossed_milestone(3, 4), None);
        assert_eq!(crossed_milestone(7, 3), None);
        assert_eq!(crossed_milestone(0, 0), None);
    }

    #[test]
    fn jump_past_several_milestones_reports_highest() {
        // Backfilling a month of entries at once.
        assert_eq!(crossed_milestone(0, 31), Some(30));
    }

    #[test]
    fn new_best_ignores_single_day() {
        assert!(!is_new_best(0, 1));
        assert!(is_new_best(1, 2));
        assert!(!is_new_best(5, 5));
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(1000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn drafts_carry_type_and_links() {
        let draft = NotificationDraft::streak_milestone(1, 9, "Read", 7);
        assert_eq!(draft.notification_type, TYPE_STREAK_MILESTONE);
        assert_eq!(draft.title, "7-day streak!");
        assert_eq!(draft.action_url.as_deref(), Some("/habits/9"));
        assert_eq!(draft.metadata["streak"], 7);

        let deadline = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let draft = NotificationDraft::deadline_overdue(1, 4, "Taxes", deadline);
        assert_eq!(draft.notification_type, TYPE_DEADLINE_OVERDUE);
        assert!(draft.message.contains("2024-03-01 09:30 UTC"));
    }

    #[test]
    fn pomodoro_message_mentions_task_when_present() {
        let with = NotificationDraft::pomodoro_complete(1, 2, 25, Some("Write report"));
        assert!(with.message.contains("Write report"));
        let without = NotificationDraft::pomodoro_complete(1, 2, 25, None);
        assert!(without.message.starts_with("You focused for 25 minutes."));
    }
}
