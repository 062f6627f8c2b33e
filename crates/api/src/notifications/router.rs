//! Event-to-notification routing.

use lockedin_core::notifications::NotificationDraft;
use lockedin_db::repositories::NotificationRepo;
use lockedin_db::DbPool;
use lockedin_events::{DomainEvent, EventKind};
use tokio::sync::broadcast;

/// Turns domain events into rows in `notifications`.
pub struct NotificationRouter {
    pool: DbPool,
}

impl NotificationRouter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run until the event bus is dropped.
    ///
    /// A failed insert is logged and the loop moves on; lagging behind the
    /// channel drops the oldest events.
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = event.event_type(),
                            user_id = event.user_id,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Store the notification for one event.
    pub async fn route_event(&self, event: &DomainEvent) -> Result<(), sqlx::Error> {
        let draft = draft_for(event);
        let notification = NotificationRepo::create(&self.pool, &draft).await?;
        tracing::debug!(
            notification_id = notification.id,
            user_id = event.user_id,
            event_type = event.event_type(),
            "Notification created"
        );
        Ok(())
    }
}

/// The notification a user sees for `event`.
pub fn draft_for(event: &DomainEvent) -> NotificationDraft {
    let user_id = event.user_id;
    match &event.kind {
        EventKind::StreakMilestone {
            habit_id,
            habit_title,
            streak,
        } => NotificationDraft::streak_milestone(user_id, *habit_id, habit_title, *streak),
        EventKind::BestStreak {
            habit_id,
            habit_title,
            best_streak,
        } => NotificationDraft::new_best_streak(user_id, *habit_id, habit_title, *best_streak),
        EventKind::PomodoroCompleted {
            session_id,
            duration_minutes,
            task_title,
        } => NotificationDraft::pomodoro_complete(
            user_id,
            *session_id,
            *duration_minutes,
            task_title.as_deref(),
        ),
        EventKind::DeadlineApproaching {
            task_id,
            task_title,
            deadline,
        } => NotificationDraft::deadline_approaching(user_id, *task_id, task_title, *deadline),
        EventKind::TaskOverdue {
            task_id,
            task_title,
            deadline,
        } => NotificationDraft::deadline_overdue(user_id, *task_id, task_title, *deadline),
    }
}
