//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Handlers and background jobs publish after their database work commits;
//! the notification router is the main subscriber. Share the bus as
//! `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use lockedin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

pub const HABIT_STREAK_MILESTONE: &str = "habit.streak_milestone";
pub const HABIT_BEST_STREAK: &str = "habit.best_streak";
pub const POMODORO_COMPLETED: &str = "pomodoro.completed";
pub const TASK_DEADLINE_APPROACHING: &str = "task.deadline_approaching";
pub const TASK_OVERDUE: &str = "task.overdue";

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// What happened, with the data a subscriber needs to act on it without
/// another database round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum EventKind {
    #[serde(rename = "habit.streak_milestone")]
    StreakMilestone {
        habit_id: DbId,
        habit_title: String,
        streak: i32,
    },
    #[serde(rename = "habit.best_streak")]
    BestStreak {
        habit_id: DbId,
        habit_title: String,
        best_streak: i32,
    },
    #[serde(rename = "pomodoro.completed")]
    PomodoroCompleted {
        session_id: DbId,
        duration_minutes: i32,
        task_title: Option<String>,
    },
    #[serde(rename = "task.deadline_approaching")]
    DeadlineApproaching {
        task_id: DbId,
        task_title: String,
        deadline: Timestamp,
    },
    #[serde(rename = "task.overdue")]
    TaskOverdue {
        task_id: DbId,
        task_title: String,
        deadline: Timestamp,
    },
}

impl EventKind {
    /// Dot-separated event name, e.g. `"habit.streak_milestone"`.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventKind::StreakMilestone { .. } => HABIT_STREAK_MILESTONE,
            EventKind::BestStreak { .. } => HABIT_BEST_STREAK,
            EventKind::PomodoroCompleted { .. } => POMODORO_COMPLETED,
            EventKind::DeadlineApproaching { .. } => TASK_DEADLINE_APPROACHING,
            EventKind::TaskOverdue { .. } => TASK_OVERDUE,
        }
    }
}

/// A domain event concerning one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    /// The user the event is about, and who gets notified.
    pub user_id: DbId,

    #[serde(flatten)]
    pub kind: EventKind,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(user_id: DbId, kind: EventKind) -> Self {
        Self {
            user_id,
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use lockedin_events::bus::{DomainEvent, EventBus, EventKind};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DomainEvent::new(
///     1,
///     EventKind::StreakMilestone { habit_id: 3, habit_title: "Read".into(), streak: 7 },
/// ));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unconsumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: DomainEvent) {
        let event_type = event.event_type();
        if self.sender.send(event).is_err() {
            tracing::debug!(event_type, "No subscribers, event dropped");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
