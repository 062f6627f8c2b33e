//! Periodic sweep that announces approaching and missed task deadlines.
//!
//! Tasks are claimed with a single `UPDATE ... RETURNING`, so each deadline
//! produces at most one event of each kind even with several sweepers.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lockedin_db::repositories::TaskRepo;
use lockedin_events::{DomainEvent, EventBus, EventKind};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Counts from one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub approaching: usize,
    pub overdue: usize,
}

/// Run the reminder loop until `cancel` fires.
pub async fn run(
    pool: PgPool,
    event_bus: Arc<EventBus>,
    interval: Duration,
    lookahead: chrono::Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        lookahead_hours = lookahead.num_hours(),
        "Deadline reminder job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Deadline reminder job stopping");
                break;
            }
            _ = ticker.tick() => {
                match sweep(&pool, &event_bus, lookahead).await {
                    Ok(outcome) if outcome != SweepOutcome::default() => {
                        tracing::info!(
                            approaching = outcome.approaching,
                            overdue = outcome.overdue,
                            "Deadline reminders sent"
                        );
                    }
                    Ok(_) => tracing::debug!("Deadline reminders: nothing due"),
                    Err(e) => tracing::error!(error = %e, "Deadline reminders: sweep failed"),
                }
            }
        }
    }
}

/// Claim due tasks and publish one event per task.
pub async fn sweep(
    pool: &PgPool,
    event_bus: &EventBus,
    lookahead: chrono::Duration,
) -> Result<SweepOutcome, sqlx::Error> {
    let now = Utc::now();

    let approaching = TaskRepo::claim_due_for_reminder(pool, now, now + lookahead).await?;
    for task in &approaching {
        if let Some(deadline) = task.deadline {
            event_bus.publish(DomainEvent::new(
                task.user_id,
                EventKind::DeadlineApproaching {
                    task_id: task.id,
                    task_title: task.title.clone(),
                    deadline,
                },
            ));
        }
    }

    let overdue = TaskRepo::claim_overdue(pool, now).await?;
    for task in &overdue {
        if let Some(deadline) = task.deadline {
            event_bus.publish(DomainEvent::new(
                task.user_id,
                EventKind::TaskOverdue {
                    task_id: task.id,
                    task_title: task.title.clone(),
                    deadline,
                },
            ));
        }
    }

    Ok(SweepOutcome {
        approaching: approaching.len(),
        overdue: overdue.len(),
    })
}
