//! Productivity summary aggregation.
//!
//! The database layer loads plain snapshots for the requested period and
//! [`summarize`] folds them into the report payload.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::pomodoro::{SessionType, STATUS_COMPLETED as SESSION_COMPLETED};
use crate::tasks::{
    self, PRIORITY_HIGH, PRIORITY_LOW, PRIORITY_MEDIUM, STATUS_DONE, STATUS_IN_PROGRESS,
    STATUS_TODO,
};
use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Week,
    Month,
    All,
}

impl ReportPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportPeriod::Week => "week",
            ReportPeriod::Month => "month",
            ReportPeriod::All => "all",
        }
    }

    /// Inclusive lower bound of the period, or `None` for all time.
    pub fn start(self, now: Timestamp) -> Option<Timestamp> {
        match self {
            ReportPeriod::Week => Some(now - Duration::days(7)),
            ReportPeriod::Month => Some(now - Duration::days(30)),
            ReportPeriod::All => None,
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(ReportPeriod::Week),
            "month" => Ok(ReportPeriod::Month),
            "all" => Ok(ReportPeriod::All),
            other => Err(format!(
                "Invalid period '{other}'. Must be one of: week, month, all"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub status: String,
    pub priority: String,
    pub deadline: Option<Timestamp>,
}

/// A habit with its live (recomputed) stats.
#[derive(Debug, Clone, Copy)]
pub struct HabitSnapshot {
    pub is_active: bool,
    pub streak: i32,
    pub best_streak: i32,
    pub total_completions: i32,
}

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session_type: SessionType,
    pub status: String,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub total: i64,
    pub completed: i64,
    pub in_progress: i64,
    pub todo: i64,
    pub overdue: i64,
    pub by_priority: PriorityBreakdown,
    pub completion_rate: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub total: i64,
    pub active: i64,
    pub total_completions: i64,
    pub average_streak: i32,
    pub best_streak: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PomodoroSummary {
    pub total_sessions: i64,
    pub completed_sessions: i64,
    pub focus_minutes: i64,
    pub average_session_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub period: ReportPeriod,
    pub tasks: TaskSummary,
    pub habits: HabitSummary,
    pub pomodoro: PomodoroSummary,
}

pub fn summarize(
    period: ReportPeriod,
    tasks: &[TaskSnapshot],
    habits: &[HabitSnapshot],
    sessions: &[SessionSnapshot],
    now: Timestamp,
) -> ReportSummary {
    ReportSummary {
        period,
        tasks: summarize_tasks(tasks, now),
        habits: summarize_habits(habits),
        pomodoro: summarize_sessions(sessions),
    }
}

fn summarize_tasks(tasks: &[TaskSnapshot], now: Timestamp) -> TaskSummary {
    let mut summary = TaskSummary {
        total: tasks.len() as i64,
        ..Default::default()
    };
    for task in tasks {
        match task.status.as_str() {
            STATUS_DONE => summary.completed += 1,
            STATUS_IN_PROGRESS => summary.in_progress += 1,
            STATUS_TODO => summary.todo += 1,
            _ => {}
        }
        match task.priority.as_str() {
            PRIORITY_LOW => summary.by_priority.low += 1,
            PRIORITY_MEDIUM => summary.by_priority.medium += 1,
            PRIORITY_HIGH => summary.by_priority.high += 1,
            _ => {}
        }
        if tasks::is_overdue(&task.status, task.deadline, now) {
            summary.overdue += 1;
        }
    }
    summary.completion_rate = rounded_ratio(summary.completed * 100, summary.total);
    summary
}

fn summarize_habits(habits: &[HabitSnapshot]) -> HabitSummary {
    let total = habits.len() as i64;
    let streak_sum: i64 = habits.iter().map(|h| i64::from(h.streak)).sum();
    HabitSummary {
        total,
        active: habits.iter().filter(|h| h.is_active).count() as i64,
        total_completions: habits.iter().map(|h| i64::from(h.total_completions)).sum(),
        average_streak: rounded_ratio(streak_sum, total),
        best_streak: habits.iter().map(|h| h.best_streak).max().unwrap_or(0),
    }
}

fn summarize_sessions(sessions: &[SessionSnapshot]) -> PomodoroSummary {
    let completed: Vec<&SessionSnapshot> = sessions
        .iter()
        .filter(|s| s.status == SESSION_COMPLETED)
        .collect();
    let completed_minutes: i64 = completed
        .iter()
        .map(|s| i64::from(s.duration_minutes))
        .sum();
    PomodoroSummary {
        total_sessions: sessions.len() as i64,
        completed_sessions: completed.len() as i64,
        focus_minutes: completed
            .iter()
            .filter(|s| s.session_type == SessionType::Work)
            .map(|s| i64::from(s.duration_minutes))
            .sum(),
        average_session_minutes: rounded_ratio(completed_minutes, completed.len() as i64),
    }
}

/// `numerator / denominator` rounded half up, 0 for an empty denominator.
fn rounded_ratio(numerator: i64, denominator: i64) -> i32 {
    if denominator <= 0 {
        return 0;
    }
    let value = (2 * numerator + denominator) / (2 * denominator);
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(status: &str, priority: &str, deadline: Option<Timestamp>) -> TaskSnapshot {
        TaskSnapshot {
            status: status.to_string(),
            priority: priority.to_string(),
            deadline,
        }
    }

    fn session(session_type: SessionType, status: &str, minutes: i32) -> SessionSnapshot {
        SessionSnapshot {
            session_type,
            status: status.to_string(),
            duration_minutes: minutes,
        }
    }

    #[test]
    fn empty_report_is_all_zero() {
        let report = summarize(ReportPeriod::All, &[], &[], &[], Utc::now());
        assert_eq!(report.tasks, TaskSummary::default());
        assert_eq!(report.habits, HabitSummary::default());
        assert_eq!(report.pomodoro, PomodoroSummary::default());
    }

    #[test]
    fn task_counts_and_rate() {
        let now = Utc::now();
        let past = Some(now - Duration::days(1));
        let tasks = [
            task("done", "high", past),
            task("todo", "high", past),
            task("in_progress", "low", None),
        ];
        let summary = summarize_tasks(&tasks, now);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.todo, 1);
        assert_eq!(summary.overdue, 1, "done tasks are never overdue");
        assert_eq!(summary.by_priority, PriorityBreakdown { low: 1, medium: 0, high: 2 });
        assert_eq!(summary.completion_rate, 33);
    }

    #[test]
    fn habit_average_rounds_half_up() {
        let habit = |streak, best| HabitSnapshot {
            is_active: true,
            streak,
            best_streak: best,
            total_completions: streak,
        };
        let summary = summarize_habits(&[habit(1, 4), habit(2, 9)]);
        assert_eq!(summary.average_streak, 2, "1.5 rounds up");
        assert_eq!(summary.best_streak, 9);
        assert_eq!(summary.total_completions, 3);
    }

    #[test]
    fn focus_minutes_count_completed_work_only() {
        let sessions = [
            session(SessionType::Work, "completed", 25),
            session(SessionType::Work, "cancelled", 25),
            session(SessionType::ShortBreak, "completed", 5),
        ];
        let summary = summarize_sessions(&sessions);
        assert_eq!(summary.total_sessions, 3);
        assert_eq!(summary.completed_sessions, 2);
        assert_eq!(summary.focus_minutes, 25);
        assert_eq!(summary.average_session_minutes, 15);
    }

    #[test]
    fn period_parsing_and_bounds() {
        assert_eq!("month".parse::<ReportPeriod>().unwrap(), ReportPeriod::Month);
        assert!("year".parse::<ReportPeriod>().is_err());
        let now = Utc::now();
        assert_eq!(ReportPeriod::Week.start(now), Some(now - Duration::days(7)));
        assert_eq!(ReportPeriod::All.start(now), None);
    }
}
