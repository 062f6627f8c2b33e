//! Pomodoro session vocabulary, per-user settings and cycle logic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fields::validate_optional_text;

pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All accepted session status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_IN_PROGRESS, STATUS_COMPLETED, STATUS_CANCELLED];

/// Bounds for any configured session length, in minutes.
pub const MIN_DURATION_MINUTES: i32 = 1;
pub const MAX_DURATION_MINUTES: i32 = 180;

/// Bounds for the number of work sessions before a long break.
pub const MIN_LONG_BREAK_INTERVAL: i32 = 1;
pub const MAX_LONG_BREAK_INTERVAL: i32 = 12;

pub const MAX_NOTES_LENGTH: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [
        SessionType::Work,
        SessionType::ShortBreak,
        SessionType::LongBreak,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "short_break",
            SessionType::LongBreak => "long_break",
        }
    }

    pub fn is_break(self) -> bool {
        self != SessionType::Work
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                format!("Invalid session type '{s}'. Must be one of: work, short_break, long_break")
            })
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

pub fn validate_duration(field: &str, minutes: i32) -> Result<(), String> {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(format!(
            "{field} must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes"
        ));
    }
    Ok(())
}

pub fn validate_notes(notes: Option<&str>) -> Result<(), String> {
    validate_optional_text("notes", notes, MAX_NOTES_LENGTH)
}

/// Timer configuration for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    pub work_minutes: i32,
    pub short_break_minutes: i32,
    pub long_break_minutes: i32,
    pub long_break_interval: i32,
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 3,
            auto_start_breaks: false,
            auto_start_pomodoros: false,
        }
    }
}

impl PomodoroSettings {
    pub fn validate(&self) -> Result<(), String> {
        validate_duration("work_minutes", self.work_minutes)?;
        validate_duration("short_break_minutes", self.short_break_minutes)?;
        validate_duration("long_break_minutes", self.long_break_minutes)?;
        if !(MIN_LONG_BREAK_INTERVAL..=MAX_LONG_BREAK_INTERVAL).contains(&self.long_break_interval)
        {
            return Err(format!(
                "long_break_interval must be between {MIN_LONG_BREAK_INTERVAL} and {MAX_LONG_BREAK_INTERVAL}"
            ));
        }
        Ok(())
    }
}

/// Configured length of a session of the given type.
pub fn duration_for(session_type: SessionType, settings: &PomodoroSettings) -> i32 {
    match session_type {
        SessionType::Work => settings.work_minutes,
        SessionType::ShortBreak => settings.short_break_minutes,
        SessionType::LongBreak => settings.long_break_minutes,
    }
}

/// What the timer should offer next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextSession {
    pub session_type: SessionType,
    pub duration_minutes: i32,
    pub auto_start: bool,
    /// Work sessions completed since the last long break, after this
    /// suggestion is taken into account.
    pub completed_in_cycle: i32,
}

/// Where a user stands in the cycle, given their completed sessions in
/// chronological order: the last session type and the number of work
/// sessions completed since the last long break.
pub fn cycle_position(completed: &[SessionType]) -> (Option<SessionType>, i32) {
    let since_long = completed
        .iter()
        .rev()
        .take_while(|t| **t != SessionType::LongBreak)
        .filter(|t| **t == SessionType::Work)
        .count();
    (
        completed.last().copied(),
        i32::try_from(since_long).unwrap_or(i32::MAX),
    )
}

/// Next session after `last`.
///
/// After a work session the user gets a long break once
/// `work_since_long_break` reaches the configured interval, otherwise a
/// short break. After any break, or with no history, the next session is
/// work.
pub fn next_session(
    last: Option<SessionType>,
    work_since_long_break: i32,
    settings: &PomodoroSettings,
) -> NextSession {
    let session_type = match last {
        Some(SessionType::Work) if work_since_long_break >= settings.long_break_interval => {
            SessionType::LongBreak
        }
        Some(SessionType::Work) => SessionType::ShortBreak,
        _ => SessionType::Work,
    };
    let auto_start = if session_type.is_break() {
        settings.auto_start_breaks
    } else {
        settings.auto_start_pomodoros
    };
    let completed_in_cycle = if session_type == SessionType::LongBreak {
        0
    } else {
        work_since_long_break
    };
    NextSession {
        session_type,
        duration_minutes: duration_for(session_type, settings),
        auto_start,
        completed_in_cycle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionType::*;

    fn next_from(history: &[SessionType]) -> SessionType {
        let (last, count) = cycle_position(history);
        next_session(last, count, &PomodoroSettings::default()).session_type
    }

    #[test]
    fn empty_history_starts_with_work() {
        let next = next_session(None, 0, &PomodoroSettings::default());
        assert_eq!(next.session_type, Work);
        assert_eq!(next.duration_minutes, 25);
        assert!(!next.auto_start);
    }

    #[test]
    fn full_cycle_with_default_interval() {
        assert_eq!(next_from(&[Work]), ShortBreak);
        assert_eq!(next_from(&[Work, ShortBreak]), Work);
        assert_eq!(next_from(&[Work, ShortBreak, Work]), ShortBreak);
        assert_eq!(next_from(&[Work, ShortBreak, Work, ShortBreak, Work]), LongBreak);
        assert_eq!(
            next_from(&[Work, ShortBreak, Work, ShortBreak, Work, LongBreak]),
            Work
        );
    }

    #[test]
    fn count_resets_after_long_break() {
        let history = [Work, ShortBreak, Work, ShortBreak, Work, LongBreak, Work];
        assert_eq!(cycle_position(&history), (Some(Work), 1));
        assert_eq!(next_from(&history), ShortBreak);
    }

    #[test]
    fn interval_of_one_always_long_breaks() {
        let settings = PomodoroSettings {
            long_break_interval: 1,
            ..Default::default()
        };
        let next = next_session(Some(Work), 1, &settings);
        assert_eq!(next.session_type, LongBreak);
        assert_eq!(next.duration_minutes, 15);
        assert_eq!(next.completed_in_cycle, 0);
    }

    #[test]
    fn auto_start_follows_session_kind() {
        let settings = PomodoroSettings {
            auto_start_breaks: true,
            ..Default::default()
        };
        assert!(next_session(Some(Work), 1, &settings).auto_start);
        assert!(!next_session(Some(ShortBreak), 1, &settings).auto_start);
    }

    #[test]
    fn settings_bounds() {
        assert!(PomodoroSettings::default().validate().is_ok());
        let bad = PomodoroSettings {
            work_minutes: 0,
            ..Default::default()
        };
        assert!(bad.validate().unwrap_err().contains("work_minutes"));
        let bad = PomodoroSettings {
            long_break_minutes: 181,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = PomodoroSettings {
            long_break_interval: 13,
            ..Default::default()
        };
        assert!(bad.validate().unwrap_err().contains("long_break_interval"));
    }

    #[test]
    fn session_type_text() {
        assert_eq!("short_break".parse::<SessionType>().unwrap(), ShortBreak);
        assert!("break".parse::<SessionType>().is_err());
        assert_eq!(serde_json::to_string(&LongBreak).unwrap(), "\"long_break\"");
    }
}
