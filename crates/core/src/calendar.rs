//! Calendar event vocabulary and validation.

use crate::fields::validate_required_text;
use crate::types::Timestamp;

/// Maximum length of an event title.
pub const MAX_TITLE_LENGTH: usize = 255;

pub const EVENT_TASK_DEADLINE: &str = "task_deadline";
pub const EVENT_HABIT_REMINDER: &str = "habit_reminder";
pub const EVENT_CUSTOM: &str = "custom_event";
pub const EVENT_MEETING: &str = "meeting";

/// All accepted `event_type` values.
pub const VALID_EVENT_TYPES: &[&str] = &[
    EVENT_TASK_DEADLINE,
    EVENT_HABIT_REMINDER,
    EVENT_CUSTOM,
    EVENT_MEETING,
];

pub const SOURCE_TASK: &str = "task";
pub const SOURCE_HABIT: &str = "habit";
pub const SOURCE_MANUAL: &str = "manual";

/// All accepted `source_type` values.
pub const VALID_SOURCE_TYPES: &[&str] = &[SOURCE_TASK, SOURCE_HABIT, SOURCE_MANUAL];

pub fn validate_title(title: &str) -> Result<(), String> {
    validate_required_text("title", title, MAX_TITLE_LENGTH)
}

pub fn validate_event_type(event_type: &str) -> Result<(), String> {
    if VALID_EVENT_TYPES.contains(&event_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid event type '{event_type}'. Must be one of: {}",
            VALID_EVENT_TYPES.join(", ")
        ))
    }
}

pub fn validate_source_type(source_type: &str) -> Result<(), String> {
    if VALID_SOURCE_TYPES.contains(&source_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid source type '{source_type}'. Must be one of: {}",
            VALID_SOURCE_TYPES.join(", ")
        ))
    }
}

/// An event may not end before it starts. Zero-length events are allowed.
pub fn validate_range(start: Timestamp, end: Timestamp) -> Result<(), String> {
    if end < start {
        return Err("end must be on or after start".to_string());
    }
    Ok(())
}
