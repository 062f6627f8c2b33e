//! Habit vocabulary and field validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fields::{validate_optional_text, validate_required_text};

/// Maximum length of a habit title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum length of a habit unit label (e.g. "minutes", "pages").
pub const MAX_UNIT_LENGTH: usize = 50;

/// Maximum length of a habit color value.
pub const MAX_COLOR_LENGTH: usize = 50;

/// Maximum length of a habit icon name.
pub const MAX_ICON_LENGTH: usize = 100;

/// How often a habit is expected to be completed.
///
/// Stored as lowercase text in `habits.frequency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Every accepted frequency, in display order.
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                format!("Invalid frequency '{s}'. Must be one of: daily, weekly, monthly")
            })
    }
}

/// Validate a habit title.
pub fn validate_title(title: &str) -> Result<(), String> {
    validate_required_text("title", title, MAX_TITLE_LENGTH)
}

/// Validate a habit unit label.
pub fn validate_unit(unit: &str) -> Result<(), String> {
    validate_required_text("unit", unit, MAX_UNIT_LENGTH)
}

/// The per-period target must be a positive amount.
pub fn validate_target(target: i32) -> Result<(), String> {
    if target <= 0 {
        return Err("target must be greater than zero".to_string());
    }
    Ok(())
}

/// Validate the optional presentation fields of a habit.
pub fn validate_appearance(color: Option<&str>, icon: Option<&str>) -> Result<(), String> {
    validate_optional_text("color", color, MAX_COLOR_LENGTH)?;
    validate_optional_text("icon", icon, MAX_ICON_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_round_trips_through_text() {
        for f in Frequency::ALL {
            assert_eq!(f.as_str().parse::<Frequency>().unwrap(), f);
        }
    }

    #[test]
    fn unknown_frequency_rejected() {
        let err = "hourly".parse::<Frequency>().unwrap_err();
        assert!(err.contains("hourly"));
        assert!("Daily".parse::<Frequency>().is_err(), "parsing is case-sensitive");
    }

    #[test]
    fn frequency_serializes_lowercase() {
        let json = serde_json::to_string(&Frequency::Weekly).unwrap();
        assert_eq!(json, "\"weekly\"");
    }

    #[test]
    fn target_must_be_positive() {
        assert!(validate_target(0).is_err());
        assert!(validate_target(-3).is_err());
        assert!(validate_target(1).is_ok());
    }

    #[test]
    fn unit_length_limit() {
        assert!(validate_unit("minutes").is_ok());
        assert!(validate_unit(&"x".repeat(MAX_UNIT_LENGTH + 1)).is_err());
        assert!(validate_unit("").is_err());
    }
}
