//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod calendar_event;
pub mod category;
pub mod habit;
pub mod habit_entry;
pub mod notification;
pub mod pomodoro;
pub mod session;
pub mod task;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Wrap a present JSON value in `Some`, so that with `#[serde(default)]` a
/// missing key stays `None` while an explicit `null` becomes `Some(None)`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
