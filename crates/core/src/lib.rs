//! Domain logic for the Locked In productivity backend.
//!
//! Everything here is pure: no database, no clock reads, no I/O. The `db`
//! and `api` crates build on these types and rules.

pub mod calendar;
pub mod error;
pub mod fields;
pub mod habits;
pub mod notifications;
pub mod pomodoro;
pub mod progress;
pub mod reports;
pub mod roles;
pub mod streak;
pub mod tasks;
pub mod types;
