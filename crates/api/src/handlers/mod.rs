//! Request handlers, one module per resource.
//!
//! Handlers validate input with the `lockedin_core` rules, check ownership
//! against [`AuthUser`](crate::middleware::auth::AuthUser), delegate to the
//! `lockedin_db` repositories and map errors via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod calendar_event;
pub mod category;
pub mod habit;
pub mod habit_entry;
pub mod notification;
pub mod pomodoro;
pub mod report;
pub mod task;
