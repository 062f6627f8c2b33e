//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod calendar_event_repo;
pub mod category_repo;
pub mod habit_entry_repo;
pub mod habit_repo;
pub mod notification_repo;
pub mod pomodoro_repo;
pub mod session_repo;
pub mod task_repo;
pub mod user_repo;

pub use calendar_event_repo::CalendarEventRepo;
pub use category_repo::CategoryRepo;
pub use habit_entry_repo::HabitEntryRepo;
pub use habit_repo::HabitRepo;
pub use notification_repo::NotificationRepo;
pub use pomodoro_repo::{PomodoroSessionRepo, PomodoroSettingsRepo};
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
