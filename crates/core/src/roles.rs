//! Well-known role names.
//!
//! These must match the values allowed by the `users.role` CHECK constraint.

/// Default role for self-registered accounts.
pub const ROLE_END_USER: &str = "end_user";

/// May assign tasks to other users.
pub const ROLE_TASK_MANAGER: &str = "task_manager";

/// Full access, including editing any task.
pub const ROLE_ADMIN: &str = "admin";

/// Whether `role` may create or re-assign tasks owned by someone else.
pub fn can_assign_tasks(role: &str) -> bool {
    role == ROLE_TASK_MANAGER || role == ROLE_ADMIN
}
