use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and everything else is
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: lockedin_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Handlers publish here after their writes commit.
    pub event_bus: Arc<lockedin_events::EventBus>,
}
