//! Route definitions for the `/notifications` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// ```text
/// GET    /              -> list (?unread_only=&limit=&offset=)
/// GET    /unread-count  -> unread_count
/// POST   /read-all      -> mark_all_read
/// POST   /{id}/read     -> mark_read
/// PUT    /{id}          -> update ({ "read": bool })
/// DELETE /{id}          -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list))
        .route("/unread-count", get(notification::unread_count))
        .route("/read-all", post(notification::mark_all_read))
        .route("/{id}/read", post(notification::mark_read))
        .route("/{id}", put(notification::update).delete(notification::delete))
}
