//! Shared response envelope.
//!
//! Resource endpoints answer `{ "data": ... }`. Auth endpoints return their
//! token payload unwrapped.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: habits }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
