//! Background jobs.
//!
//! Each submodule provides a long-running async function meant for
//! `tokio::spawn`. All of them stop when their [`CancellationToken`]
//! fires.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod deadline_reminders;
pub mod session_cleanup;
