//! Event-driven notification delivery.
//!
//! The [`NotificationRouter`] subscribes to the event bus and stores an
//! in-app notification for each event that warrants one.

pub mod router;

pub use router::NotificationRouter;
