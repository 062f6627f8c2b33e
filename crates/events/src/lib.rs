//! Locked In domain events.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`]: the event envelope, addressed to one user.

pub mod bus;

pub use bus::{DomainEvent, EventBus, EventKind};
