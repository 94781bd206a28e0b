//! Gharpayy domain events.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the event envelope published after every
//!   marketplace mutation.
//! - [`EventPersistence`]: background service that writes every event to
//!   the `events` table.

pub mod bus;
pub mod persistence;

pub use bus::{event_types, EventBus, PlatformEvent};
pub use persistence::{EventPersistence, PersistenceStats};
