//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` in the API state. Handlers
//! publish after a mutation has committed; subscribers never block them.

use gharpayy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Dot-separated names of every event the marketplace publishes.
pub mod event_types {
    pub const USER_SIGNED_UP: &str = "user.signed_up";
    pub const LISTING_CREATED: &str = "listing.created";
    pub const LISTING_APPROVED: &str = "listing.approved";
    pub const LISTING_REJECTED: &str = "listing.rejected";
    pub const BOOKING_CREATED: &str = "booking.created";
    pub const BOOKING_STATUS_CHANGED: &str = "booking.status_changed";
    pub const INQUIRY_CREATED: &str = "inquiry.created";
    pub const INQUIRY_RESPONDED: &str = "inquiry.responded";
    pub const REVIEW_ADDED: &str = "review.added";
    pub const TICKET_CREATED: &str = "ticket.created";
    pub const TICKET_STATUS_CHANGED: &str = "ticket.status_changed";
}

/// A domain event that occurred on the platform.
///
/// Constructed via [`PlatformEvent::new`] and enriched with the builder
/// methods [`with_source`](PlatformEvent::with_source),
/// [`with_actor`](PlatformEvent::with_actor), and
/// [`with_payload`](PlatformEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// One of [`event_types`], e.g. `"booking.created"`.
    pub event_type: String,

    /// Source entity kind (`"listing"`, `"booking"`, ...).
    pub source_entity_type: Option<String>,

    pub source_entity_id: Option<DbId>,

    /// The user whose request caused the event.
    pub actor_user_id: Option<DbId>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: Timestamp,
}

impl PlatformEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use gharpayy_events::bus::{event_types, EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new(event_types::LISTING_CREATED).with_source("listing", 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unconsumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: PlatformEvent) {
        tracing::debug!(event_type = %event.event_type, "Publishing event");
        // A send error only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_booking_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            PlatformEvent::new(event_types::BOOKING_CREATED)
                .with_source("booking", 42)
                .with_actor(7)
                .with_payload(serde_json::json!({"listing_id": 3})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "booking.created");
        assert_eq!(received.source_entity_type.as_deref(), Some("booking"));
        assert_eq!(received.source_entity_id, Some(42));
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.payload["listing_id"], 3);
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(PlatformEvent::new(event_types::REVIEW_ADDED));
        bus.publish(PlatformEvent::new(event_types::TICKET_CREATED));

        for rx in [&mut rx1, &mut rx2] {
            assert_eq!(rx.recv().await.unwrap().event_type, "review.added");
            assert_eq!(rx.recv().await.unwrap().event_type, "ticket.created");
        }
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(PlatformEvent::new(event_types::LISTING_CREATED));
    }

    #[tokio::test]
    async fn slow_subscriber_observes_lag() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..3 {
            bus.publish(PlatformEvent::new(event_types::INQUIRY_CREATED));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
    }
}
