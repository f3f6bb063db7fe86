//! Broadcast channel for domain events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every state
//! mutation publishes a [`TallyEvent`] through the bus, and all WebSocket
//! connections subscribe to receive filtered events.

use tokio::sync::broadcast;

use super::TallyEvent;

/// Broadcast bus for [`TallyEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest events are dropped for lagging
/// receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TallyEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to every connected screen and returns how many
    /// received it. With nobody listening the event is dropped.
    pub fn publish(&self, event: TallyEvent) -> usize {
        let kind = event.event_type_str();
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(event = kind, delivered, "tally event published");
        delivered
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TallyEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BeverageId;
    use chrono::Utc;

    fn make_event(id: &str) -> TallyEvent {
        TallyEvent::AvailabilityToggled {
            beverage_id: BeverageId::new(id),
            available: true,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(make_event("hugo")), 0);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.publish(make_event("hugo")), 2);

        let Ok(e1) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(e2) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(e1.beverage_id(), e2.beverage_id());
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = EventBus::new(16);
        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);
        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let _rx = bus.subscribe();
        assert_eq!(bus.publish(make_event("hugo")), 1);
    }
}
