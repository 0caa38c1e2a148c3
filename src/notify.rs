use dashmap::DashMap;
use tokio::sync::broadcast;
use ulid::Ulid;

use crate::model::Event;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for change notifications, one channel per villa.
///
/// The write path is asynchronous and external to the UI; subscribers use
/// these events to refresh after their optimistic local update. A subscriber
/// that falls more than the channel capacity behind sees a `Lagged` error on
/// `recv` and should do a full refresh instead of replaying events.
pub struct NotifyHub {
    channels: DashMap<Ulid, broadcast::Sender<Event>>,
    capacity: usize,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// A hub whose per-villa channels buffer `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity,
        }
    }

    /// Subscribe to notifications for a villa. Creates the channel if needed.
    pub fn subscribe(&self, villa_id: Ulid) -> broadcast::Receiver<Event> {
        let sender = self
            .channels
            .entry(villa_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        sender.subscribe()
    }

    /// Live receivers on a villa's channel; 0 when no channel exists.
    pub fn subscriber_count(&self, villa_id: &Ulid) -> usize {
        self.channels
            .get(villa_id)
            .map_or(0, |sender| sender.receiver_count())
    }

    /// Send a notification. No-op if nobody is listening.
    pub fn send(&self, villa_id: Ulid, event: &Event) {
        if let Some(sender) = self.channels.get(&villa_id) {
            let _ = sender.send(event.clone());
        }
    }

    /// Remove a channel (when the villa is deleted).
    pub fn remove(&self, villa_id: &Ulid) {
        self.channels.remove(villa_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribe_and_receive() {
        let hub = NotifyHub::new();
        let villa_id = Ulid::new();
        let mut rx = hub.subscribe(villa_id);

        let event = Event::VillaDeleted { id: villa_id };
        hub.send(villa_id, &event);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn send_without_subscribers_is_noop() {
        let hub = NotifyHub::new();
        // No subscriber — should not panic
        hub.send(Ulid::new(), &Event::VillaDeleted { id: Ulid::new() });
    }

    #[tokio::test]
    async fn subscriber_count_tracks_receivers() {
        let hub = NotifyHub::new();
        let villa_id = Ulid::new();
        assert_eq!(hub.subscriber_count(&villa_id), 0);

        let rx_a = hub.subscribe(villa_id);
        let rx_b = hub.subscribe(villa_id);
        assert_eq!(hub.subscriber_count(&villa_id), 2);

        drop(rx_a);
        drop(rx_b);
        assert_eq!(hub.subscriber_count(&villa_id), 0);
    }

    #[tokio::test]
    async fn slow_subscriber_lags_past_capacity() {
        let hub = NotifyHub::with_capacity(1);
        let villa_id = Ulid::new();
        let mut rx = hub.subscribe(villa_id);

        hub.send(villa_id, &Event::VillaDeleted { id: villa_id });
        hub.send(villa_id, &Event::VillaDeleted { id: villa_id });

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        // The newest event is still deliverable after the lag report.
        assert!(rx.recv().await.is_ok());
    }
}
