//! Per-animal topic registry and real-time fan-out.
//!
//! [`RealtimeNotifier`] owns a concurrency-safe map from animal topic to
//! subscriber handles with an explicit lifecycle: connections register a
//! sender on subscribe and deregister on unsubscribe or disconnect.
//! Delivery is at-most-once and non-blocking; there is no retry, no
//! acknowledgement, and no replay of events missed while disconnected.
//!
//! The process-lifetime event counters exist purely for observability.
//! They reset on restart and have no correctness role.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;

use super::event::AnimalEvent;
use super::ids::AnimalId;

/// Identifier for one subscriber handle (normally one WebSocket
/// connection, which may subscribe to several animal topics).
pub type SubscriberId = uuid::Uuid;

/// Publishes [`AnimalEvent`]s to all subscribers of the event's animal
/// topic.
#[derive(Debug, Default)]
pub struct RealtimeNotifier {
    topics: RwLock<HashMap<AnimalId, HashMap<SubscriberId, UnboundedSender<AnimalEvent>>>>,
    location_events: AtomicU64,
    heart_rate_events: AtomicU64,
}

impl RealtimeNotifier {
    /// Creates a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the topic name for an animal, as exposed to clients.
    #[must_use]
    pub fn topic(animal_id: AnimalId) -> String {
        format!("topic/animal/{animal_id}")
    }

    /// Registers `sender` as a subscriber of the animal's topic.
    ///
    /// Re-registering the same `subscriber_id` on the same topic
    /// replaces the previous handle.
    pub async fn register(
        &self,
        animal_id: AnimalId,
        subscriber_id: SubscriberId,
        sender: UnboundedSender<AnimalEvent>,
    ) {
        let mut topics = self.topics.write().await;
        topics.entry(animal_id).or_default().insert(subscriber_id, sender);
        tracing::debug!(topic = %Self::topic(animal_id), %subscriber_id, "subscriber registered");
    }

    /// Removes the subscriber from the animal's topic. Returns `true`
    /// if it was registered.
    pub async fn deregister(&self, animal_id: AnimalId, subscriber_id: SubscriberId) -> bool {
        let mut topics = self.topics.write().await;
        let Some(subscribers) = topics.get_mut(&animal_id) else {
            return false;
        };
        let removed = subscribers.remove(&subscriber_id).is_some();
        if subscribers.is_empty() {
            topics.remove(&animal_id);
        }
        removed
    }

    /// Removes the subscriber from every topic. Called when a
    /// connection closes.
    pub async fn deregister_all(&self, subscriber_id: SubscriberId) {
        let mut topics = self.topics.write().await;
        topics.retain(|_, subscribers| {
            subscribers.remove(&subscriber_id);
            !subscribers.is_empty()
        });
    }

    /// Delivers `event` to every current subscriber of its animal topic.
    ///
    /// Never blocks and never fails from the caller's perspective:
    /// subscribers whose channel is closed are pruned and the failure is
    /// only logged. Returns the number of subscribers reached.
    pub async fn publish(&self, event: &AnimalEvent) -> usize {
        match event {
            AnimalEvent::LocationUpdate { .. } => {
                self.location_events.fetch_add(1, Ordering::Relaxed);
            }
            AnimalEvent::HeartRateUpdate { .. } => {
                self.heart_rate_events.fetch_add(1, Ordering::Relaxed);
            }
        }

        let animal_id = event.animal_id();
        let mut delivered = 0usize;
        let mut closed: Vec<SubscriberId> = Vec::new();

        {
            let topics = self.topics.read().await;
            let Some(subscribers) = topics.get(&animal_id) else {
                return 0;
            };
            for (subscriber_id, sender) in subscribers {
                if sender.send(event.clone()).is_ok() {
                    delivered += 1;
                } else {
                    closed.push(*subscriber_id);
                }
            }
        }

        if !closed.is_empty() {
            tracing::warn!(
                topic = %Self::topic(animal_id),
                dropped = closed.len(),
                "pruning subscribers with closed channels"
            );
            let mut topics = self.topics.write().await;
            if let Some(subscribers) = topics.get_mut(&animal_id) {
                for subscriber_id in &closed {
                    subscribers.remove(subscriber_id);
                }
                if subscribers.is_empty() {
                    topics.remove(&animal_id);
                }
            }
        }

        tracing::debug!(
            topic = %Self::topic(animal_id),
            message_type = event.message_type(),
            delivered,
            "event published"
        );
        delivered
    }

    /// Number of subscribers currently registered on the animal's topic.
    pub async fn subscriber_count(&self, animal_id: AnimalId) -> usize {
        self.topics
            .read()
            .await
            .get(&animal_id)
            .map_or(0, HashMap::len)
    }

    /// Total location events published since process start.
    #[must_use]
    pub fn location_event_count(&self) -> u64 {
        self.location_events.load(Ordering::Relaxed)
    }

    /// Total heart-rate events published since process start.
    #[must_use]
    pub fn heart_rate_event_count(&self) -> u64 {
        self.heart_rate_events.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::ids::CollarId;

    fn location_event(animal_id: AnimalId) -> AnimalEvent {
        AnimalEvent::LocationUpdate {
            animal_id,
            collar_id: CollarId::new(),
            latitude: 0.0,
            longitude: 0.0,
            timestamp: Utc::now(),
            outside_safe_zone: false,
            perimeter_distance: None,
        }
    }

    fn heart_rate_event(animal_id: AnimalId) -> AnimalEvent {
        AnimalEvent::HeartRateUpdate {
            animal_id,
            collar_id: CollarId::new(),
            average_bpm: 80,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_reaches_nobody() {
        let notifier = RealtimeNotifier::new();
        let delivered = notifier.publish(&location_event(AnimalId::new())).await;
        assert_eq!(delivered, 0);
        // Counter still advances: it tracks publishes, not deliveries.
        assert_eq!(notifier.location_event_count(), 1);
    }

    #[tokio::test]
    async fn subscriber_receives_events_for_its_topic_only() {
        let notifier = RealtimeNotifier::new();
        let animal_a = AnimalId::new();
        let animal_b = AnimalId::new();

        let (tx, mut rx) = mpsc::unbounded_channel();
        notifier.register(animal_a, SubscriberId::new_v4(), tx).await;

        assert_eq!(notifier.publish(&location_event(animal_a)).await, 1);
        assert_eq!(notifier.publish(&location_event(animal_b)).await, 0);

        let Some(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.animal_id(), animal_a);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn both_event_kinds_share_the_topic() {
        let notifier = RealtimeNotifier::new();
        let animal = AnimalId::new();

        let (tx, mut rx) = mpsc::unbounded_channel();
        notifier.register(animal, SubscriberId::new_v4(), tx).await;

        let _ = notifier.publish(&location_event(animal)).await;
        let _ = notifier.publish(&heart_rate_event(animal)).await;

        let Some(first) = rx.recv().await else {
            panic!("expected first event");
        };
        let Some(second) = rx.recv().await else {
            panic!("expected second event");
        };
        assert_eq!(first.message_type(), "location_update");
        assert_eq!(second.message_type(), "heartrate_update");
        assert_eq!(notifier.location_event_count(), 1);
        assert_eq!(notifier.heart_rate_event_count(), 1);
    }

    #[tokio::test]
    async fn deregister_stops_delivery() {
        let notifier = RealtimeNotifier::new();
        let animal = AnimalId::new();
        let subscriber = SubscriberId::new_v4();

        let (tx, _rx) = mpsc::unbounded_channel();
        notifier.register(animal, subscriber, tx).await;
        assert_eq!(notifier.subscriber_count(animal).await, 1);

        assert!(notifier.deregister(animal, subscriber).await);
        assert!(!notifier.deregister(animal, subscriber).await);
        assert_eq!(notifier.publish(&location_event(animal)).await, 0);
    }

    #[tokio::test]
    async fn deregister_all_clears_every_topic() {
        let notifier = RealtimeNotifier::new();
        let subscriber = SubscriberId::new_v4();
        let animal_a = AnimalId::new();
        let animal_b = AnimalId::new();

        let (tx, _rx) = mpsc::unbounded_channel();
        notifier.register(animal_a, subscriber, tx.clone()).await;
        notifier.register(animal_b, subscriber, tx).await;

        notifier.deregister_all(subscriber).await;
        assert_eq!(notifier.subscriber_count(animal_a).await, 0);
        assert_eq!(notifier.subscriber_count(animal_b).await, 0);
    }

    #[tokio::test]
    async fn closed_channels_are_pruned_on_publish() {
        let notifier = RealtimeNotifier::new();
        let animal = AnimalId::new();

        let (tx, rx) = mpsc::unbounded_channel();
        notifier.register(animal, SubscriberId::new_v4(), tx).await;
        drop(rx);

        assert_eq!(notifier.publish(&location_event(animal)).await, 0);
        assert_eq!(notifier.subscriber_count(animal).await, 0);
    }
}
