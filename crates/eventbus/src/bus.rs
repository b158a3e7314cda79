//! A broadcast event bus with a configurable backpressure policy.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::warn;

/// What happens to a subscriber's queue when it falls behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackpressurePolicy {
    /// Drop the event for that subscriber and keep going. The default: a
    /// slow listener (e.g. a websocket client) never slows down the
    /// interpreter.
    #[default]
    DropOldest,
    /// Block the publisher until the subscriber has room. Appropriate for a
    /// subscriber the caller cannot afford to miss events for (the
    /// execution repository's own timeline writer, say).
    Block,
}

/// Fan-out event distribution: every `subscribe()` gets its own queue, every
/// `publish()` is broadcast to all of them.
///
/// Closed subscriber channels are pruned lazily on the next publish.
pub struct EventBus<E> {
    capacity: usize,
    policy: BackpressurePolicy,
    subscribers: Mutex<Vec<mpsc::Sender<E>>>,
}

impl<E: Clone> EventBus<E> {
    /// Create a bus where each subscriber's queue holds up to `capacity`
    /// pending events before the backpressure policy kicks in.
    #[must_use]
    pub fn new(capacity: usize, policy: BackpressurePolicy) -> Self {
        Self {
            capacity,
            policy,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a new subscriber, returning its receiver.
    pub fn subscribe(&self) -> mpsc::Receiver<E> {
        let (tx, rx) = mpsc::channel(self.capacity.max(1));
        self.subscribers.lock().push(tx);
        rx
    }

    /// Number of currently live subscribers (closed ones are not pruned
    /// until the next `publish`).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Broadcast `event` to every subscriber per the configured policy.
    pub async fn publish(&self, event: E) {
        let senders: Vec<mpsc::Sender<E>> = self.subscribers.lock().clone();
        let mut dead = Vec::new();

        for (idx, tx) in senders.iter().enumerate() {
            let outcome = match self.policy {
                BackpressurePolicy::DropOldest => match tx.try_send(event.clone()) {
                    Ok(()) => Ok(()),
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!("eventbus: subscriber lagging, dropping event");
                        Ok(())
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => Err(()),
                },
                BackpressurePolicy::Block => tx.send(event.clone()).await.map_err(|_| ()),
            };
            if outcome.is_err() {
                dead.push(idx);
            }
        }

        if !dead.is_empty() {
            let mut subscribers = self.subscribers.lock();
            for &idx in dead.iter().rev() {
                if idx < subscribers.len() {
                    subscribers.remove(idx);
                }
            }
        }
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("subscriber_count", &self.subscribers.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_all_subscribers() {
        let bus: EventBus<i32> = EventBus::new(8, BackpressurePolicy::DropOldest);
        let mut r1 = bus.subscribe();
        let mut r2 = bus.subscribe();

        bus.publish(42).await;

        assert_eq!(r1.recv().await, Some(42));
        assert_eq!(r2.recv().await, Some(42));
    }

    #[tokio::test]
    async fn drop_oldest_does_not_block_on_full_queue() {
        let bus: EventBus<i32> = EventBus::new(1, BackpressurePolicy::DropOldest);
        let mut rx = bus.subscribe();

        bus.publish(1).await;
        bus.publish(2).await; // queue full, policy drops this silently

        assert_eq!(rx.recv().await, Some(1));
    }

    #[tokio::test]
    async fn closed_subscriber_is_pruned() {
        let bus: EventBus<i32> = EventBus::new(4, BackpressurePolicy::DropOldest);
        let rx = bus.subscribe();
        drop(rx);

        assert_eq!(bus.subscriber_count(), 1);
        bus.publish(1).await;
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn block_policy_delivers_every_event_once_drained() {
        let bus: EventBus<i32> = EventBus::new(1, BackpressurePolicy::Block);
        let mut rx = bus.subscribe();

        let publisher = tokio::spawn(async move {
            bus.publish(1).await;
            bus.publish(2).await;
            bus
        });

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
        publisher.await.unwrap();
    }

    #[test]
    fn default_policy_is_drop_oldest() {
        assert_eq!(BackpressurePolicy::default(), BackpressurePolicy::DropOldest);
    }
}
