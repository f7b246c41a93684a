use farmgate_shared::models::events::StorefrontEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// In-process event bus for storefront lifecycle events.
///
/// Lossy by design: publishing never blocks and never fails the request path.
/// If nobody is listening (or a subscriber lags past the channel capacity)
/// the event is dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StorefrontEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: StorefrontEvent) {
        match self.tx.send(event) {
            Ok(receivers) => debug!(receivers, "published storefront event"),
            Err(_) => debug!("no subscribers for storefront event, dropped"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorefrontEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmgate_shared::models::events::ProductCreatedEvent;
    use uuid::Uuid;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(StorefrontEvent::ProductCreated(ProductCreatedEvent {
            product_id: Uuid::new_v4(),
            sku: "SKU-1".into(),
            timestamp: 0,
        }));

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, StorefrontEvent::ProductCreated(_)));
    }

    #[test]
    fn publish_without_subscribers_is_a_noop() {
        let bus = EventBus::new(8);
        bus.publish(StorefrontEvent::ProductDeleted(
            farmgate_shared::models::events::ProductDeletedEvent {
                product_id: Uuid::new_v4(),
                timestamp: 0,
            },
        ));
    }
}
