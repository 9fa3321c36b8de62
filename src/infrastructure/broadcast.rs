use crate::domain::event::PaymentEvent;
use crate::domain::ports::Notifier;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::debug;

/// In-process fan-out of payment events.
///
/// Any number of subscribers may listen. Delivery is fire-and-forget:
/// subscribers only see events published after they subscribed, and a
/// subscriber that falls more than `capacity` events behind loses the oldest.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<PaymentEvent>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PaymentEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl Notifier for BroadcastNotifier {
    async fn publish(&self, event_name: &str, payload: Map<String, Value>) -> Result<()> {
        // `send` only fails when nobody is listening, which is fine here.
        match self.tx.send(PaymentEvent::new(event_name, payload)) {
            Ok(receivers) => debug!(event = event_name, receivers, "Broadcast payment event"),
            Err(_) => debug!(event = event_name, "No subscribers for payment event"),
        }
        Ok(())
    }
}
