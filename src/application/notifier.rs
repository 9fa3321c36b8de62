use crate::domain::event::PaymentEvent;
use crate::domain::outcome::PaymentOutcome;
use crate::domain::ports::NotifierHandle;
use crate::error::{RecorderError, Result};

/// Publishes recorded outcomes as `PAYMENT_SUCCESS` / `PAYMENT_FAILED` events.
#[derive(Clone)]
pub struct EventNotifier {
    notifier: NotifierHandle,
}

impl EventNotifier {
    pub fn new(notifier: NotifierHandle) -> Self {
        Self { notifier }
    }

    pub async fn notify(&self, outcome: &PaymentOutcome) -> Result<PaymentEvent> {
        let event = PaymentEvent::from_outcome(outcome);
        self.notifier
            .publish(&event.name, event.payload.clone())
            .await
            .map_err(RecorderError::into_notification)?;
        Ok(event)
    }
}
