use crate::config::RecorderConfig;
use crate::domain::clock::ReceiptClock;
use crate::domain::outcome::{PaymentOutcome, ProviderSignal};
use crate::domain::ports::IdentityHandle;
use crate::error::{RecorderError, Result};
use std::sync::Arc;

/// Turns provider signals into normalized outcomes for the current session.
#[derive(Clone)]
pub struct OutcomeReceiver {
    identity: IdentityHandle,
    clock: Arc<ReceiptClock>,
    config: Arc<RecorderConfig>,
}

impl OutcomeReceiver {
    pub fn new(identity: IdentityHandle, config: Arc<RecorderConfig>) -> Self {
        Self {
            identity,
            clock: Arc::new(ReceiptClock::new()),
            config,
        }
    }

    /// Resolves the acting user and normalizes `signal`.
    ///
    /// Errors here mean the outcome cannot be recorded at all.
    pub async fn receive(&self, signal: ProviderSignal) -> Result<PaymentOutcome> {
        let timestamp = self.clock.now();
        let user_id = self
            .identity
            .current_user_id()
            .await
            .map_err(|e| RecorderError::Normalization(format!("identity lookup failed: {e}")))?;
        PaymentOutcome::normalize(signal, user_id, timestamp, &self.config)
    }
}
