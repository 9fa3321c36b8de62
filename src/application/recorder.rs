use super::cart::CartClearer;
use super::ledger::LedgerWriter;
use super::notifier::EventNotifier;
use super::receiver::OutcomeReceiver;
use crate::config::RecorderConfig;
use crate::domain::outcome::{PaymentOutcome, ProviderSignal};
use crate::domain::path::StoragePath;
use crate::domain::ports::{IdentityHandle, NotifierHandle, StorageHandle};
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Pipeline stages, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    LedgerWritten,
    CartCleared,
    Notified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Completed,
    Skipped,
    Failed(String),
}

impl StepResult {
    fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => StepResult::Completed,
            Err(e) => StepResult::Failed(e.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepResult::Failed(_))
    }
}

/// What happened to one recorded outcome.
#[derive(Debug, Clone)]
pub struct RecordingReport {
    pub outcome: PaymentOutcome,
    pub ledger_path: Option<StoragePath>,
    pub ledger: StepResult,
    pub cart: StepResult,
    pub notification: StepResult,
    /// Stages entered, in order.
    pub stages: Vec<Stage>,
}

impl RecordingReport {
    /// Terminal stage; always `Notified` once an outcome has been received.
    pub fn stage(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Received)
    }

    /// True when no step failed.
    pub fn is_clean(&self) -> bool {
        !(self.ledger.is_failed() || self.cart.is_failed() || self.notification.is_failed())
    }
}

/// Records payment outcomes reported by the payment SDK.
///
/// Each callback runs receive, ledger write, cart clear (successes only) and
/// notify in sequence. A failing step is logged and the next step still runs;
/// nothing is reported back to the caller as an error. Cloning is cheap and
/// clones may record concurrently.
#[derive(Clone)]
pub struct PaymentRecorder {
    receiver: OutcomeReceiver,
    ledger: LedgerWriter,
    cart: CartClearer,
    notifier: EventNotifier,
}

impl PaymentRecorder {
    /// Creates a new `PaymentRecorder`.
    ///
    /// # Arguments
    ///
    /// * `storage` - Holds both the ledger and the carts.
    /// * `identity` - Resolves the signed-in user.
    /// * `notifier` - Receives `PAYMENT_SUCCESS` / `PAYMENT_FAILED` events.
    /// * `config` - Path roots and sentinels.
    pub fn new(
        storage: StorageHandle,
        identity: IdentityHandle,
        notifier: NotifierHandle,
        config: RecorderConfig,
    ) -> Self {
        let ledger = LedgerWriter::new(storage.clone(), config.ledger_root.clone());
        let cart = CartClearer::new(storage, config.cart_root.clone());
        Self {
            receiver: OutcomeReceiver::new(identity, Arc::new(config)),
            ledger,
            cart,
            notifier: EventNotifier::new(notifier),
        }
    }

    /// Success callback. `token` is the provider's payment id, if it sent one.
    pub async fn on_payment_success(&self, token: Option<&str>) -> Option<RecordingReport> {
        self.record(ProviderSignal::Success {
            token: token.map(str::to_string),
        })
        .await
    }

    /// Failure callback with the provider's error code and optional description.
    pub async fn on_payment_failure(
        &self,
        code: i32,
        detail: Option<&str>,
    ) -> Option<RecordingReport> {
        self.record(ProviderSignal::Failure {
            code,
            detail: detail.map(str::to_string),
        })
        .await
    }

    /// Runs the full pipeline for `signal`.
    ///
    /// Returns `None` when the signal could not be normalized; in that case
    /// nothing was written or published.
    pub async fn record(&self, signal: ProviderSignal) -> Option<RecordingReport> {
        let outcome = match self.receiver.receive(signal).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Dropping payment outcome");
                return None;
            }
        };
        info!(
            user = %outcome.user_id,
            status = ?outcome.status(),
            "Payment outcome received"
        );
        Some(self.run(outcome).await)
    }

    async fn run(&self, outcome: PaymentOutcome) -> RecordingReport {
        let mut stages = vec![Stage::Received];

        let (ledger_path, ledger) = match self.ledger.path_for(&outcome) {
            Ok(path) => {
                let written = self.ledger.write(&path, &outcome).await;
                if let Err(e) = &written {
                    warn!(path = %path, error = %e, "Ledger write failed");
                } else {
                    debug!(path = %path, "Ledger record written");
                }
                (Some(path), StepResult::from_result(&written))
            }
            Err(e) => {
                warn!(error = %e, "Could not derive ledger path");
                (None, StepResult::Failed(e.to_string()))
            }
        };
        stages.push(Stage::LedgerWritten);

        let cart = if outcome.is_success() {
            let cleared = self.cart.clear(&outcome.user_id).await;
            match &cleared {
                Ok(path) => debug!(path = %path, "Cart cleared"),
                Err(e) => warn!(user = %outcome.user_id, error = %e, "Cart clear failed"),
            }
            stages.push(Stage::CartCleared);
            StepResult::from_result(&cleared)
        } else {
            StepResult::Skipped
        };

        let notified = self.notifier.notify(&outcome).await;
        if let Err(e) = &notified {
            warn!(error = %e, "Payment notification failed");
        }
        stages.push(Stage::Notified);

        RecordingReport {
            ledger_path,
            ledger,
            cart,
            notification: StepResult::from_result(&notified),
            stages,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::PAYMENT_SUCCESS;
    use crate::domain::ports::Storage;
    use crate::error::RecorderError;
    use crate::infrastructure::broadcast::BroadcastNotifier;
    use crate::infrastructure::identity::SessionIdentity;
    use crate::infrastructure::in_memory::InMemoryStore;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct UnavailableStorage;

    #[async_trait]
    impl Storage for UnavailableStorage {
        async fn write(&self, _path: &StoragePath, _value: Value) -> Result<()> {
            Err(RecorderError::IoError(std::io::Error::other("offline")))
        }

        async fn clear(&self, _path: &StoragePath) -> Result<()> {
            Err(RecorderError::IoError(std::io::Error::other("offline")))
        }

        async fn read(&self, _path: &StoragePath) -> Result<Option<Value>> {
            Ok(None)
        }

        async fn scan(&self, _prefix: &StoragePath) -> Result<Vec<(String, Value)>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_success_walks_every_stage() {
        let store = InMemoryStore::new();
        let notifier = BroadcastNotifier::new(8);
        let mut events = notifier.subscribe();
        let recorder = PaymentRecorder::new(
            Arc::new(store.clone()),
            Arc::new(SessionIdentity::signed_in("u1")),
            Arc::new(notifier),
            RecorderConfig::default(),
        );

        let report = recorder.on_payment_success(Some("pay_1")).await.unwrap();

        assert_eq!(
            report.stages,
            vec![
                Stage::Received,
                Stage::LedgerWritten,
                Stage::CartCleared,
                Stage::Notified
            ]
        );
        assert_eq!(report.stage(), Stage::Notified);
        assert!(report.is_clean());
        assert_eq!(
            store.get("transactions/u1/pay_1").await.unwrap()["status"],
            json!("SUCCESS")
        );
        assert_eq!(events.recv().await.unwrap().name, PAYMENT_SUCCESS);
    }

    #[tokio::test]
    async fn test_failure_skips_cart() {
        let recorder = PaymentRecorder::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(SessionIdentity::new()),
            Arc::new(BroadcastNotifier::new(8)),
            RecorderConfig::default(),
        );

        let report = recorder.on_payment_failure(5, None).await.unwrap();

        assert_eq!(report.cart, StepResult::Skipped);
        assert!(!report.stages.contains(&Stage::CartCleared));
        assert_eq!(report.stage(), Stage::Notified);
    }

    #[tokio::test]
    async fn test_storage_errors_are_reported_not_raised() {
        let recorder = PaymentRecorder::new(
            Arc::new(UnavailableStorage),
            Arc::new(SessionIdentity::signed_in("u1")),
            Arc::new(BroadcastNotifier::new(8)),
            RecorderConfig::default(),
        );

        let report = recorder.on_payment_success(Some("pay_1")).await.unwrap();

        assert!(matches!(report.ledger, StepResult::Failed(ref m) if m.contains("offline")));
        assert!(report.cart.is_failed());
        assert_eq!(report.notification, StepResult::Completed);
        assert_eq!(report.stage(), Stage::Notified);
    }
}
