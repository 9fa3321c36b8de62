use super::outcome::{PaymentOutcome, PaymentResult};
use serde::Serialize;
use serde_json::{Map, Value};

pub const PAYMENT_SUCCESS: &str = "PAYMENT_SUCCESS";
pub const PAYMENT_FAILED: &str = "PAYMENT_FAILED";

/// Notification handed to local observers after an outcome is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentEvent {
    pub name: String,
    pub payload: Map<String, Value>,
}

impl PaymentEvent {
    pub fn new(name: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    pub fn from_outcome(outcome: &PaymentOutcome) -> Self {
        let mut payload = Map::new();
        let name = match &outcome.result {
            PaymentResult::Success { transaction_id } => {
                payload.insert("transactionId".to_string(), transaction_id.clone().into());
                PAYMENT_SUCCESS
            }
            PaymentResult::Failed { code, detail } => {
                payload.insert("code".to_string(), (*code).into());
                payload.insert("response".to_string(), detail.clone().into());
                PAYMENT_FAILED
            }
        };
        Self::new(name, payload)
    }
}
