use super::outcome::{PaymentOutcome, PaymentResult, PaymentStatus};
use serde::{Deserialize, Serialize};
use uuid::{NoContext, Timestamp, Uuid};

/// Ledger entry for one payment attempt. Written once, never updated.
///
/// Successes carry `transactionId`; failures carry `code` and `response`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Receipt time in epoch milliseconds.
    pub timestamp: i64,
}

impl From<&PaymentOutcome> for TransactionRecord {
    fn from(outcome: &PaymentOutcome) -> Self {
        let timestamp = outcome.timestamp.timestamp_millis();
        match &outcome.result {
            PaymentResult::Success { transaction_id } => Self {
                transaction_id: Some(transaction_id.clone()),
                status: PaymentStatus::Success,
                code: None,
                response: None,
                timestamp,
            },
            PaymentResult::Failed { code, detail } => Self {
                transaction_id: None,
                status: PaymentStatus::Failed,
                code: Some(*code),
                response: Some(detail.clone()),
                timestamp,
            },
        }
    }
}

/// Last segment of a ledger path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerKey {
    /// Provider transaction id; repeated callbacks land on the same slot.
    Transaction(String),
    /// Time-ordered key; every failed attempt gets its own slot and keys
    /// sort in receipt order.
    Generated(String),
}

impl LedgerKey {
    pub fn for_outcome(outcome: &PaymentOutcome) -> Self {
        match &outcome.result {
            PaymentResult::Success { transaction_id } => {
                LedgerKey::Transaction(transaction_id.clone())
            }
            PaymentResult::Failed { .. } => {
                let millis = u64::try_from(outcome.timestamp.timestamp_millis()).unwrap_or(0);
                let ts = Timestamp::from_unix(
                    NoContext,
                    millis / 1_000,
                    (millis % 1_000) as u32 * 1_000_000,
                );
                LedgerKey::Generated(Uuid::new_v7(ts).to_string())
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LedgerKey::Transaction(key) | LedgerKey::Generated(key) => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn outcome(result: PaymentResult) -> PaymentOutcome {
        PaymentOutcome {
            user_id: "u1".to_string(),
            result,
            timestamp: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        }
    }

    #[test]
    fn test_success_record_shape() {
        let record = TransactionRecord::from(&outcome(PaymentResult::Success {
            transaction_id: "pay_123".to_string(),
        }));

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "transactionId": "pay_123",
                "status": "SUCCESS",
                "timestamp": 1_700_000_000_123_i64,
            })
        );
    }

    #[test]
    fn test_failure_record_shape() {
        let record = TransactionRecord::from(&outcome(PaymentResult::Failed {
            code: 2,
            detail: "declined".to_string(),
        }));

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "status": "FAILED",
                "code": 2,
                "response": "declined",
                "timestamp": 1_700_000_000_123_i64,
            })
        );
    }

    #[test]
    fn test_failure_keys_are_unique() {
        let failed = outcome(PaymentResult::Failed {
            code: 2,
            detail: String::new(),
        });
        let first = LedgerKey::for_outcome(&failed);
        let second = LedgerKey::for_outcome(&failed);

        assert!(matches!(first, LedgerKey::Generated(_)));
        assert_ne!(first, second);
    }

    #[test]
    fn test_failure_keys_sort_by_receipt_time() {
        let keys: Vec<_> = [5_u64, 999, 1_000, 60_000, 86_400_000]
            .iter()
            .map(|offset| {
                let mut failed = outcome(PaymentResult::Failed {
                    code: 2,
                    detail: String::new(),
                });
                failed.timestamp += chrono::Duration::milliseconds(*offset as i64);
                LedgerKey::for_outcome(&failed).as_str().to_string()
            })
            .collect();

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_success_key_is_transaction_id() {
        let success = outcome(PaymentResult::Success {
            transaction_id: "pay_9".to_string(),
        });
        assert_eq!(
            LedgerKey::for_outcome(&success),
            LedgerKey::Transaction("pay_9".to_string())
        );
    }
}
