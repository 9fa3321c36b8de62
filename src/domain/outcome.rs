use crate::config::RecorderConfig;
use crate::domain::path::validate_segment;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Success,
    Failed,
}

/// Raw terminal result as handed over by the payment SDK callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSignal {
    Success { token: Option<String> },
    Failure { code: i32, detail: Option<String> },
}

/// What a payment attempt ended with.
///
/// Keeping the success and failure payloads in one sum type means an outcome
/// can never carry both a transaction id and an error code, or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentResult {
    Success { transaction_id: String },
    Failed { code: i32, detail: String },
}

/// A provider result after normalization, tagged with who and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// Signed-in user, or the anonymous sentinel.
    pub user_id: String,
    pub result: PaymentResult,
    /// Receipt time, strictly increasing per receiver.
    pub timestamp: DateTime<Utc>,
}

impl PaymentOutcome {
    /// Turns a provider signal into an outcome.
    ///
    /// A missing token becomes the configured unknown-transaction id and a
    /// missing detail becomes an empty string. `user_id` of `None` means no
    /// session. Fails with a normalization error when the user id or token
    /// cannot be used as a storage key.
    pub fn normalize(
        signal: ProviderSignal,
        user_id: Option<String>,
        timestamp: DateTime<Utc>,
        config: &RecorderConfig,
    ) -> Result<Self> {
        let user_id = user_id.unwrap_or_else(|| config.anonymous_user.clone());
        validate_segment(&user_id)?;

        let result = match signal {
            ProviderSignal::Success { token } => {
                let transaction_id = token
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| config.unknown_transaction.clone());
                validate_segment(&transaction_id)?;
                PaymentResult::Success { transaction_id }
            }
            ProviderSignal::Failure { code, detail } => PaymentResult::Failed {
                code,
                detail: detail.unwrap_or_default(),
            },
        };

        Ok(Self {
            user_id,
            result,
            timestamp,
        })
    }

    pub fn status(&self) -> PaymentStatus {
        match self.result {
            PaymentResult::Success { .. } => PaymentStatus::Success,
            PaymentResult::Failed { .. } => PaymentStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == PaymentStatus::Success
    }

    pub fn transaction_id(&self) -> Option<&str> {
        match &self.result {
            PaymentResult::Success { transaction_id } => Some(transaction_id),
            PaymentResult::Failed { .. } => None,
        }
    }

    pub fn error_code(&self) -> Option<i32> {
        match self.result {
            PaymentResult::Failed { code, .. } => Some(code),
            PaymentResult::Success { .. } => None,
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        match &self.result {
            PaymentResult::Failed { detail, .. } => Some(detail),
            PaymentResult::Success { .. } => None,
        }
    }
}
