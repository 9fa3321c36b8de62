use crate::domain::outcome::ProviderSignal;
use crate::error::{RecorderError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CallbackKind {
    Success,
    Failure,
}

/// One recorded provider callback, as it appears in a replay file.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct CallbackRow {
    pub event: CallbackKind,
    /// Signed-in user at the time of the callback; empty means no session.
    pub user: Option<String>,
    pub token: Option<String>,
    pub code: Option<i32>,
    pub detail: Option<String>,
}

/// A callback ready to be replayed against a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayedCallback {
    pub user: Option<String>,
    pub signal: ProviderSignal,
}

impl TryFrom<CallbackRow> for ReplayedCallback {
    type Error = RecorderError;

    fn try_from(row: CallbackRow) -> Result<Self> {
        let signal = match row.event {
            CallbackKind::Success => ProviderSignal::Success { token: row.token },
            CallbackKind::Failure => ProviderSignal::Failure {
                code: row.code.ok_or_else(|| {
                    RecorderError::Normalization("failure callback without a code".to_string())
                })?,
                detail: row.detail,
            },
        };
        Ok(Self {
            user: row.user,
            signal,
        })
    }
}

/// Reads provider callbacks from a CSV source.
///
/// Expected header: `event, user, token, code, detail`. Whitespace is trimmed
/// and empty fields are read as missing values.
pub struct CallbackReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CallbackReader<R> {
    /// Creates a new `CallbackReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads callbacks, one `Result` per row.
    pub fn callbacks(self) -> impl Iterator<Item = Result<ReplayedCallback>> {
        self.reader.into_deserialize().map(|row| {
            let row: CallbackRow = row?;
            ReplayedCallback::try_from(row)
        })
    }
}
