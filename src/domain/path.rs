use crate::error::{RecorderError, Result};
use std::fmt;

/// Characters the hosted key-value store refuses inside a single key segment.
const FORBIDDEN: &[char] = &['/', '.', '#', '$', '[', ']'];

/// Hierarchical location in the storage collaborator, e.g. `transactions/u1/pay_123`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoragePath(String);

impl StoragePath {
    /// A single-segment path such as `transactions`.
    pub fn root(root: &str) -> Result<Self> {
        validate_segment(root)?;
        Ok(Self(root.to_string()))
    }

    /// Appends one segment, rejecting empty or reserved keys.
    pub fn child(&self, segment: &str) -> Result<Self> {
        validate_segment(segment)?;
        Ok(Self(format!("{}/{}", self.0, segment)))
    }

    /// `{root}/{user_id}/{key}`
    pub fn ledger_entry(root: &str, user_id: &str, key: &str) -> Result<Self> {
        Self::root(root)?.child(user_id)?.child(key)
    }

    /// `{root}/{user_id}/items`
    pub fn cart_items(root: &str, user_id: &str) -> Result<Self> {
        Self::root(root)?.child(user_id)?.child("items")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// True for the path itself and anything nested beneath it.
    pub fn contains(&self, key: &str) -> bool {
        key == self.0
            || key
                .strip_prefix(self.0.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks that `segment` can be used as one level of a storage path.
pub fn validate_segment(segment: &str) -> Result<()> {
    if segment.trim().is_empty() {
        return Err(RecorderError::Normalization(
            "empty storage path segment".to_string(),
        ));
    }
    if let Some(c) = segment.chars().find(|c| FORBIDDEN.contains(c) || c.is_control()) {
        return Err(RecorderError::Normalization(format!(
            "invalid character {c:?} in storage path segment {segment:?}"
        )));
    }
    Ok(())
}
