use crate::domain::ports::IdentityProvider;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Session holder for the current signed-in user.
///
/// Clones share the same session, so the sign-in side of the app and the
/// recorder can each hold one.
#[derive(Default, Clone)]
pub struct SessionIdentity {
    user_id: Arc<RwLock<Option<String>>>,
}

impl SessionIdentity {
    /// Creates a session with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Arc::new(RwLock::new(Some(user_id.into()))),
        }
    }

    pub async fn sign_in(&self, user_id: impl Into<String>) {
        *self.user_id.write().await = Some(user_id.into());
    }

    pub async fn sign_out(&self) {
        *self.user_id.write().await = None;
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn current_user_id(&self) -> Result<Option<String>> {
        Ok(self.user_id.read().await.clone())
    }
}
