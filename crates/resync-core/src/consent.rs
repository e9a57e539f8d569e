//! User consent before destructive renames

use async_trait::async_trait;

use crate::Result;

/// One-shot confirmation requested before a rename batch is applied.
///
/// Implementations may suspend while a person answers. Returning
/// `Ok(false)` or `Err(SyncError::Cancelled)` aborts the run before
/// anything is renamed.
///
/// [`SyncError::Cancelled`]: crate::SyncError::Cancelled
#[async_trait]
pub trait ConsentGate: Send + Sync {
    async fn request_consent(&self, message: &str) -> Result<bool>;
}

/// A gate with a fixed answer, for unattended runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticConsent(pub bool);

impl StaticConsent {
    pub fn granted() -> Self {
        Self(true)
    }

    pub fn denied() -> Self {
        Self(false)
    }
}

#[async_trait]
impl ConsentGate for StaticConsent {
    async fn request_consent(&self, message: &str) -> Result<bool> {
        tracing::debug!(granted = self.0, %message, "Answering consent request without prompting");
        Ok(self.0)
    }
}
