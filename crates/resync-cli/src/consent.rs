//! Terminal confirmation before renaming

use async_trait::async_trait;
use colored::Colorize;
use dialoguer::Confirm;
use resync_core::{ConsentGate, SyncError};

/// Asks on the terminal. Escape or `q` aborts the run.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptConsent;

#[async_trait]
impl ConsentGate for PromptConsent {
    async fn request_consent(&self, message: &str) -> resync_core::Result<bool> {
        let message = message.to_string();
        // The prompt blocks on stdin; keep it off the async worker.
        let answer = tokio::task::spawn_blocking(move || {
            eprintln!("{} {}", "!".yellow().bold(), message);
            Confirm::new()
                .with_prompt("Rename now?")
                .default(false)
                .interact_opt()
        })
        .await
        .map_err(|e| SyncError::unknown(format!("consent prompt failed: {e}")))?
        .map_err(|e| SyncError::unknown(format!("consent prompt failed: {e}")))?;

        answer.ok_or(SyncError::Cancelled)
    }
}
