use anyhow::Result;
use async_trait::async_trait;
use telegram::TelegramClient;

/// Notification transport seam.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a rendered message. A delivery error is non-fatal to the run.
    async fn send_message(&self, text: &str) -> Result<()>;
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<()> {
        TelegramClient::send_message(self, text).await?;
        Ok(())
    }
}
