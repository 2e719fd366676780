use anyhow::Result;
use async_trait::async_trait;
use mal::{AnimeListEntry, MalClient};

/// Subscription-list provider seam.
#[async_trait]
pub trait SubscriptionSource: Send + Sync {
    /// Fetch the entries the user is currently watching.
    async fn fetch_watching(&self) -> Result<Vec<AnimeListEntry>>;
}

/// A [`MalClient`] bound to a target user.
pub struct MalSource {
    client: MalClient,
    user: String,
}

impl MalSource {
    pub fn new(client: MalClient, user: impl Into<String>) -> Self {
        Self {
            client,
            user: user.into(),
        }
    }
}

#[async_trait]
impl SubscriptionSource for MalSource {
    async fn fetch_watching(&self) -> Result<Vec<AnimeListEntry>> {
        Ok(self.client.fetch_watching(&self.user).await?)
    }
}
