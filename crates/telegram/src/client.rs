use reqwest::Client;
use serde_json::json;

use crate::{Result, TelegramError};

const BASE_URL: &str = "https://api.telegram.org";

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramClient {
    /// Create a new Telegram client
    pub fn new(client: Client, bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    pub fn with_base_url(
        client: Client,
        base_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Send a plain text message
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);

        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": text
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(TelegramError::Api(error_text));
        }

        Ok(())
    }
}
