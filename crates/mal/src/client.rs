use scraper::{Html, Selector};

use crate::models::{AnimeListEntry, WatchStatus};
use crate::{MalError, Result};

const BASE_URL: &str = "https://myanimelist.net";

pub struct MalClient {
    client: reqwest::Client,
    base_url: String,
}

impl MalClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch a user's full public anime list.
    pub async fn fetch_animelist(&self, user: &str) -> Result<Vec<AnimeListEntry>> {
        let url = format!("{}/animelist/{}", self.base_url, urlencoding::encode(user));
        tracing::debug!("Fetching animelist from: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(MalError::Parse(format!(
                "HTTP {} when fetching {}",
                status, url
            )));
        }

        let html = response.text().await?;
        extract_data_items(&html)
    }

    /// Fetch only the entries the user is currently watching.
    pub async fn fetch_watching(&self, user: &str) -> Result<Vec<AnimeListEntry>> {
        let entries = self.fetch_animelist(user).await?;
        let watching: Vec<AnimeListEntry> = entries
            .into_iter()
            .filter(|e| e.status == WatchStatus::Watching)
            .collect();

        tracing::debug!("Animelist has {} watching entries", watching.len());
        Ok(watching)
    }
}

/// Pull the JSON payload out of the list table's `data-items` attribute.
///
/// The HTML parser already resolves the attribute's entity escapes, so the
/// value is plain JSON by the time it reaches serde.
fn extract_data_items(html: &str) -> Result<Vec<AnimeListEntry>> {
    let document = Html::parse_document(html);
    let table_selector =
        Selector::parse("table[data-items]").map_err(|e| MalError::Parse(e.to_string()))?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| MalError::Parse("list table with data-items not found".to_string()))?;

    let raw = table.value().attr("data-items").unwrap_or_default();

    serde_json::from_str(raw)
        .map_err(|e| MalError::Parse(format!("invalid animelist payload: {}", e)))
}
