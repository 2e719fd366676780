use scraper::{CaseSensitivity, Html, Selector};

use crate::{NyaaError, Result};

/// Anime - English-translated, newest first.
const DEFAULT_LISTING_URL: &str = "https://nyaa.si/?c=1_2";

pub struct NyaaClient {
    client: reqwest::Client,
    listing_url: String,
}

impl NyaaClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            listing_url: DEFAULT_LISTING_URL.to_string(),
        }
    }

    pub fn with_listing_url(client: reqwest::Client, listing_url: impl Into<String>) -> Self {
        Self {
            client,
            listing_url: listing_url.into(),
        }
    }

    /// Fetch the listing page and return the release names on it.
    pub async fn fetch_releases(&self) -> Result<Vec<String>> {
        tracing::debug!("Fetching listing from: {}", self.listing_url);

        let response = self.client.get(&self.listing_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(NyaaError::Parse(format!(
                "HTTP {} when fetching {}",
                status, self.listing_url
            )));
        }

        let html = response.text().await?;
        let names = extract_release_names(&html)?;

        tracing::debug!("Listing page has {} releases", names.len());
        Ok(names)
    }
}

/// Walk the torrent-list table and collect the release names from the title
/// attributes of the name-cell links, skipping the comment-count links that
/// share the cell.
fn extract_release_names(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table.torrent-list tbody tr")
        .map_err(|e| NyaaError::Parse(e.to_string()))?;
    let link_selector =
        Selector::parse("td[colspan] a").map_err(|e| NyaaError::Parse(e.to_string()))?;

    let mut names = Vec::new();

    for row in document.select(&row_selector) {
        for link in row.select(&link_selector) {
            if link
                .value()
                .has_class("comments", CaseSensitivity::CaseSensitive)
            {
                continue;
            }

            if let Some(title) = link.value().attr("title") {
                if !title.is_empty() {
                    names.push(title.to_string());
                }
            }
        }
    }

    Ok(names)
}
