use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use parser::Parser;
use reconciler::{Config, FeedItem, MalSource, Reconciler, RewriteRule, RunLock, StateStore};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mal_user = env::var("MAL_TARGET_USER").context("MAL_TARGET_USER is not set")?;
    let telegram_token =
        env::var("TELEGRAM_API_TOKEN").context("TELEGRAM_API_TOKEN is not set")?;
    let telegram_chat_id = env::var("TELEGRAM_CHAT_ID").context("TELEGRAM_CHAT_ID is not set")?;

    let mut config = Config::default();
    if let Ok(raw) = env::var("NYAA_REWRITE") {
        config.rewrite_rules = RewriteRule::parse_list(&raw);
    }
    if let Ok(raw) = env::var("REFRESH_MAL_ANIME_DATA_EVERY_MINUTES") {
        config.refresh_interval_minutes = raw
            .parse()
            .context("REFRESH_MAL_ANIME_DATA_EVERY_MINUTES is not a number")?;
    }

    let data_path = PathBuf::from(env::var("DATA_PATH").unwrap_or_else(|_| ".".to_string()));
    std::fs::create_dir_all(&data_path)?;

    // Held for the whole run; released on exit, even on the fatal path.
    let _lock = RunLock::acquire(data_path.join("aninotify.lock"))?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let nyaa = match env::var("NYAA_URL") {
        Ok(url) => nyaa::NyaaClient::with_listing_url(http.clone(), url),
        Err(_) => nyaa::NyaaClient::new(http.clone()),
    };

    tracing::info!("Getting release listings from Nyaa");
    let releases = nyaa.fetch_releases().await?;

    let release_parser = Parser::new();
    let feed: Vec<FeedItem> = releases
        .iter()
        .filter_map(|name| {
            release_parser
                .parse(name)
                .map(|release| FeedItem::from_release(name.clone(), release))
        })
        .collect();
    tracing::debug!("Parsed {} of {} feed items", feed.len(), releases.len());

    let reconciler = Reconciler::new(
        config,
        StateStore::new(data_path.join("data.json")),
        Arc::new(MalSource::new(mal::MalClient::new(http.clone()), mal_user)),
        Arc::new(telegram::TelegramClient::new(
            http,
            telegram_token,
            telegram_chat_id,
        )),
    );

    reconciler.run(feed).await?;
    Ok(())
}
