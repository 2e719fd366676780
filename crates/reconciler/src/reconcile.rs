use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Timelike};
use thiserror::Error;

use mal::AnimeListEntry;
use matching::titles_match;

use crate::config::Config;
use crate::models::FeedItem;
use crate::notify::Notifier;
use crate::refresh::should_refresh;
use crate::rewrite::apply_rewrites;
use crate::source::SubscriptionSource;
use crate::state::{StateError, StateStore};

/// Days after a subscription's end date during which it still triggers
/// notifications. Anything older is treated as an accidental fuzzy match on
/// an unrelated release.
const ENDED_GRACE_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum RunError {
    /// Subscription list unavailable and no cached snapshot to fall back on.
    /// The run aborts before any mutation; nothing is saved.
    #[error("subscription list unavailable and no cached snapshot exists: {0}")]
    SubscriptionUnavailable(#[source] anyhow::Error),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Counters for one batch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Feed items handed to the run.
    pub feed_items: usize,
    /// Items that fuzzy-matched a subscription entry.
    pub matched: usize,
    /// Notifications actually delivered.
    pub notifications_sent: usize,
}

/// Orchestrates one batch pass over the feed.
pub struct Reconciler {
    config: Config,
    store: StateStore,
    source: Arc<dyn SubscriptionSource>,
    notifier: Arc<dyn Notifier>,
}

impl Reconciler {
    pub fn new(
        config: Config,
        store: StateStore,
        source: Arc<dyn SubscriptionSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            store,
            source,
            notifier,
        }
    }

    /// Run one reconciliation pass over `feed`, in feed order.
    pub async fn run(&self, feed: Vec<FeedItem>) -> Result<RunSummary, RunError> {
        self.run_at(feed, Local::now()).await
    }

    async fn run_at(&self, feed: Vec<FeedItem>, now: DateTime<Local>) -> Result<RunSummary, RunError> {
        let mut state = self.store.load().await?;

        if should_refresh(
            state.subscriptions.is_some(),
            now.minute(),
            self.config.refresh_interval_minutes,
        ) {
            match self.source.fetch_watching().await {
                Ok(entries) => {
                    tracing::info!("Refreshed subscription snapshot: {} entries", entries.len());
                    state.subscriptions = Some(entries);
                }
                Err(e) if state.subscriptions.is_none() => {
                    tracing::error!("Could not fetch subscription list: {:#}", e);
                    return Err(RunError::SubscriptionUnavailable(e));
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not fetch subscription list, reusing cached snapshot: {:#}",
                        e
                    );
                }
            }
        }

        let today = now.date_naive();
        let mut summary = RunSummary {
            feed_items: feed.len(),
            ..RunSummary::default()
        };

        let subscriptions = state.subscriptions.as_deref().unwrap_or_default();
        let ledger = &mut state.episodes;

        for mut item in feed {
            apply_rewrites(&mut item, &self.config.rewrite_rules);

            // First fuzzy match wins; there is no scoring among candidates.
            let Some(entry) = subscriptions.iter().find(|s| matches_item(s, &item)) else {
                continue;
            };
            summary.matched += 1;

            // A matched-but-ended entry skips the item entirely rather than
            // falling through to a second-best candidate.
            if !is_live(entry, today) {
                tracing::debug!(
                    "'{}' matched '{}' but it ended more than {} days ago",
                    item.title,
                    entry.title,
                    ENDED_GRACE_DAYS
                );
                continue;
            }

            let Some(episode) = item.episode else {
                tracing::debug!("No episode number parsed from '{}'", item.file_name);
                continue;
            };

            if !ledger.record_if_newer(&entry.title, episode) {
                continue;
            }

            // The ledger already consumed the episode; a failing transport
            // must not turn into duplicate spam on later runs.
            let message = render_message(entry, episode, now);
            match self.notifier.send_message(&message).await {
                Ok(()) => {
                    tracing::info!("Sent episode notification for '{}'", item.title);
                    summary.notifications_sent += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to notify for '{}': {:#}", item.title, e);
                }
            }
        }

        self.store.save(&state).await?;

        if summary.notifications_sent > 0 {
            tracing::info!("Done, sent {} notifications!", summary.notifications_sent);
        } else {
            tracing::info!("Done, sent no notifications!");
        }

        Ok(summary)
    }
}

/// A subscription entry matches a feed item when either of its titles is
/// within fuzzy distance of the item's title.
fn matches_item(entry: &AnimeListEntry, item: &FeedItem) -> bool {
    titles_match(&entry.title, &item.title)
        || entry
            .title_eng
            .as_deref()
            .is_some_and(|alt| titles_match(alt, &item.title))
}

/// Live: still airing, or ended within the trailing grace window.
fn is_live(entry: &AnimeListEntry, today: NaiveDate) -> bool {
    match entry.end_date() {
        Some(end) => (today - end).num_days() <= ENDED_GRACE_DAYS,
        None => true,
    }
}

fn render_message(entry: &AnimeListEntry, episode: i32, now: DateTime<Local>) -> String {
    format!(
        "[{}] Episode {} has been aired for '{}'!",
        now.format("%A, %d/%m/%Y %H:%M"),
        episode,
        entry.preferred_title()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use mal::WatchStatus;

    use crate::config::RewriteRule;
    use crate::state::PersistedState;

    fn watching(title: &str, title_eng: Option<&str>, end_date: Option<&str>) -> AnimeListEntry {
        AnimeListEntry {
            title: title.to_string(),
            title_eng: title_eng.map(str::to_string),
            status: WatchStatus::Watching,
            end_date_string: end_date.map(str::to_string),
        }
    }

    struct FakeSource {
        entries: Vec<AnimeListEntry>,
        fail: bool,
    }

    #[async_trait]
    impl SubscriptionSource for FakeSource {
        async fn fetch_watching(&self) -> anyhow::Result<Vec<AnimeListEntry>> {
            if self.fail {
                anyhow::bail!("animelist is down");
            }
            Ok(self.entries.clone())
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        fail: bool,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn send_message(&self, text: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("transport is down");
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// Minute 7 of a quarter hour: an existing snapshot is reused, a missing
    /// one still forces a fetch.
    fn off_interval_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 6, 12, 7, 0).unwrap()
    }

    /// Minute 0: the refresh policy re-fetches even with a snapshot present.
    fn on_interval_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        reconciler: Reconciler,
        notifier: Arc<FakeNotifier>,
        state_path: std::path::PathBuf,
    }

    fn fixture(config: Config, source: FakeSource, notifier: FakeNotifier) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("data.json");
        let notifier = Arc::new(notifier);

        let reconciler = Reconciler::new(
            config,
            StateStore::new(&state_path),
            Arc::new(source),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        );

        Fixture {
            _dir: dir,
            reconciler,
            notifier,
            state_path,
        }
    }

    fn jjk_feed_item(episode: i32) -> FeedItem {
        FeedItem::new(
            "Jujutsu Kaisen",
            Some(episode),
            format!("[SubsPlease] Jujutsu Kaisen - {episode:02} (1080p).mkv"),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_notify_then_dedup() {
        let fx = fixture(
            Config::default(),
            FakeSource {
                entries: vec![watching("Jujutsu Kaisen", None, None)],
                fail: false,
            },
            FakeNotifier::default(),
        );

        let summary = fx
            .reconciler
            .run_at(vec![jjk_feed_item(5)], off_interval_now())
            .await
            .unwrap();
        assert_eq!(summary.feed_items, 1);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.notifications_sent, 1);

        let sent = fx.notifier.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Episode 5 has been aired for 'Jujutsu Kaisen'!"));

        let state = StateStore::new(&fx.state_path).load().await.unwrap();
        assert_eq!(state.episodes.highest("Jujutsu Kaisen"), 5);

        // Re-running with the same feed item produces nothing new.
        let summary = fx
            .reconciler
            .run_at(vec![jjk_feed_item(5)], off_interval_now())
            .await
            .unwrap();
        assert_eq!(summary.notifications_sent, 0);

        let state = StateStore::new(&fx.state_path).load().await.unwrap();
        assert_eq!(state.episodes.highest("Jujutsu Kaisen"), 5);
        assert_eq!(fx.notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_still_consumes_episode() {
        let fx = fixture(
            Config::default(),
            FakeSource {
                entries: vec![watching("Jujutsu Kaisen", None, None)],
                fail: false,
            },
            FakeNotifier {
                fail: true,
                ..FakeNotifier::default()
            },
        );

        let summary = fx
            .reconciler
            .run_at(vec![jjk_feed_item(5)], off_interval_now())
            .await
            .unwrap();
        assert_eq!(summary.notifications_sent, 0);

        // The ledger update is not rolled back on delivery failure.
        let state = StateStore::new(&fx.state_path).load().await.unwrap();
        assert_eq!(state.episodes.highest("Jujutsu Kaisen"), 5);
    }

    #[tokio::test]
    async fn test_fetch_failure_without_snapshot_is_fatal_and_saves_nothing() {
        let fx = fixture(
            Config::default(),
            FakeSource {
                entries: vec![],
                fail: true,
            },
            FakeNotifier::default(),
        );

        let err = fx
            .reconciler
            .run_at(vec![jjk_feed_item(5)], off_interval_now())
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::SubscriptionUnavailable(_)));
        assert!(!fx.state_path.exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_with_snapshot_degrades_to_stale_data() {
        let fx = fixture(
            Config::default(),
            FakeSource {
                entries: vec![],
                fail: true,
            },
            FakeNotifier::default(),
        );

        let mut seeded = PersistedState::default();
        seeded.subscriptions = Some(vec![watching("Jujutsu Kaisen", None, None)]);
        StateStore::new(&fx.state_path).save(&seeded).await.unwrap();

        // Minute 0 forces the refresh attempt; the failure degrades to the
        // cached snapshot instead of aborting.
        let summary = fx
            .reconciler
            .run_at(vec![jjk_feed_item(5)], on_interval_now())
            .await
            .unwrap();
        assert_eq!(summary.notifications_sent, 1);
    }

    #[tokio::test]
    async fn test_snapshot_reused_off_interval() {
        let fx = fixture(
            Config::default(),
            FakeSource {
                // A fetch would bring in nothing; reuse must see the cache.
                entries: vec![],
                fail: false,
            },
            FakeNotifier::default(),
        );

        let mut seeded = PersistedState::default();
        seeded.subscriptions = Some(vec![watching("Jujutsu Kaisen", None, None)]);
        StateStore::new(&fx.state_path).save(&seeded).await.unwrap();

        let summary = fx
            .reconciler
            .run_at(vec![jjk_feed_item(5)], off_interval_now())
            .await
            .unwrap();
        assert_eq!(summary.notifications_sent, 1);
    }

    #[tokio::test]
    async fn test_ended_subscription_is_skipped() {
        // Ended 17 days before the fixed "now" (2026-08-06).
        let fx = fixture(
            Config::default(),
            FakeSource {
                entries: vec![watching("Jujutsu Kaisen", None, Some("07-20-26"))],
                fail: false,
            },
            FakeNotifier::default(),
        );

        let summary = fx
            .reconciler
            .run_at(vec![jjk_feed_item(5)], off_interval_now())
            .await
            .unwrap();
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.notifications_sent, 0);

        let state = StateStore::new(&fx.state_path).load().await.unwrap();
        assert!(state.episodes.is_empty());
    }

    #[tokio::test]
    async fn test_item_without_episode_number_is_skipped() {
        let fx = fixture(
            Config::default(),
            FakeSource {
                entries: vec![watching("Jujutsu Kaisen", None, None)],
                fail: false,
            },
            FakeNotifier::default(),
        );

        let item = FeedItem::new("Jujutsu Kaisen", None, "[Batch] Jujutsu Kaisen (1080p)");
        let summary = fx
            .reconciler
            .run_at(vec![item], off_interval_now())
            .await
            .unwrap();
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.notifications_sent, 0);
    }

    #[tokio::test]
    async fn test_alternate_title_matches_and_ledger_uses_native_title() {
        let fx = fixture(
            Config::default(),
            FakeSource {
                entries: vec![watching(
                    "Sousou no Frieren",
                    Some("Frieren: Beyond Journey's End"),
                    None,
                )],
                fail: false,
            },
            FakeNotifier::default(),
        );

        let item = FeedItem::new(
            "Frieren Beyond Journeys End",
            Some(28),
            "[Group] Frieren Beyond Journeys End - 28.mkv",
        );
        let summary = fx
            .reconciler
            .run_at(vec![item], off_interval_now())
            .await
            .unwrap();
        assert_eq!(summary.notifications_sent, 1);

        // Message prefers the English title; the ledger keys on the native one.
        let sent = fx.notifier.sent.lock().unwrap().clone();
        assert!(sent[0].contains("'Frieren: Beyond Journey's End'"));

        let state = StateStore::new(&fx.state_path).load().await.unwrap();
        assert_eq!(state.episodes.highest("Sousou no Frieren"), 28);
        assert_eq!(state.episodes.highest("Frieren: Beyond Journey's End"), -1);
    }

    #[tokio::test]
    async fn test_rewrite_enables_otherwise_impossible_match() {
        let config = Config {
            rewrite_rules: vec![RewriteRule::new("JJK", "Jujutsu Kaisen")],
            ..Config::default()
        };
        let fx = fixture(
            config,
            FakeSource {
                entries: vec![watching("Jujutsu Kaisen", None, None)],
                fail: false,
            },
            FakeNotifier::default(),
        );

        let item = FeedItem::new("JJK S2", Some(3), "[Group] JJK S2 - 03 [1080p].mkv");
        let summary = fx
            .reconciler
            .run_at(vec![item], off_interval_now())
            .await
            .unwrap();
        assert_eq!(summary.notifications_sent, 1);
    }

    #[tokio::test]
    async fn test_first_matching_subscription_wins() {
        let fx = fixture(
            Config::default(),
            FakeSource {
                entries: vec![
                    watching("Jujutsu Kaisen", None, None),
                    watching("Jujutsu Kaisen!", None, None),
                ],
                fail: false,
            },
            FakeNotifier::default(),
        );

        let summary = fx
            .reconciler
            .run_at(vec![jjk_feed_item(4)], off_interval_now())
            .await
            .unwrap();
        assert_eq!(summary.notifications_sent, 1);

        let state = StateStore::new(&fx.state_path).load().await.unwrap();
        assert_eq!(state.episodes.highest("Jujutsu Kaisen"), 4);
        assert_eq!(state.episodes.highest("Jujutsu Kaisen!"), -1);
    }

    #[test]
    fn test_liveness_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        let seven_days_ago = watching("T", None, Some("07-30-26"));
        assert!(is_live(&seven_days_ago, today));

        let eight_days_ago = watching("T", None, Some("07-29-26"));
        assert!(!is_live(&eight_days_ago, today));

        let still_airing = watching("T", None, None);
        assert!(is_live(&still_airing, today));

        let ends_in_future = watching("T", None, Some("09-01-26"));
        assert!(is_live(&ends_in_future, today));

        // Unparsable dates degrade to "still airing" instead of aborting.
        let garbage = watching("T", None, Some("unknown"));
        assert!(is_live(&garbage, today));
    }

    #[test]
    fn test_matches_item_checks_both_titles() {
        let entry = watching("Sousou no Frieren", Some("Frieren: Beyond Journey's End"), None);

        let native = FeedItem::new("Sousou no Frieren", Some(1), "x");
        assert!(matches_item(&entry, &native));

        let alternate = FeedItem::new("Frieren: Beyond Journeys End", Some(1), "x");
        assert!(matches_item(&entry, &alternate));

        let unrelated = FeedItem::new("One Piece", Some(1), "x");
        assert!(!matches_item(&entry, &unrelated));
    }

    #[test]
    fn test_render_message_format() {
        let entry = watching("Jujutsu Kaisen", None, None);
        let now = Local.with_ymd_and_hms(2026, 8, 6, 9, 5, 0).unwrap();
        assert_eq!(
            render_message(&entry, 5, now),
            format!(
                "[{}] Episode 5 has been aired for 'Jujutsu Kaisen'!",
                now.format("%A, %d/%m/%Y %H:%M")
            )
        );
    }
}
