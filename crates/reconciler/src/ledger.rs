use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value reported for titles that never triggered a notification.
pub const NONE_SENT: i32 = -1;

/// Per-title high-water-mark of the last notified episode.
///
/// Keyed by the subscription's native title string exactly as the live match
/// reported it — not normalized. Two spellings of the same work therefore
/// track separately; that is inherited behavior, not something to fix here.
/// Entries are created lazily on the first notification-worthy match and
/// only ever increase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeLedger(BTreeMap<String, i32>);

impl EpisodeLedger {
    /// Highest episode already notified for `title`, or [`NONE_SENT`] when
    /// the title has no entry yet. Absence is the expected initial state.
    pub fn highest(&self, title: &str) -> i32 {
        self.0.get(title).copied().unwrap_or(NONE_SENT)
    }

    /// Record `episode` when it is strictly newer than anything recorded for
    /// `title`, returning whether the caller should notify. Anything else is
    /// the normal deduplication path and leaves the ledger unchanged.
    pub fn record_if_newer(&mut self, title: &str, episode: i32) -> bool {
        if episode > self.highest(title) {
            self.0.insert(title.to_string(), episode);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
