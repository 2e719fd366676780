use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format MAL uses in `anime_end_date_string`, e.g. `03-28-24`.
const END_DATE_FORMAT: &str = "%m-%d-%y";

/// List status codes as they appear in the `data-items` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum WatchStatus {
    Watching,
    Completed,
    OnHold,
    Dropped,
    PlanToWatch,
    /// Codes MAL may add in the future; kept verbatim so snapshots round-trip.
    Other(i32),
}

impl From<i32> for WatchStatus {
    fn from(code: i32) -> Self {
        match code {
            1 => Self::Watching,
            2 => Self::Completed,
            3 => Self::OnHold,
            4 => Self::Dropped,
            6 => Self::PlanToWatch,
            other => Self::Other(other),
        }
    }
}

impl From<WatchStatus> for i32 {
    fn from(status: WatchStatus) -> Self {
        match status {
            WatchStatus::Watching => 1,
            WatchStatus::Completed => 2,
            WatchStatus::OnHold => 3,
            WatchStatus::Dropped => 4,
            WatchStatus::PlanToWatch => 6,
            WatchStatus::Other(code) => code,
        }
    }
}

/// One entry of a user's anime list, reduced to the fields this system uses.
///
/// Serde renames keep MAL's own field names, so a decoded entry serializes
/// back into the same shape when the snapshot is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeListEntry {
    /// Native (usually romaji) title.
    #[serde(rename = "anime_title")]
    pub title: String,
    /// English title; MAL leaves this null or empty for many entries.
    #[serde(rename = "anime_title_eng", default)]
    pub title_eng: Option<String>,
    pub status: WatchStatus,
    /// End of airing; null while the show is still running.
    #[serde(rename = "anime_end_date_string", default)]
    pub end_date_string: Option<String>,
}

impl AnimeListEntry {
    /// The English title when MAL has one, otherwise the native title.
    pub fn preferred_title(&self) -> &str {
        self.title_eng
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
    }

    /// Parsed end-of-airing date. Unparsable values are logged and treated
    /// as "still airing".
    pub fn end_date(&self) -> Option<NaiveDate> {
        let raw = self.end_date_string.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        match NaiveDate::parse_from_str(raw, END_DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!("Unparsable end date '{}' for '{}': {}", raw, self.title, e);
                None
            }
        }
    }
}
