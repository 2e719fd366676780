use parser::Release;

/// A release observed on the feed site, reduced to what the engine needs.
///
/// Immutable once parsed, except that a rewrite rule may overwrite the
/// title before matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Title used for matching against the subscription list.
    pub title: String,
    /// Episode number; absent when the feed source could not parse one.
    pub episode: Option<i32>,
    /// Raw release file name, used for rewrite-rule matching.
    pub file_name: String,
}

impl FeedItem {
    pub fn new(title: impl Into<String>, episode: Option<i32>, file_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            episode,
            file_name: file_name.into(),
        }
    }

    /// Build a feed item from a parsed release and the name it came from.
    pub fn from_release(file_name: impl Into<String>, release: Release) -> Self {
        Self {
            title: release.title,
            episode: release.episode,
            file_name: file_name.into(),
        }
    }
}
