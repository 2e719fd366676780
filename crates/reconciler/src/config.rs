/// How often the subscription snapshot is re-fetched, in wall-clock minutes.
pub const DEFAULT_REFRESH_INTERVAL_MINUTES: u32 = 15;

/// Engine configuration, built by the caller and passed in at construction.
/// The engine itself never reads the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// The snapshot is refreshed whenever the current minute is a multiple
    /// of this interval (and always when no snapshot exists yet).
    pub refresh_interval_minutes: u32,
    /// Manual title overrides, applied in order; first match wins.
    pub rewrite_rules: Vec<RewriteRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_minutes: DEFAULT_REFRESH_INTERVAL_MINUTES,
            rewrite_rules: Vec::new(),
        }
    }
}

/// Manual override mapping a file-name substring to a canonical title, for
/// release names too divergent for fuzzy matching to bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    /// Substring looked up in the raw release file name.
    pub trigger: String,
    /// Title the feed item is given when the trigger occurs.
    pub canonical: String,
}

impl RewriteRule {
    pub fn new(trigger: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            canonical: canonical.into(),
        }
    }

    /// Parse a comma-separated rule list as it appears in configuration.
    ///
    /// Each entry is `trigger=canonical`; a bare entry is its own canonical
    /// title, which keeps single-string rule lists working.
    pub fn parse_list(raw: &str) -> Vec<RewriteRule> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('=') {
                Some((trigger, canonical)) => RewriteRule::new(trigger.trim(), canonical.trim()),
                None => RewriteRule::new(entry, entry),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_pairs_and_bare_entries() {
        let rules = RewriteRule::parse_list("JJK=Jujutsu Kaisen, Frieren");
        assert_eq!(
            rules,
            vec![
                RewriteRule::new("JJK", "Jujutsu Kaisen"),
                RewriteRule::new("Frieren", "Frieren"),
            ]
        );
    }

    #[test]
    fn test_parse_list_skips_empty_entries() {
        assert!(RewriteRule::parse_list("").is_empty());
        assert!(RewriteRule::parse_list(" , ,").is_empty());
    }

    #[test]
    fn test_parse_list_preserves_order() {
        let rules = RewriteRule::parse_list("a=1,b=2,c=3");
        let triggers: Vec<&str> = rules.iter().map(|r| r.trigger.as_str()).collect();
        assert_eq!(triggers, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.refresh_interval_minutes, 15);
        assert!(config.rewrite_rules.is_empty());
    }
}
