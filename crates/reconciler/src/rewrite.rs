use crate::config::RewriteRule;
use crate::models::FeedItem;

/// Apply the first rule whose trigger occurs anywhere in the item's raw file
/// name, overwriting the item's title with the rule's canonical title.
/// Later rules are not considered for that item. Returns whether a rule
/// fired.
pub fn apply_rewrites(item: &mut FeedItem, rules: &[RewriteRule]) -> bool {
    for rule in rules {
        if item.file_name.contains(&rule.trigger) {
            tracing::debug!(
                "Rewriting '{}' -> '{}' (trigger '{}')",
                item.title,
                rule.canonical,
                rule.trigger
            );
            item.title = rule.canonical.clone();
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, file_name: &str) -> FeedItem {
        FeedItem::new(title, Some(2), file_name)
    }

    #[test]
    fn test_trigger_in_file_name_rewrites_title() {
        let rules = vec![RewriteRule::new("JJK", "Jujutsu Kaisen")];
        let mut item = item("JJK S2", "[Group] JJK S2 - 02 [1080p].mkv");

        assert!(apply_rewrites(&mut item, &rules));
        assert_eq!(item.title, "Jujutsu Kaisen");
        // The raw file name stays untouched.
        assert_eq!(item.file_name, "[Group] JJK S2 - 02 [1080p].mkv");
    }

    #[test]
    fn test_no_trigger_means_no_change() {
        let rules = vec![RewriteRule::new("JJK", "Jujutsu Kaisen")];
        let mut item = item("Frieren", "[Group] Frieren - 02.mkv");

        assert!(!apply_rewrites(&mut item, &rules));
        assert_eq!(item.title, "Frieren");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            RewriteRule::new("Kaisen", "First"),
            RewriteRule::new("JJK", "Second"),
        ];
        let mut item = item("x", "JJK Kaisen - 01.mkv");

        assert!(apply_rewrites(&mut item, &rules));
        assert_eq!(item.title, "First");
    }

    #[test]
    fn test_matching_is_case_sensitive_substring() {
        let rules = vec![RewriteRule::new("jjk", "Jujutsu Kaisen")];
        let mut item = item("JJK S2", "[Group] JJK S2 - 02.mkv");

        assert!(!apply_rewrites(&mut item, &rules));
    }

    #[test]
    fn test_empty_rule_list_is_a_no_op() {
        let mut item = item("Frieren", "[Group] Frieren - 02.mkv");
        assert!(!apply_rewrites(&mut item, &[]));
    }
}
