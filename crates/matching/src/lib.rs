//! Title normalization and fuzzy matching library.
//!
//! Subscription titles and release-file titles come from two independently
//! maintained naming schemes, so they rarely agree byte-for-byte. Matching
//! works on a normalized key (ASCII letters and digits only, lower-cased)
//! and tolerates an edit distance of at most one, which absorbs punctuation
//! and minor romanization drift without letting unrelated titles through.
//!
//! # Example
//!
//! ```
//! use matching::{normalize, titles_match};
//!
//! assert_eq!(normalize("Re:Zero"), "rezero");
//! assert!(titles_match("Re:Zero", "ReZero"));
//! assert!(!titles_match("One Piece", "Two Piece"));
//! ```

/// Maximum edit distance between normalized keys that still counts as the
/// same work.
pub const MAX_TITLE_DISTANCE: usize = 1;

/// Reduce a title to its comparison key: every character that is not an
/// ASCII letter or digit is dropped, the remainder is lower-cased.
///
/// Total and idempotent; an empty key is a valid result.
pub fn normalize(title: &str) -> String {
    title
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Levenshtein distance between two strings, computed over chars with the
/// classic two-row dynamic program.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost)
                .min(prev[j + 1] + 1)
                .min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Whether two titles refer to the same work: normalized keys within
/// [`MAX_TITLE_DISTANCE`] of each other.
pub fn titles_match(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);

    // Normalized keys are pure ASCII, so byte length equals char count.
    if a.len().abs_diff(b.len()) > MAX_TITLE_DISTANCE {
        return false;
    }

    levenshtein(&a, &b) <= MAX_TITLE_DISTANCE
}
