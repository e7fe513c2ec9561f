//! Post Text Parser
//!
//! Extracts @mentions and #hashtags from post text so they can be stored
//! alongside the post for lookup.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches @username where username contains alphanumerics and underscores
static MENTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([a-zA-Z0-9_]+)").expect("Invalid mention regex"));

/// Matches #tag where tag contains alphanumerics and underscores
static HASHTAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([a-zA-Z0-9_]+)").expect("Invalid hashtag regex"));

/// Extract @mentions from text.
///
/// Returns a deduplicated list of lowercased usernames (without the @).
pub fn extract_mentions(content: &str) -> Vec<String> {
    dedup_matches(&MENTION_REGEX, content)
}

/// Extract #hashtags from text.
///
/// Returns a deduplicated list of lowercased tags (without the #).
pub fn extract_hashtags(content: &str) -> Vec<String> {
    dedup_matches(&HASHTAG_REGEX, content)
}

fn dedup_matches(regex: &Regex, content: &str) -> Vec<String> {
    let matches: Vec<String> = regex
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_lowercase()))
        .collect();

    // Deduplicate while preserving first occurrence order
    let mut seen = std::collections::HashSet::new();
    matches
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_mention() {
        let mentions = extract_mentions("Hello @alice!");
        assert_eq!(mentions, vec!["alice"]);
    }

    #[test]
    fn test_extract_duplicate_mentions() {
        let mentions = extract_mentions("@alice said hi to @bob, then @alice replied");
        assert_eq!(mentions, vec!["alice", "bob"]);
    }

    #[test]
    fn test_mentions_normalized_to_lowercase() {
        let mentions = extract_mentions("@Alice and @ALICE and @alice");
        assert_eq!(mentions, vec!["alice"]);
    }

    #[test]
    fn test_extract_hashtags() {
        let hashtags = extract_hashtags("sunset #photography #Travel #photography");
        assert_eq!(hashtags, vec!["photography", "travel"]);
    }

    #[test]
    fn test_no_matches() {
        assert!(extract_mentions("Hello world!").is_empty());
        assert!(extract_hashtags("Hello world!").is_empty());
    }
}
