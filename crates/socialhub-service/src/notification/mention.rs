//! Mention extraction from comment content.

use std::sync::LazyLock;

use regex::Regex;

static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@(\w+)").unwrap());

/// Extract the distinct usernames mentioned as `@username`, in order of
/// first appearance. Whether a username actually exists is resolved by
/// the caller.
pub fn extract_mentions(content: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in MENTION_RE.captures_iter(content) {
        let username = &caps[1];
        if !seen.iter().any(|s| s == username) {
            seen.push(username.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_order() {
        assert_eq!(
            extract_mentions("hello @alice and @bob"),
            vec!["alice", "bob"]
        );
    }

    #[test]
    fn test_deduplicates() {
        assert_eq!(extract_mentions("@alice hi @alice"), vec!["alice"]);
    }

    #[test]
    fn test_no_mentions() {
        assert!(extract_mentions("no one here").is_empty());
        assert!(extract_mentions("trailing @ alone").is_empty());
    }

    #[test]
    fn test_punctuation_terminates() {
        assert_eq!(extract_mentions("thanks @carol!"), vec!["carol"]);
    }
}
