//! Content excerpts embedded in notification payloads.

/// Maximum excerpt length, in characters.
const EXCERPT_LEN: usize = 50;

/// Truncate content for embedding in a notification payload. Content at
/// or under the limit is kept verbatim; longer content is cut to the
/// limit and suffixed with `...`.
pub fn excerpt(content: &str) -> String {
    let mut chars = content.char_indices();
    match chars.nth(EXCERPT_LEN) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_content_truncated() {
        let content = "x".repeat(120);
        let e = excerpt(&content);
        assert_eq!(e.chars().count(), 53);
        assert!(e.ends_with("..."));
        assert!(e.starts_with(&"x".repeat(50)));
    }

    #[test]
    fn test_short_content_verbatim() {
        let content = "y".repeat(40);
        assert_eq!(excerpt(&content), content);
    }

    #[test]
    fn test_exact_boundary_verbatim() {
        let content = "z".repeat(50);
        assert_eq!(excerpt(&content), content);
    }

    #[test]
    fn test_multibyte_content() {
        let content = "é".repeat(60);
        let e = excerpt(&content);
        assert_eq!(e.chars().count(), 53);
        assert!(e.ends_with("..."));
    }
}
