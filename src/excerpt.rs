//! Post description excerpts.
//!
//! The sidebar annotates each post with a short plain-text excerpt
//! pulled from the article itself: the first meaningful lines after
//! headings and frontmatter, stripped of markdown syntax and cut at a
//! word boundary. Results are memoized per path for the session; a
//! failed fetch caches a fixed fallback so the path is never retried.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Target excerpt length before the word-boundary cut.
const MAX_LEN: usize = 120;
/// Stop accumulating lines once this much text is collected.
const ENOUGH_LEN: usize = 150;

/// Shown when an article cannot be fetched or yields no usable text.
pub const FALLBACK_DESCRIPTION: &str = "Open to read this post.";

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").unwrap());
static HEADING_MARKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"#{1,6}\s+").unwrap());

/// Session-lifetime memo of `path -> excerpt`. Never invalidated; a
/// personal blog's post count keeps this small.
#[derive(Debug, Default)]
pub struct DescriptionCache {
    entries: HashMap<String, String>,
}

impl DescriptionCache {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Store the excerpt for a fetched article body.
    pub fn insert_from_markdown(&mut self, path: &str, markdown: &str) {
        self.entries
            .insert(path.to_string(), extract_excerpt(markdown));
    }

    /// Store the fallback after a failed fetch; later calls for the
    /// same path hit the cache instead of re-fetching.
    pub fn insert_fallback(&mut self, path: &str) {
        self.entries
            .insert(path.to_string(), FALLBACK_DESCRIPTION.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Is this line metadata rather than prose?
fn is_metadata_line(line: &str) -> bool {
    line.starts_with('#')
        || line.starts_with("---")
        || line.starts_with("title:")
        || line.starts_with("date:")
        || line.starts_with("author:")
}

/// Extract a short plain-text excerpt from raw article markdown.
///
/// Skips headings, blank lines and frontmatter-style metadata, then
/// joins prose lines until enough text is collected. Markdown emphasis,
/// links and inline code are reduced to their visible text.
pub fn extract_excerpt(markdown: &str) -> String {
    let mut description = String::new();
    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_metadata_line(trimmed) {
            continue;
        }
        if description.is_empty() {
            description.push_str(trimmed);
        } else if description.len() < 100 {
            description.push(' ');
            description.push_str(trimmed);
        } else {
            break;
        }
        if description.len() > ENOUGH_LEN {
            break;
        }
    }

    let description = strip_markdown(&description);
    if description.is_empty() {
        return FALLBACK_DESCRIPTION.to_string();
    }
    truncate_at_word(&description, MAX_LEN)
}

/// Reduce inline markdown syntax to its visible text.
fn strip_markdown(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = EMPHASIS.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = HEADING_MARKS.replace_all(&text, "");
    text.trim().to_string()
}

/// Cut at `max_len`, backing up to a word boundary when one is close
/// enough, and append an ellipsis.
fn truncate_at_word(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len).collect();
    let cut = cut.trim_end();
    let truncated = match cut.rfind(' ') {
        // Prefer a near-full cut; backing up too far reads worse than
        // a mid-word cut.
        Some(idx) if idx > max_len * 2 / 3 => &cut[..idx],
        _ => cut,
    };
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_skips_headings_and_frontmatter() {
        let md = "---\ntitle: Kerberoasting 101\ndate: 2024-01-01\n---\n\n\
                  # Kerberoasting 101\n\nService tickets can be cracked offline.\n";
        assert_eq!(
            extract_excerpt(md),
            "Service tickets can be cracked offline."
        );
    }

    #[test]
    fn test_excerpt_strips_inline_markdown() {
        let md = "Use **bold moves** and *subtle ones* with \
                  [a link](https://example.net) and `code`.";
        assert_eq!(
            extract_excerpt(md),
            "Use bold moves and subtle ones with a link and code."
        );
    }

    #[test]
    fn test_excerpt_joins_short_lines() {
        let md = "First sentence.\nSecond sentence.\n";
        assert_eq!(extract_excerpt(md), "First sentence. Second sentence.");
    }

    #[test]
    fn test_excerpt_truncates_at_word_boundary_with_ellipsis() {
        let long = "word ".repeat(60);
        let excerpt = extract_excerpt(&long);
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= MAX_LEN + 3);
        assert!(
            !excerpt.trim_end_matches("...").ends_with("wor"),
            "should not cut mid-word: {excerpt}"
        );
    }

    #[test]
    fn test_excerpt_of_heading_only_document_falls_back() {
        assert_eq!(extract_excerpt("# Only\n\n## Headings\n"), FALLBACK_DESCRIPTION);
    }

    #[test]
    fn test_cache_memoizes_and_never_refetches_failures() {
        let mut cache = DescriptionCache::default();
        assert!(!cache.contains("posts/a.md"));

        cache.insert_from_markdown("posts/a.md", "Some prose here.");
        assert_eq!(cache.get("posts/a.md"), Some("Some prose here."));

        cache.insert_fallback("posts/b.md");
        assert_eq!(cache.get("posts/b.md"), Some(FALLBACK_DESCRIPTION));
        assert!(cache.contains("posts/b.md"));
        assert_eq!(cache.len(), 2);
    }
}
