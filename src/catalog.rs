//! The post catalog: manifest parsing and category grouping.
//!
//! The manifest is a JSON array of `{title, path, category}` objects.
//! Entries missing any field are dropped individually; the survivors
//! are grouped by category. The catalog is rebuilt wholesale on every
//! manifest fetch and never mutated in place.

use serde::Deserialize;

use crate::fetch::FetchError;

/// One published post as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub path: String,
    pub category: String,
}

/// Raw manifest entry; every field optional so one malformed entry
/// cannot sink the whole payload.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    title: Option<String>,
    path: Option<String>,
    category: Option<String>,
}

impl ManifestEntry {
    fn into_post(self) -> Option<Post> {
        let title = self.title.filter(|s| !s.trim().is_empty())?;
        let path = self.path.filter(|s| !s.trim().is_empty())?;
        let category = self.category.filter(|s| !s.trim().is_empty())?;
        Some(Post {
            title,
            path,
            category,
        })
    }
}

/// Posts grouped by category.
///
/// Categories are sorted lexicographically for display; within each
/// category the manifest's insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    groups: Vec<(String, Vec<Post>)>,
}

impl Catalog {
    /// Group valid posts by category.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let mut groups: Vec<(String, Vec<Post>)> = Vec::new();
        for post in posts {
            match groups.iter_mut().find(|(name, _)| *name == post.category) {
                Some((_, members)) => members.push(post),
                None => groups.push((post.category.clone(), vec![post])),
            }
        }
        groups.sort_by(|(a, _), (b, _)| a.cmp(b));
        Self { groups }
    }

    /// Category groups in display order.
    pub fn groups(&self) -> &[(String, Vec<Post>)] {
        &self.groups
    }

    /// Total number of posts across all categories.
    pub fn post_count(&self) -> usize {
        self.groups.iter().map(|(_, posts)| posts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All posts in display order (grouped, insertion order kept).
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.groups.iter().flat_map(|(_, posts)| posts.iter())
    }

    /// Look up a post by its path.
    pub fn find(&self, path: &str) -> Option<&Post> {
        self.posts().find(|post| post.path == path)
    }
}

/// Parse manifest JSON into validated posts.
///
/// # Errors
///
/// Returns [`FetchError::Data`] when the payload is not a JSON array.
/// Individually malformed entries are dropped, not fatal.
pub fn parse_manifest(json: &str) -> Result<Vec<Post>, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|err| FetchError::Data(err.to_string()))?;
    let serde_json::Value::Array(items) = value else {
        return Err(FetchError::Data("manifest is not an array".to_string()));
    };

    let total = items.len();
    let posts: Vec<Post> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<ManifestEntry>(item).ok())
        .filter_map(ManifestEntry::into_post)
        .collect();
    if posts.len() < total {
        tracing::warn!(
            dropped = total - posts.len(),
            kept = posts.len(),
            "manifest contained invalid entries"
        );
    }
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, path: &str, category: &str) -> Post {
        Post {
            title: title.to_string(),
            path: path.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_grouping_preserves_insertion_order_within_category() {
        let catalog = Catalog::from_posts(vec![
            post("Zeta", "posts/z.md", "Ops"),
            post("Alpha", "posts/a.md", "Ops"),
            post("Mid", "posts/m.md", "Ops"),
        ]);
        let (_, members) = &catalog.groups()[0];
        let titles: Vec<&str> = members.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_grouping_yields_one_group_per_distinct_category() {
        let catalog = Catalog::from_posts(vec![
            post("One", "posts/1.md", "Attacks"),
            post("Two", "posts/2.md", "Defense"),
            post("Three", "posts/3.md", "Attacks"),
        ]);
        assert_eq!(catalog.groups().len(), 2);
        assert_eq!(catalog.post_count(), 3);
    }

    #[test]
    fn test_categories_sorted_lexicographically() {
        let catalog = Catalog::from_posts(vec![
            post("One", "posts/1.md", "Zoology"),
            post("Two", "posts/2.md", "Attacks"),
            post("Three", "posts/3.md", "Misc"),
        ]);
        let names: Vec<&str> = catalog
            .groups()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["Attacks", "Misc", "Zoology"]);
    }

    #[test]
    fn test_parse_manifest_drops_entries_missing_fields() {
        let json = r#"[
            {"title": "Good", "path": "posts/good.md", "category": "Ops"},
            {"title": "No path", "category": "Ops"},
            {"path": "posts/untitled.md", "category": "Ops"},
            {"title": "  ", "path": "posts/blank.md", "category": "Ops"},
            {"title": "Also good", "path": "posts/also.md", "category": "Misc"}
        ]"#;
        let posts = parse_manifest(json).unwrap();
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Good", "Also good"]);
    }

    #[test]
    fn test_parse_manifest_rejects_non_array_payload() {
        let err = parse_manifest(r#"{"title": "not a list"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Data(_)));
    }

    #[test]
    fn test_parse_manifest_rejects_invalid_json() {
        let err = parse_manifest("not json at all").unwrap_err();
        assert!(matches!(err, FetchError::Data(_)));
    }

    #[test]
    fn test_parse_manifest_tolerates_non_object_entries() {
        let json = r#"[42, {"title": "Good", "path": "p.md", "category": "C"}, null]"#;
        let posts = parse_manifest(json).unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_find_by_path() {
        let catalog = Catalog::from_posts(vec![post("One", "posts/1.md", "Ops")]);
        assert_eq!(catalog.find("posts/1.md").unwrap().title, "One");
        assert!(catalog.find("posts/2.md").is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_posts(Vec::new());
        assert!(catalog.is_empty());
        assert_eq!(catalog.post_count(), 0);
    }
}
