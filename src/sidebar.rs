//! Sidebar row construction: the category list and search results.
//!
//! Row building is pure — the catalog is never mutated — so the same
//! function serves the full listing, the filtered search view, and
//! both empty states. The renderer walks the returned rows and styles
//! them; match ranges let it highlight the found substring inline.

use std::ops::Range;

use crate::catalog::Catalog;
use crate::excerpt::DescriptionCache;

/// One renderable row of the sidebar list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarRow {
    /// `Category (count)` header above a group.
    CategoryHeader { name: String, count: usize },
    /// One selectable post entry.
    Post {
        title: String,
        path: String,
        category: String,
        /// Cached excerpt, absent while the fetch is outstanding.
        description: Option<String>,
        /// Byte range of the matched substring in `title`, when a
        /// search query matched the title.
        title_match: Option<Range<usize>>,
    },
    /// Shown when the catalog has no posts at all.
    EmptyState,
    /// Shown when a search matches nothing.
    NoResults { query: String },
}

impl SidebarRow {
    /// Whether this row can be selected and activated.
    pub const fn is_selectable(&self) -> bool {
        matches!(self, Self::Post { .. })
    }
}

/// Build the sidebar rows for the current catalog, query and cache.
///
/// An empty (or blank) query produces the full listing; a non-empty
/// query filters posts by case-insensitive substring match on title OR
/// category, keeping category grouping and post order intact.
pub fn build_rows(
    catalog: &Catalog,
    query: &str,
    descriptions: &DescriptionCache,
) -> Vec<SidebarRow> {
    let query = query.trim();
    if query.is_empty() {
        return all_rows(catalog, descriptions);
    }

    let needle = query.to_lowercase();
    let mut rows = Vec::new();
    for (category, posts) in catalog.groups() {
        let category_matches = category.to_lowercase().contains(&needle);
        let matching: Vec<_> = posts
            .iter()
            .filter(|post| category_matches || post.title.to_lowercase().contains(&needle))
            .collect();
        if matching.is_empty() {
            continue;
        }
        rows.push(SidebarRow::CategoryHeader {
            name: category.clone(),
            count: matching.len(),
        });
        for post in matching {
            rows.push(SidebarRow::Post {
                title: post.title.clone(),
                path: post.path.clone(),
                category: post.category.clone(),
                description: descriptions.get(&post.path).map(ToString::to_string),
                title_match: find_match(&post.title, &needle),
            });
        }
    }

    if rows.is_empty() {
        rows.push(SidebarRow::NoResults {
            query: query.to_string(),
        });
    }
    rows
}

fn all_rows(catalog: &Catalog, descriptions: &DescriptionCache) -> Vec<SidebarRow> {
    if catalog.is_empty() {
        return vec![SidebarRow::EmptyState];
    }
    let mut rows = Vec::new();
    for (category, posts) in catalog.groups() {
        rows.push(SidebarRow::CategoryHeader {
            name: category.clone(),
            count: posts.len(),
        });
        for post in posts {
            rows.push(SidebarRow::Post {
                title: post.title.clone(),
                path: post.path.clone(),
                category: post.category.clone(),
                description: descriptions.get(&post.path).map(ToString::to_string),
                title_match: None,
            });
        }
    }
    rows
}

/// Byte range of the first case-insensitive occurrence of `needle`
/// (already lowercased) in `haystack`.
fn find_match(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    let lowered = haystack.to_lowercase();
    // Lowercasing can change byte lengths for non-ASCII text; only
    // return a range that is valid against the original string.
    let start = lowered.find(needle)?;
    let end = start + needle.len();
    if haystack.is_char_boundary(start) && haystack.is_char_boundary(end) && end <= haystack.len() {
        Some(start..end)
    } else {
        None
    }
}
