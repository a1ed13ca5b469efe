//! Table-of-contents engine.
//!
//! Built fresh for every loaded article: scans the parsed document's
//! headings, assigns each a stable unique id, and keeps the active
//! entry synchronized with the scroll position. Jumps to headings are
//! animated with an eased, time-based interpolation and finish with a
//! short highlight pulse on the target row.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::document::Document;
use crate::layout::Breakpoint;

/// Rows from the very top within which no entry is active.
const TOP_SLACK_ROWS: usize = 2;
/// Rows of slack at the very bottom that force the last entry active.
const BOTTOM_SLACK_ROWS: usize = 2;

/// Longest id derived from heading text.
const MAX_ID_LEN: usize = 50;

/// One TOC-eligible heading with a stable unique id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub text: String,
    pub id: String,
    pub level: u8,
    /// Line of the heading row in the rendered document.
    pub line: usize,
}

/// The navigable outline of the currently displayed article.
#[derive(Debug, Clone, Default)]
pub struct TocOutline {
    entries: Vec<TocEntry>,
}

impl TocOutline {
    /// Build an outline from a parsed document.
    ///
    /// Parser-assigned anchor ids are reused; headings without one get
    /// an id derived from their text. Uniqueness within the outline is
    /// enforced with numeric suffixes.
    pub fn build(document: &Document) -> Self {
        let mut used: HashSet<String> = HashSet::new();
        let entries = document
            .headings()
            .iter()
            .enumerate()
            .map(|(index, heading)| {
                let base = heading
                    .id
                    .clone()
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| derive_heading_id(&heading.text, index));
                let id = unique_id(&base, &used);
                used.insert(id.clone());
                TocEntry {
                    text: heading.text.clone(),
                    id,
                    level: heading.level,
                    line: heading.line,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&TocEntry> {
        self.entries.get(index)
    }

    /// Index of the entry whose target id matches.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Resolve an id to an entry index, falling back to an exact text
    /// match when the id no longer exists (content changed under the
    /// outline). A text-matched entry is relabeled with a fresh id
    /// derived by the usual rule.
    pub fn resolve_or_relabel(&mut self, id: &str) -> Option<usize> {
        if let Some(index) = self.position_of(id) {
            return Some(index);
        }
        let target_text = id.trim();
        let index = self
            .entries
            .iter()
            .position(|entry| entry.text.trim() == target_text)?;
        let used: HashSet<String> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| e.id.clone())
            .collect();
        let fresh = unique_id(&derive_heading_id(target_text, index), &used);
        self.entries[index].id = fresh;
        Some(index)
    }

    /// Which entry is active for the current scroll position.
    ///
    /// The effective position is the scroll offset plus a breakpoint-
    /// dependent allowance for chrome above the content. At the very
    /// top nothing is active; within the bottom slack the last entry
    /// is forced (and wins over the top case).
    pub fn active_entry(
        &self,
        offset: usize,
        viewport_height: usize,
        total_lines: usize,
        breakpoint: Breakpoint,
    ) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        if offset + viewport_height + BOTTOM_SLACK_ROWS >= total_lines {
            return Some(self.entries.len() - 1);
        }
        if offset <= TOP_SLACK_ROWS {
            return None;
        }
        let effective = offset + breakpoint.highlight_allowance();
        let after = self.entries.partition_point(|entry| entry.line <= effective);
        if after == 0 { None } else { Some(after - 1) }
    }
}

/// Derive a URL-style id from heading text.
///
/// Lowercases, strips leading list numbering ("6) ", "6. "), removes
/// everything but word characters, spaces and hyphens, collapses
/// whitespace and underscores to hyphens, and trims to [`MAX_ID_LEN`].
/// Falls back to `heading-<index>` when too little survives.
pub fn derive_heading_id(text: &str, index: usize) -> String {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();
    let without_numbering = strip_leading_numbering(trimmed);

    let mut id = String::new();
    let mut pending_hyphen = false;
    for ch in without_numbering.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !id.is_empty() {
                id.push('-');
            }
            pending_hyphen = false;
            id.push(ch);
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_hyphen = true;
        }
        // Other punctuation is dropped without forcing a hyphen.
    }

    let id: String = id.chars().take(MAX_ID_LEN).collect();
    let id = id.trim_matches('-').to_string();
    if id.chars().count() < 2 {
        format!("heading-{index}")
    } else {
        id
    }
}

/// Strip a leading "6) " or "6. " list numbering.
fn strip_leading_numbering(text: &str) -> &str {
    let digits = text.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return text;
    }
    let rest = &text[digits..];
    rest.strip_prefix(')')
        .or_else(|| rest.strip_prefix('.'))
        .map_or(text, str::trim_start)
}

/// Append `-1`, `-2`, … until the id is unused.
fn unique_id(base: &str, used: &HashSet<String>) -> String {
    if !used.contains(base) {
        return base.to_string();
    }
    let mut counter = 1usize;
    loop {
        let candidate = format!("{base}-{counter}");
        if !used.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// A brief visual pulse on a heading row after a TOC jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightPulse {
    pub line: usize,
    pub expires_at: Instant,
}

impl HighlightPulse {
    const DURATION: Duration = Duration::from_millis(1500);

    pub fn new(line: usize, now: Instant) -> Self {
        Self {
            line,
            expires_at: now + Self::DURATION,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Eased scroll between two offsets.
///
/// Duration scales with distance, bounded to a sane range, so short
/// hops feel immediate and long ones stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollAnimation {
    from: usize,
    to: usize,
    started: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    const MIN_DURATION_MS: u64 = 200;
    const MAX_DURATION_MS: u64 = 800;
    const MS_PER_ROW: u64 = 12;

    pub fn new(from: usize, to: usize, now: Instant) -> Self {
        let distance = from.abs_diff(to) as u64;
        let duration_ms =
            (distance * Self::MS_PER_ROW).clamp(Self::MIN_DURATION_MS, Self::MAX_DURATION_MS);
        Self {
            from,
            to,
            started: now,
            duration: Duration::from_millis(duration_ms),
        }
    }

    pub const fn target(&self) -> usize {
        self.to
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.duration
    }

    /// Interpolated offset at `now`.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn position_at(&self, now: Instant) -> usize {
        let elapsed = now.duration_since(self.started).as_secs_f64();
        let progress = (elapsed / self.duration.as_secs_f64()).min(1.0);
        let eased = ease_in_out_cubic(progress);
        if self.to >= self.from {
            let span = (self.to - self.from) as f64;
            self.from + (span * eased).round() as usize
        } else {
            let span = (self.from - self.to) as f64;
            self.from - (span * eased).round() as usize
        }
    }
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let back = 2.0_f64.mul_add(t, -2.0);
        (back * back).mul_add(t - 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn outline_for(markdown: &str) -> TocOutline {
        TocOutline::build(&Document::parse(markdown).unwrap())
    }

    #[test]
    fn test_derive_id_basic_slug() {
        assert_eq!(derive_heading_id("Intro", 0), "intro");
        assert_eq!(derive_heading_id("Service Account Hygiene", 1), "service-account-hygiene");
    }

    #[test]
    fn test_derive_id_strips_leading_numbering() {
        assert_eq!(derive_heading_id("6) Rebuild topology", 0), "rebuild-topology");
        assert_eq!(derive_heading_id("6. Rebuild topology", 0), "rebuild-topology");
        assert_eq!(derive_heading_id("2024 in review", 0), "2024-in-review");
    }

    #[test]
    fn test_derive_id_collapses_whitespace_and_underscores() {
        assert_eq!(derive_heading_id("a  tale_of   two  DCs", 0), "a-tale-of-two-dcs");
    }

    #[test]
    fn test_derive_id_drops_punctuation() {
        assert_eq!(derive_heading_id("What's next?", 0), "whats-next");
    }

    #[test]
    fn test_derive_id_truncates_to_fifty_chars() {
        let long = "x".repeat(80);
        assert_eq!(derive_heading_id(&long, 0).chars().count(), 50);
    }

    #[test]
    fn test_derive_id_falls_back_when_too_short() {
        assert_eq!(derive_heading_id("!!", 3), "heading-3");
        assert_eq!(derive_heading_id("", 0), "heading-0");
        assert_eq!(derive_heading_id("a", 7), "heading-7");
    }

    #[test]
    fn test_derive_id_is_idempotent_without_collisions() {
        let first = derive_heading_id("Rebuild topology", 0);
        let second = derive_heading_id("Rebuild topology", 0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_headings_get_suffixed_ids() {
        let outline = outline_for("# Setup\n\na\n\n# Setup\n\nb\n\n# Setup\n\nc\n");
        let ids: Vec<&str> = outline.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1", "setup-2"]);
    }

    #[test]
    fn test_build_matches_expected_catalog_scenario() {
        let outline = outline_for("# Intro\n\nbody\n\n## 6) Rebuild topology\n\nbody\n");
        let ids: Vec<&str> = outline.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["intro", "rebuild-topology"]);
        assert_eq!(outline.entries()[0].level, 1);
        assert_eq!(outline.entries()[1].level, 2);
    }

    #[test]
    fn test_resolve_or_relabel_prefers_exact_id() {
        let mut outline = outline_for("# Intro\n\nbody\n\n## Details\n\nbody\n");
        assert_eq!(outline.resolve_or_relabel("details"), Some(1));
    }

    #[test]
    fn test_resolve_or_relabel_falls_back_to_text_match() {
        let mut outline = outline_for("# Intro\n\nbody\n\n## Details\n\nbody\n");
        // Simulate an id invalidated by a content change.
        outline.entries[1].id = "stale-anchor".to_string();
        let index = outline.resolve_or_relabel("Details").unwrap();
        assert_eq!(index, 1);
        assert_eq!(outline.entries()[1].id, "details");
    }

    #[test]
    fn test_resolve_or_relabel_unknown_target() {
        let mut outline = outline_for("# Intro\n\nbody\n");
        assert!(outline.resolve_or_relabel("nowhere").is_none());
    }

    #[test]
    fn test_active_entry_none_at_top() {
        let outline = outline_for("# One\n\nbody\n\n# Two\n\nbody\n");
        assert_eq!(outline.active_entry(0, 10, 100, Breakpoint::Wide), None);
        assert_eq!(outline.active_entry(2, 10, 100, Breakpoint::Wide), None);
    }

    #[test]
    fn test_active_entry_walks_headings_in_order() {
        // Headings at known lines: build a doc with enough body to spread.
        let mut md = String::new();
        for i in 1..=4 {
            md.push_str(&format!("# Section {i}\n\n"));
            md.push_str(&"body line\n\n".repeat(10));
        }
        let outline = outline_for(&md);
        let lines: Vec<usize> = outline.entries().iter().map(|e| e.line).collect();
        let offset = lines[2].saturating_sub(Breakpoint::Wide.highlight_allowance()) + 1;
        let active = outline.active_entry(offset, 10, 1000, Breakpoint::Wide);
        assert_eq!(active, Some(2));
    }

    #[test]
    fn test_active_entry_forces_last_near_bottom() {
        let mut md = String::new();
        for i in 1..=3 {
            md.push_str(&format!("# Section {i}\n\n"));
            md.push_str(&"body line\n\n".repeat(5));
        }
        let outline = outline_for(&md);
        let total = 60usize;
        // Offsets within the bottom slack always select the last entry.
        let offset = total - 10 - 1;
        assert_eq!(
            outline.active_entry(offset, 10, total, Breakpoint::Medium),
            Some(outline.len() - 1)
        );
    }

    #[test]
    fn test_active_entry_bottom_wins_over_top_in_short_documents() {
        let outline = outline_for("# Only\n\nbody\n");
        // Whole document fits the viewport: bottom rule applies at offset 0.
        assert_eq!(outline.active_entry(0, 24, 3, Breakpoint::Wide), Some(0));
    }

    #[test]
    fn test_active_entry_empty_outline() {
        let outline = TocOutline::default();
        assert_eq!(outline.active_entry(5, 10, 100, Breakpoint::Wide), None);
    }

    #[test]
    fn test_animation_duration_bounds() {
        let now = Instant::now();
        let short = ScrollAnimation::new(0, 1, now);
        assert_eq!(short.position_at(now), 0);
        assert!(short.is_finished(now + Duration::from_millis(250)));

        let long = ScrollAnimation::new(0, 5000, now);
        assert!(!long.is_finished(now + Duration::from_millis(700)));
        assert!(long.is_finished(now + Duration::from_millis(850)));
    }

    #[test]
    fn test_animation_lands_exactly_on_target() {
        let now = Instant::now();
        let anim = ScrollAnimation::new(10, 90, now);
        assert_eq!(anim.position_at(now + Duration::from_secs(2)), 90);
        let back = ScrollAnimation::new(90, 10, now);
        assert_eq!(back.position_at(now + Duration::from_secs(2)), 10);
    }

    #[test]
    fn test_animation_moves_monotonically_forward() {
        let now = Instant::now();
        let anim = ScrollAnimation::new(0, 100, now);
        let mut last = 0;
        for ms in (0..=1000).step_by(50) {
            let pos = anim.position_at(now + Duration::from_millis(ms));
            assert!(pos >= last, "position went backwards at {ms}ms");
            last = pos;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_pulse_expires() {
        let now = Instant::now();
        let pulse = HighlightPulse::new(12, now);
        assert!(!pulse.is_expired(now));
        assert!(pulse.is_expired(now + Duration::from_secs(2)));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn derived_ids_are_valid(text in ".{0,200}", index in 0..1000usize) {
                let id = derive_heading_id(&text, index);
                prop_assert!(!id.is_empty());
                prop_assert!(id.chars().count() >= 2);
                prop_assert!(!id.starts_with('-') && !id.ends_with('-'));
                prop_assert!(id.chars().all(|c| c.is_alphanumeric() || c == '-'));
            }

            #[test]
            fn unique_id_never_collides(
                base in "[a-z]{1,8}",
                taken in proptest::collection::hash_set("[a-z]{1,8}(-[0-9])?", 0..20),
            ) {
                let id = unique_id(&base, &taken);
                prop_assert!(!taken.contains(&id));
            }
        }
    }
}
