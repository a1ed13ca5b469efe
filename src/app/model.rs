use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::catalog::Catalog;
use crate::document::Document;
use crate::excerpt::DescriptionCache;
use crate::fetch::FetchError;
use crate::layout::Breakpoint;
use crate::sidebar::{self, SidebarRow};
use crate::toc::{HighlightPulse, ScrollAnimation, TocOutline};
use crate::ui::viewport::Viewport;

/// Severity of a transient status notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
    Toc,
}

/// Lifecycle of the post catalog.
#[derive(Debug, Clone)]
pub enum CatalogState {
    Loading,
    Ready(Catalog),
    Failed(FetchError),
}

/// A successfully loaded article.
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub path: String,
    pub document: Document,
}

/// Lifecycle of the content pane.
#[derive(Debug, Clone)]
pub enum ArticleState {
    /// Nothing selected yet; the pane shows a welcome hint.
    Empty,
    Loading {
        path: String,
        title: String,
    },
    Ready(Article),
    Failed {
        path: String,
        title: String,
        error: FetchError,
    },
}

impl ArticleState {
    /// Whether any article interaction has happened.
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Path and title to replay for the retry action.
    pub fn retry_target(&self) -> Option<(String, String)> {
        match self {
            Self::Failed { path, title, .. } => Some((path.clone(), title.clone())),
            _ => None,
        }
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Display name of the site (terminal title, status bar)
    pub site_name: String,
    /// Catalog lifecycle
    pub catalog: CatalogState,
    /// Memoized post descriptions
    pub descriptions: DescriptionCache,
    /// Description fetches currently in flight
    pub descriptions_pending: HashSet<String>,
    /// Rendered sidebar rows (rebuilt from catalog + query + cache)
    pub sidebar_rows: Vec<SidebarRow>,
    /// Selected sidebar row index
    pub sidebar_selected: Option<usize>,
    /// Sidebar scroll offset in display rows
    pub sidebar_scroll: usize,
    /// Whether the sidebar is collapsed (Wide/Large only)
    pub sidebar_collapsed: bool,
    /// Active search input; `None` when not searching
    pub search_query: Option<String>,
    /// Query the current rows were built with
    pub applied_query: String,
    /// Content pane lifecycle
    pub article: ArticleState,
    /// Viewport of whichever pane shows the article
    pub viewport: Viewport,
    /// Outline of the current article
    pub toc: TocOutline,
    /// Keyboard selection in the TOC list
    pub toc_selected: Option<usize>,
    /// Scroll-synchronized active entry
    pub toc_active: Option<usize>,
    /// TOC list scroll offset
    pub toc_scroll: usize,
    /// TOC modal (Narrow/Medium tiers)
    pub toc_modal_visible: bool,
    /// Full-screen article overlay (Narrow tier)
    pub overlay_visible: bool,
    /// In-flight eased scroll, if any
    pub scroll_animation: Option<ScrollAnimation>,
    /// Post-jump highlight pulse, if any
    pub pulse: Option<HighlightPulse>,
    /// Current responsive tier
    pub breakpoint: Breakpoint,
    /// Last known terminal size
    pub terminal_size: (u16, u16),
    /// Focused pane
    pub focus: Focus,
    /// Help overlay
    pub help_visible: bool,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("site_name", &self.site_name)
            .field("breakpoint", &self.breakpoint)
            .field("focus", &self.focus)
            .field("sidebar_rows", &self.sidebar_rows.len())
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a new model for a terminal of the given size.
    pub fn new(site_name: String, terminal_size: (u16, u16)) -> Self {
        let breakpoint = Breakpoint::from_width(terminal_size.0);
        Self {
            site_name,
            catalog: CatalogState::Loading,
            descriptions: DescriptionCache::default(),
            descriptions_pending: HashSet::new(),
            sidebar_rows: Vec::new(),
            sidebar_selected: None,
            sidebar_scroll: 0,
            sidebar_collapsed: false,
            search_query: None,
            applied_query: String::new(),
            article: ArticleState::Empty,
            viewport: Viewport::new(
                terminal_size.0,
                terminal_size.1.saturating_sub(1),
                0,
            ),
            toc: TocOutline::default(),
            toc_selected: None,
            toc_active: None,
            toc_scroll: 0,
            toc_modal_visible: false,
            overlay_visible: false,
            scroll_animation: None,
            pulse: None,
            breakpoint,
            terminal_size,
            focus: Focus::Sidebar,
            help_visible: false,
            toast: None,
            should_quit: false,
        }
    }

    /// The catalog, when loaded.
    pub const fn catalog_ready(&self) -> Option<&Catalog> {
        match &self.catalog {
            CatalogState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    /// The loaded article, when present.
    pub const fn current_article(&self) -> Option<&Article> {
        match &self.article {
            ArticleState::Ready(article) => Some(article),
            _ => None,
        }
    }

    /// Rebuild sidebar rows from the catalog, applied query and
    /// description cache, keeping the selection on the same post when
    /// it survives the rebuild.
    pub fn rebuild_sidebar_rows(&mut self) {
        let previous_path = self.selected_post().map(|(path, _)| path);
        let rows = match self.catalog_ready() {
            Some(catalog) => sidebar::build_rows(catalog, &self.applied_query, &self.descriptions),
            None => {
                self.sidebar_rows.clear();
                self.sidebar_selected = None;
                return;
            }
        };
        self.sidebar_rows = rows;

        self.sidebar_selected = previous_path
            .and_then(|path| {
                self.sidebar_rows.iter().position(
                    |row| matches!(row, SidebarRow::Post { path: p, .. } if *p == path),
                )
            })
            .or_else(|| self.first_selectable_row());
        self.clamp_sidebar_scroll();
    }

    /// Path and title of the selected sidebar post.
    pub fn selected_post(&self) -> Option<(String, String)> {
        let index = self.sidebar_selected?;
        match self.sidebar_rows.get(index)? {
            SidebarRow::Post { path, title, .. } => Some((path.clone(), title.clone())),
            _ => None,
        }
    }

    pub fn first_selectable_row(&self) -> Option<usize> {
        self.sidebar_rows.iter().position(SidebarRow::is_selectable)
    }

    /// Next selectable row after `from` in the given direction.
    pub fn nearest_selectable(&self, from: usize, forward: bool) -> Option<usize> {
        if forward {
            self.sidebar_rows
                .iter()
                .enumerate()
                .skip(from + 1)
                .find(|(_, row)| row.is_selectable())
                .map(|(i, _)| i)
        } else {
            self.sidebar_rows
                .iter()
                .enumerate()
                .take(from)
                .rev()
                .find(|(_, row)| row.is_selectable())
                .map(|(i, _)| i)
        }
    }

    /// Display height of a sidebar row (posts carry a description line).
    pub fn sidebar_row_height(row: &SidebarRow) -> usize {
        match row {
            SidebarRow::CategoryHeader { .. } => 1,
            SidebarRow::Post { .. } | SidebarRow::EmptyState | SidebarRow::NoResults { .. } => 2,
        }
    }

    /// Display row where `row_index` starts.
    pub fn sidebar_row_top(&self, row_index: usize) -> usize {
        self.sidebar_rows
            .iter()
            .take(row_index)
            .map(Self::sidebar_row_height)
            .sum()
    }

    /// Total display rows of the sidebar list.
    pub fn sidebar_total_height(&self) -> usize {
        self.sidebar_rows
            .iter()
            .map(Self::sidebar_row_height)
            .sum()
    }

    /// Keep the selected row inside `visible_rows` of the sidebar.
    pub fn ensure_selection_visible(&mut self, visible_rows: usize) {
        let Some(selected) = self.sidebar_selected else {
            return;
        };
        if visible_rows == 0 {
            return;
        }
        let top = self.sidebar_row_top(selected);
        let height = self
            .sidebar_rows
            .get(selected)
            .map_or(1, Self::sidebar_row_height);
        if top < self.sidebar_scroll {
            self.sidebar_scroll = top;
        } else if top + height > self.sidebar_scroll + visible_rows {
            self.sidebar_scroll = (top + height).saturating_sub(visible_rows);
        }
        self.clamp_sidebar_scroll();
    }

    fn clamp_sidebar_scroll(&mut self) {
        let total = self.sidebar_total_height();
        self.sidebar_scroll = self.sidebar_scroll.min(total.saturating_sub(1));
    }

    /// Row index whose display span contains `display_row` (used for
    /// mouse hit testing in the sidebar list).
    pub fn sidebar_row_at_display(&self, display_row: usize) -> Option<usize> {
        let mut top = 0usize;
        for (index, row) in self.sidebar_rows.iter().enumerate() {
            let height = Self::sidebar_row_height(row);
            if display_row < top + height {
                return Some(index);
            }
            top += height;
        }
        None
    }

    /// Whether the TOC hint is offered (Narrow/Medium with an outline).
    pub fn toc_hint_visible(&self) -> bool {
        !self.breakpoint.has_toc_panel() && !self.toc.is_empty()
    }

    /// Width the article is wrapped to, given the current layout.
    pub fn content_width(&self) -> u16 {
        crate::ui::content_pane_width(
            self.terminal_size.0,
            self.breakpoint,
            self.sidebar_collapsed,
        )
    }

    /// Recompute pane geometry after a resize or layout toggle.
    ///
    /// Reflows the loaded article to the new content width and rebuilds
    /// the outline, since wrapping moves heading rows.
    pub fn apply_layout(&mut self) {
        let height = self.terminal_size.1;
        self.viewport
            .resize(self.content_width(), height.saturating_sub(1));

        if let ArticleState::Ready(article) = &self.article {
            let source = article.document.source().to_string();
            let title = article.title.clone();
            let path = article.path.clone();
            if let Ok(document) =
                crate::document::parse_with_layout(&source, self.content_width())
            {
                let article = Article {
                    title,
                    path,
                    document,
                };
                self.install_outline_for(&article);
                self.viewport
                    .set_total_lines(article.document.line_count());
                self.article = ArticleState::Ready(article);
            }
        }
        self.sync_active_toc();
    }

    /// Build (or skip) the outline for an article per the current tier.
    ///
    /// The Narrow overlay carries no TOC; wider tiers scan all heading
    /// levels.
    pub fn install_outline_for(&mut self, article: &Article) {
        if self.breakpoint.uses_overlay() {
            self.toc = TocOutline::default();
        } else {
            self.toc = TocOutline::build(&article.document);
        }
        self.toc_selected = None;
        self.toc_active = None;
        self.toc_scroll = 0;
    }

    /// Recompute the scroll-synchronized active TOC entry.
    pub fn sync_active_toc(&mut self) {
        self.toc_active = self.toc.active_entry(
            self.viewport.offset(),
            self.viewport.height() as usize,
            self.viewport.total_lines(),
            self.breakpoint,
        );
    }

    /// Start an eased scroll toward a TOC entry.
    pub fn start_toc_jump(&mut self, index: usize, now: Instant) {
        let Some(entry) = self.toc.entry(index) else {
            return;
        };
        let target_line = entry.line;
        let margin = self.breakpoint.scroll_margin();
        let target = target_line
            .saturating_sub(margin)
            .min(self.viewport.max_offset());
        if self.viewport.offset().abs_diff(target) <= 1 {
            // Already there; just pulse and re-sync.
            self.viewport.set_offset(target);
            self.pulse = Some(HighlightPulse::new(target_line, now));
            self.sync_active_toc();
            return;
        }
        self.scroll_animation = Some(ScrollAnimation::new(self.viewport.offset(), target, now));
    }

    /// Advance animation and expiries. Returns true when a repaint is
    /// needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut dirty = false;

        if let Some(animation) = self.scroll_animation {
            self.viewport.set_offset(animation.position_at(now));
            dirty = true;
            if animation.is_finished(now) {
                self.scroll_animation = None;
                let target = animation.target();
                let margin = self.breakpoint.scroll_margin();
                let heading_line = target + margin;
                let pulse_line = self
                    .toc
                    .entries()
                    .iter()
                    .map(|entry| entry.line)
                    .find(|line| *line >= target && *line <= heading_line + 1)
                    .unwrap_or(heading_line);
                self.pulse = Some(HighlightPulse::new(pulse_line, now));
                self.sync_active_toc();
            }
        }

        if self.pulse.is_some_and(|pulse| pulse.is_expired(now)) {
            self.pulse = None;
            dirty = true;
        }

        if self.expire_toast(now) {
            dirty = true;
        }

        dirty
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new(String::new(), (80, 24))
    }
}
