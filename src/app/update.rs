use std::time::Instant;

use crate::app::Model;
use crate::app::model::{Article, ArticleState, CatalogState, Focus, ToastLevel};
use crate::catalog::{Catalog, Post};
use crate::fetch::FetchError;
use crate::layout::Breakpoint;

/// All possible events and actions in the application.
///
/// These represent user input, network completions, and internal
/// actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Catalog
    /// Manifest fetch finished
    CatalogLoaded(Result<Vec<Post>, FetchError>),
    /// Re-fetch the manifest
    ReloadCatalog,
    /// Excerpt fetch finished for one post
    DescriptionFetched {
        path: String,
        body: Result<String, FetchError>,
    },

    // Sidebar
    /// Move sidebar selection down
    SelectNext,
    /// Move sidebar selection up
    SelectPrev,
    /// Click on a sidebar row
    SidebarClick(usize),
    /// Scroll the sidebar list
    SidebarScrollUp,
    /// Scroll the sidebar list
    SidebarScrollDown,

    // Content
    /// Begin loading a post into the content pane
    LoadPost { path: String, title: String },
    /// Article fetch finished
    PostFetched {
        path: String,
        title: String,
        result: Result<String, FetchError>,
    },
    /// Replay the failed load shown in the error panel
    RetryLoad,
    /// Scroll content up by n lines
    ScrollUp(usize),
    /// Scroll content down by n lines
    ScrollDown(usize),
    /// Scroll content up one page
    PageUp,
    /// Scroll content down one page
    PageDown,
    /// Go to beginning of article
    GoToTop,
    /// Go to end of article
    GoToBottom,
    /// Close the Narrow-tier article overlay
    CloseOverlay,

    // TOC
    /// Show or hide the TOC modal (Narrow/Medium tiers)
    ToggleTocModal,
    /// Move TOC selection up
    TocUp,
    /// Move TOC selection down
    TocDown,
    /// Jump to the selected TOC entry
    TocSelect,
    /// Select and jump to a TOC entry by index
    TocClick(usize),
    /// Scroll the TOC list
    TocScrollUp,
    /// Scroll the TOC list
    TocScrollDown,

    // Search
    /// Enter search input mode
    StartSearch,
    /// Update the search input (filter applies after the debounce)
    SearchInput(String),
    /// Apply the pending query to the sidebar
    ApplySearch,
    /// Apply the query and leave input mode, keeping the filter
    CommitSearch,
    /// Leave search mode and restore the full listing
    ClearSearch,

    // Layout
    /// Cycle keyboard focus between visible panes
    SwitchFocus,
    /// Collapse or expand the sidebar (Wide/Large tiers)
    ToggleSidebar,
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Flip the color theme and persist the choice
    ToggleTheme,
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. The
/// few side effects (network, terminal title, config writes) live in
/// the effects layer keyed off the same messages.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Catalog
        Message::CatalogLoaded(Ok(posts)) => {
            model.catalog = CatalogState::Ready(Catalog::from_posts(posts));
            model.sidebar_scroll = 0;
            model.rebuild_sidebar_rows();
        }
        Message::CatalogLoaded(Err(error)) => {
            model.catalog = CatalogState::Failed(error);
            model.sidebar_rows.clear();
            model.sidebar_selected = None;
        }
        Message::ReloadCatalog => {
            model.catalog = CatalogState::Loading;
            model.sidebar_rows.clear();
            model.sidebar_selected = None;
            model.sidebar_scroll = 0;
        }
        Message::DescriptionFetched { path, body } => {
            model.descriptions_pending.remove(&path);
            match body {
                Ok(markdown) => model.descriptions.insert_from_markdown(&path, &markdown),
                Err(_) => model.descriptions.insert_fallback(&path),
            }
            model.rebuild_sidebar_rows();
        }

        // Sidebar
        Message::SelectNext => {
            let next = model.sidebar_selected.map_or_else(
                || model.first_selectable_row(),
                |current| model.nearest_selectable(current, true),
            );
            if let Some(next) = next {
                model.sidebar_selected = Some(next);
                let visible = sidebar_view_rows(&model);
                model.ensure_selection_visible(visible);
            }
        }
        Message::SelectPrev => {
            if let Some(current) = model.sidebar_selected
                && let Some(prev) = model.nearest_selectable(current, false)
            {
                model.sidebar_selected = Some(prev);
                let visible = sidebar_view_rows(&model);
                model.ensure_selection_visible(visible);
            }
        }
        Message::SidebarClick(index) => {
            if model
                .sidebar_rows
                .get(index)
                .is_some_and(crate::sidebar::SidebarRow::is_selectable)
            {
                model.sidebar_selected = Some(index);
            }
        }
        Message::SidebarScrollUp => {
            model.sidebar_scroll = model.sidebar_scroll.saturating_sub(1);
        }
        Message::SidebarScrollDown => {
            let max = model.sidebar_total_height().saturating_sub(1);
            model.sidebar_scroll = (model.sidebar_scroll + 1).min(max);
        }

        // Content
        Message::LoadPost { path, title } => {
            if path.trim().is_empty() {
                model.article = ArticleState::Failed {
                    path,
                    title,
                    error: FetchError::InvalidInput("path"),
                };
            } else if title.trim().is_empty() {
                model.article = ArticleState::Failed {
                    path,
                    title,
                    error: FetchError::InvalidInput("title"),
                };
            } else {
                // Mirror the active-card state in the sidebar.
                model.sidebar_selected = model
                    .sidebar_rows
                    .iter()
                    .position(|row| {
                        matches!(row, crate::sidebar::SidebarRow::Post { path: p, .. } if *p == path)
                    })
                    .or(model.sidebar_selected);
                model.article = ArticleState::Loading { path, title };
                model.focus = Focus::Content;
            }
            if model.breakpoint.uses_overlay() {
                model.overlay_visible = true;
            }
        }
        Message::PostFetched {
            path,
            title,
            result,
        } => {
            install_fetched_post(&mut model, path, title, result);
        }
        Message::RetryLoad => {
            if let Some((path, title)) = model.article.retry_target() {
                model.article = ArticleState::Loading { path, title };
            }
        }

        // Content navigation
        Message::ScrollUp(n) => {
            model.scroll_animation = None;
            model.viewport.scroll_up(n);
            model.sync_active_toc();
        }
        Message::ScrollDown(n) => {
            model.scroll_animation = None;
            model.viewport.scroll_down(n);
            model.sync_active_toc();
        }
        Message::PageUp => {
            model.scroll_animation = None;
            model.viewport.page_up();
            model.sync_active_toc();
        }
        Message::PageDown => {
            model.scroll_animation = None;
            model.viewport.page_down();
            model.sync_active_toc();
        }
        Message::GoToTop => {
            model.scroll_animation = None;
            model.viewport.go_to_top();
            model.sync_active_toc();
        }
        Message::GoToBottom => {
            model.scroll_animation = None;
            model.viewport.go_to_bottom();
            model.sync_active_toc();
        }
        Message::CloseOverlay => {
            model.overlay_visible = false;
            model.toc_modal_visible = false;
            model.focus = Focus::Sidebar;
        }

        // TOC
        Message::ToggleTocModal => {
            if model.breakpoint.has_toc_panel() || model.toc.is_empty() {
                model.toc_modal_visible = false;
            } else {
                model.toc_modal_visible = !model.toc_modal_visible;
                if model.toc_modal_visible {
                    model.toc_selected = model.toc_active.or(Some(0));
                }
            }
        }
        Message::TocUp => {
            if let Some(selected) = model.toc_selected {
                let next = selected.saturating_sub(1);
                model.toc_selected = Some(next);
                if next < model.toc_scroll {
                    model.toc_scroll = next;
                }
            } else if !model.toc.is_empty() {
                model.toc_selected = Some(0);
            }
        }
        Message::TocDown => {
            let max = model.toc.len().saturating_sub(1);
            let next = model
                .toc_selected
                .map_or(0, |selected| (selected + 1).min(max));
            if !model.toc.is_empty() {
                model.toc_selected = Some(next);
                let visible = toc_view_rows(&model);
                if visible > 0 {
                    let bottom = model.toc_scroll + visible.saturating_sub(1);
                    if next > bottom {
                        model.toc_scroll = (next + 1).saturating_sub(visible);
                    }
                }
            }
        }
        Message::TocSelect => {
            if let Some(selected) = model.toc_selected {
                model.start_toc_jump(selected, Instant::now());
                model.toc_modal_visible = false;
            }
        }
        Message::TocClick(index) => {
            if index < model.toc.len() {
                model.toc_selected = Some(index);
                model.start_toc_jump(index, Instant::now());
                model.toc_modal_visible = false;
            }
        }
        Message::TocScrollUp => {
            model.toc_scroll = model.toc_scroll.saturating_sub(1);
        }
        Message::TocScrollDown => {
            let max = model.toc.len().saturating_sub(1);
            model.toc_scroll = (model.toc_scroll + 1).min(max);
        }

        // Search
        Message::StartSearch => {
            model.search_query = Some(String::new());
            model.focus = Focus::Sidebar;
            // The search input lives in the sidebar; leave the Narrow
            // overlay so it is visible.
            if model.breakpoint.uses_overlay() {
                model.overlay_visible = false;
            }
        }
        Message::SearchInput(query) => {
            model.search_query = Some(query);
        }
        Message::ApplySearch => {
            model.applied_query = model.search_query.clone().unwrap_or_default();
            model.sidebar_scroll = 0;
            model.rebuild_sidebar_rows();
        }
        Message::CommitSearch => {
            if let Some(query) = model.search_query.take() {
                model.applied_query = query;
                model.sidebar_scroll = 0;
                model.rebuild_sidebar_rows();
            }
        }
        Message::ClearSearch => {
            model.search_query = None;
            if !model.applied_query.is_empty() {
                model.applied_query.clear();
                model.sidebar_scroll = 0;
                model.rebuild_sidebar_rows();
            }
        }

        // Layout
        Message::SwitchFocus => {
            model.focus = next_focus(&model);
        }
        Message::ToggleSidebar => {
            if model.breakpoint.has_toc_panel() {
                model.sidebar_collapsed = !model.sidebar_collapsed;
                model.apply_layout();
            }
        }
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            let next = Breakpoint::from_width(width);
            if next != model.breakpoint {
                apply_breakpoint_change(&mut model, next);
            }
            model.apply_layout();
        }

        // Application
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        // Theme flip + persistence handled in effects
        Message::ToggleTheme => {}
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}

/// Install a fetched article, or the matching error panel.
///
/// Responses land in arrival order: a stale response for an earlier
/// click is simply overwritten when the newer one arrives.
fn install_fetched_post(
    model: &mut Model,
    path: String,
    title: String,
    result: Result<String, FetchError>,
) {
    match result {
        Ok(markdown) => {
            // The article is displayed as its catalog title plus the
            // converted body, so the title becomes the first heading.
            let titled = format!("# {title}\n\n{markdown}");
            match crate::document::parse_with_layout(&titled, model.content_width()) {
                Ok(document) => {
                    let article = Article {
                        title,
                        path,
                        document,
                    };
                    model.install_outline_for(&article);
                    model.viewport.set_total_lines(article.document.line_count());
                    model.viewport.go_to_top();
                    model.scroll_animation = None;
                    model.pulse = None;
                    model.article = ArticleState::Ready(article);
                    model.sync_active_toc();
                }
                Err(err) => {
                    model.article = ArticleState::Failed {
                        path,
                        title,
                        error: FetchError::Parse(err.to_string()),
                    };
                }
            }
        }
        Err(error) => {
            model.article = ArticleState::Failed { path, title, error };
        }
    }
}

/// Breakpoint changed: adjust overlay/TOC arrangements and drop any
/// active search, as the pane set the query was typed against is gone.
fn apply_breakpoint_change(model: &mut Model, next: Breakpoint) {
    model.breakpoint = next;

    if model.search_query.is_some() || !model.applied_query.is_empty() {
        model.search_query = None;
        model.applied_query.clear();
        model.sidebar_scroll = 0;
        model.rebuild_sidebar_rows();
        model.show_toast(ToastLevel::Info, "Search cleared");
    }

    if next.uses_overlay() {
        // The overlay carries the article on Narrow; it has no TOC.
        model.overlay_visible = !model.article.is_empty();
        model.toc = crate::toc::TocOutline::default();
        model.toc_selected = None;
        model.toc_active = None;
        model.toc_modal_visible = false;
    } else {
        model.overlay_visible = false;
        if next.has_toc_panel() {
            model.toc_modal_visible = false;
        }
        // apply_layout reflows the article and rebuilds the outline.
    }
}

fn next_focus(model: &Model) -> Focus {
    if model.breakpoint.uses_overlay() {
        return if model.overlay_visible {
            Focus::Content
        } else {
            Focus::Sidebar
        };
    }
    let toc_available = model.breakpoint.has_toc_panel() && !model.toc.is_empty();
    let sidebar_available = !model.sidebar_collapsed;
    match model.focus {
        Focus::Sidebar => Focus::Content,
        Focus::Content if toc_available => Focus::Toc,
        Focus::Content | Focus::Toc => {
            if sidebar_available {
                Focus::Sidebar
            } else {
                Focus::Content
            }
        }
    }
}

/// Rows available to the sidebar list given current chrome.
fn sidebar_view_rows(model: &Model) -> usize {
    crate::ui::sidebar_view_rows(model.terminal_size.1)
}

/// Rows available to the TOC list.
fn toc_view_rows(model: &Model) -> usize {
    crate::ui::toc_view_rows(model.terminal_size.1)
}
