use crossterm::event::{self, Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::model::{ArticleState, Focus};
use crate::app::{App, Message, Model};
use crate::sidebar::SidebarRow;

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: event::KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            let _ = key;
            return Some(Message::HideHelp);
        }

        // Search input mode captures typing.
        if let Some(active_query) = model.search_query.as_ref() {
            return match key.code {
                KeyCode::Esc => Some(Message::ClearSearch),
                KeyCode::Enter => Some(Message::CommitSearch),
                KeyCode::Backspace => {
                    let mut next = active_query.clone();
                    next.pop();
                    Some(Message::SearchInput(next))
                }
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT) =>
                {
                    let mut next = active_query.clone();
                    next.push(c);
                    Some(Message::SearchInput(next))
                }
                _ => None,
            };
        }

        // TOC modal captures navigation while open.
        if model.toc_modal_visible {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::TocDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::TocUp),
                KeyCode::Enter | KeyCode::Char(' ') => Some(Message::TocSelect),
                KeyCode::Esc | KeyCode::Char('t') => Some(Message::ToggleTocModal),
                KeyCode::Char('q') => Some(Message::Quit),
                _ => None,
            };
        }

        // Global bindings.
        match key.code {
            KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Message::StartSearch);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Message::Quit);
            }
            KeyCode::Char('/') => return Some(Message::StartSearch),
            KeyCode::Char('q') => return Some(Message::Quit),
            KeyCode::Char('?') | KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::Char('D') => return Some(Message::ToggleTheme),
            KeyCode::Char('R') => return Some(Message::ReloadCatalog),
            KeyCode::Char('s') => return Some(Message::ToggleSidebar),
            KeyCode::Char('t') => return Some(Message::ToggleTocModal),
            KeyCode::Tab => return Some(Message::SwitchFocus),
            KeyCode::Esc => {
                if model.breakpoint.uses_overlay() && model.overlay_visible {
                    return Some(Message::CloseOverlay);
                }
                if !model.applied_query.is_empty() {
                    return Some(Message::ClearSearch);
                }
                return None;
            }
            KeyCode::Backspace => {
                if model.breakpoint.uses_overlay() && model.overlay_visible {
                    return Some(Message::CloseOverlay);
                }
                return None;
            }
            _ => {}
        }

        Self::handle_pane_key(key, model)
    }

    /// Focus-dependent bindings.
    fn handle_pane_key(key: event::KeyEvent, model: &Model) -> Option<Message> {
        let reading = model.focus == Focus::Content
            || (model.breakpoint.uses_overlay() && model.overlay_visible);

        if reading {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    if model.viewport.can_scroll_down() {
                        Some(Message::ScrollDown(1))
                    } else {
                        None
                    }
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    if model.viewport.can_scroll_up() {
                        Some(Message::ScrollUp(1))
                    } else {
                        None
                    }
                }
                KeyCode::Char(' ') | KeyCode::PageDown => {
                    if model.viewport.can_scroll_down() {
                        Some(Message::PageDown)
                    } else {
                        None
                    }
                }
                KeyCode::Char('b') | KeyCode::PageUp => {
                    if model.viewport.can_scroll_up() {
                        Some(Message::PageUp)
                    } else {
                        None
                    }
                }
                KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
                KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),
                KeyCode::Char('r') => {
                    if matches!(model.article, ArticleState::Failed { .. }) {
                        Some(Message::RetryLoad)
                    } else {
                        None
                    }
                }
                _ => None,
            };
        }

        if model.focus == Focus::Toc {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::TocDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::TocUp),
                KeyCode::Enter | KeyCode::Char(' ') => Some(Message::TocSelect),
                _ => None,
            };
        }

        // Sidebar focus
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Message::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::SelectPrev),
            KeyCode::Enter => {
                let (path, title) = model.selected_post()?;
                Some(Message::LoadPost { path, title })
            }
            KeyCode::Char('r') => {
                if matches!(model.catalog, crate::app::CatalogState::Failed(_)) {
                    Some(Message::ReloadCatalog)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            if matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left)) {
                return Some(Message::HideHelp);
            }
            return None;
        }

        let area = Rect::new(0, 0, model.terminal_size.0, model.terminal_size.1);

        if model.toc_modal_visible {
            let popup = crate::ui::toc_modal_rect(area, model.toc.len());
            let inside = point_in_rect(mouse.column, mouse.row, popup);
            match mouse.kind {
                MouseEventKind::Up(MouseButton::Left) => {
                    if inside {
                        let content_top = crate::ui::toc_modal_content_top(popup);
                        if mouse.row >= content_top {
                            let index = model.toc_scroll + (mouse.row - content_top) as usize;
                            if index < model.toc.len() {
                                return Some(Message::TocClick(index));
                            }
                        }
                        return None;
                    }
                    return Some(Message::ToggleTocModal);
                }
                MouseEventKind::ScrollDown => return Some(Message::TocScrollDown),
                MouseEventKind::ScrollUp => return Some(Message::TocScrollUp),
                _ => return None,
            }
        }

        let panes = crate::ui::pane_rects(
            area,
            model.breakpoint,
            model.sidebar_collapsed,
            model.overlay_visible,
        );

        // Narrow overlay: the article owns the whole screen.
        if model.breakpoint.uses_overlay() && model.overlay_visible {
            return match mouse.kind {
                MouseEventKind::ScrollDown if model.viewport.can_scroll_down() => {
                    Some(Message::ScrollDown(3))
                }
                MouseEventKind::ScrollUp if model.viewport.can_scroll_up() => {
                    Some(Message::ScrollUp(3))
                }
                _ => None,
            };
        }

        if let Some(sidebar) = panes.sidebar
            && point_in_rect(mouse.column, mouse.row, sidebar)
        {
            return Self::sidebar_mouse(mouse, model, sidebar);
        }

        if let Some(toc) = panes.toc
            && point_in_rect(mouse.column, mouse.row, toc)
        {
            return Self::toc_mouse(mouse, model, toc);
        }

        if point_in_rect(mouse.column, mouse.row, panes.content) {
            return match mouse.kind {
                MouseEventKind::ScrollDown if model.viewport.can_scroll_down() => {
                    Some(Message::ScrollDown(3))
                }
                MouseEventKind::ScrollUp if model.viewport.can_scroll_up() => {
                    Some(Message::ScrollUp(3))
                }
                _ => None,
            };
        }

        None
    }

    fn sidebar_mouse(mouse: MouseEvent, model: &Model, pane: Rect) -> Option<Message> {
        match mouse.kind {
            MouseEventKind::ScrollDown => Some(Message::SidebarScrollDown),
            MouseEventKind::ScrollUp => Some(Message::SidebarScrollUp),
            MouseEventKind::Up(MouseButton::Left) => {
                // List content starts under the border and search row.
                let list_top = pane.y + 2;
                let list_bottom = pane.y + pane.height.saturating_sub(1);
                if mouse.row < list_top || mouse.row >= list_bottom {
                    return None;
                }
                let display_row = model.sidebar_scroll + (mouse.row - list_top) as usize;
                let index = model.sidebar_row_at_display(display_row)?;
                match model.sidebar_rows.get(index)? {
                    SidebarRow::Post { path, title, .. } => Some(Message::LoadPost {
                        path: path.clone(),
                        title: title.clone(),
                    }),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn toc_mouse(mouse: MouseEvent, model: &Model, pane: Rect) -> Option<Message> {
        match mouse.kind {
            MouseEventKind::ScrollDown => Some(Message::TocScrollDown),
            MouseEventKind::ScrollUp => Some(Message::TocScrollUp),
            MouseEventKind::Up(MouseButton::Left) => {
                if model.toc.is_empty() {
                    return None;
                }
                let list_top = pane.y + 1;
                let list_bottom = pane.y + pane.height.saturating_sub(1);
                if mouse.row < list_top || mouse.row >= list_bottom {
                    return None;
                }
                let index = model.toc_scroll + (mouse.row - list_top) as usize;
                if index < model.toc.len() {
                    Some(Message::TocClick(index))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}
