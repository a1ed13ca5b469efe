use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::style;

/// Popup rect for the TOC modal on Narrow/Medium tiers.
pub fn toc_modal_rect(area: Rect, entry_count: usize) -> Rect {
    let popup_width = area.width.saturating_sub(10).max(36);
    // Entries are one row each, plus border and padding rows.
    #[allow(clippy::cast_possible_truncation)]
    let needed_rows = (entry_count as u16) + 4;
    let popup_height = needed_rows.min(area.height.saturating_sub(4).max(8));
    centered_popup_rect(popup_width, popup_height, area)
}

/// First content row inside the modal (border + padding).
pub const fn toc_modal_content_top(popup: Rect) -> u16 {
    popup.y + 2
}

pub fn render_toc_modal(model: &Model, frame: &mut Frame, area: Rect) {
    if model.toc.is_empty() {
        return;
    }
    let popup = toc_modal_rect(area, model.toc.len());

    let visible_rows = popup.height.saturating_sub(4) as usize;
    let max_start = model.toc.len().saturating_sub(visible_rows);
    let start = model.toc_scroll.min(max_start);

    let mut lines: Vec<Line> = model
        .toc
        .entries()
        .iter()
        .enumerate()
        .skip(start)
        .take(visible_rows)
        .map(|(i, entry)| {
            let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
            let base = if model.toc_active == Some(i) {
                style::toc_active_style()
            } else {
                Style::default()
            };
            let line_style = if model.toc_selected == Some(i) {
                base.reversed()
            } else {
                base
            };
            Line::styled(format!("{indent}{}", entry.text), line_style)
        })
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Enter jumps · Esc closes",
        style::description_style(),
    ));

    let block = Block::default()
        .title(" Contents ")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(44);
    let popup_height = area.height.saturating_sub(6).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut all_lines: Vec<Line> = Vec::new();

    all_lines.push(Line::styled("Browse", section_style));
    all_lines.push(Line::raw("  j/k or Up/Down      Move selection / scroll"));
    all_lines.push(Line::raw("  Enter               Open post"));
    all_lines.push(Line::raw("  Tab                 Switch pane focus"));
    all_lines.push(Line::raw("  Esc / Backspace     Back to list (narrow)"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Read", section_style));
    all_lines.push(Line::raw("  Space/PageDown      Page down"));
    all_lines.push(Line::raw("  b/PageUp            Page up"));
    all_lines.push(Line::raw("  g / G               Top / bottom"));
    all_lines.push(Line::raw("  r                   Retry a failed load"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Search", section_style));
    all_lines.push(Line::raw("  / or Ctrl-k         Search title/category"));
    all_lines.push(Line::raw("  Enter               Keep filter, leave input"));
    all_lines.push(Line::raw("  Esc                 Clear search"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Contents", section_style));
    all_lines.push(Line::raw("  t                   TOC (narrow/medium: modal)"));
    all_lines.push(Line::raw("  j/k, Enter, click   Navigate and jump"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Other", section_style));
    all_lines.push(Line::raw("  s                   Collapse sidebar (wide)"));
    all_lines.push(Line::raw("  D                   Toggle dark/light theme"));
    all_lines.push(Line::raw("  R                   Reload post list"));
    all_lines.push(Line::raw("  q / Ctrl-c          Quit"));
    all_lines.push(Line::raw("  ? / F1              Toggle help"));

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(all_lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
