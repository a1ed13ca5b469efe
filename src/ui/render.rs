use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::{ArticleState, CatalogState, Focus, Model};
use crate::fetch::FetchError;
use crate::layout::Breakpoint;
use crate::sidebar::SidebarRow;

use super::{DOCUMENT_LEFT_PADDING, overlays, status, style};

/// Resolved pane geometry for the current layout.
///
/// Shared by rendering and mouse hit-testing so clicks always agree
/// with what is on screen.
#[derive(Debug, Clone, Copy)]
pub struct PaneRects {
    pub sidebar: Option<Rect>,
    pub content: Rect,
    pub toc: Option<Rect>,
}

/// Split the frame into panes for the given tier.
///
/// The bottom row is always the status bar. Narrow shows one pane at a
/// time (list, or the article overlay); Medium adds the content
/// column; Wide/Large add the TOC panel, with the sidebar collapsible.
pub fn pane_rects(
    area: Rect,
    breakpoint: Breakpoint,
    sidebar_collapsed: bool,
    overlay_visible: bool,
) -> PaneRects {
    let body = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };

    match breakpoint {
        Breakpoint::Narrow => {
            if overlay_visible {
                PaneRects {
                    sidebar: None,
                    content: body,
                    toc: None,
                }
            } else {
                PaneRects {
                    sidebar: Some(body),
                    content: body,
                    toc: None,
                }
            }
        }
        Breakpoint::Medium => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
                .split(body);
            PaneRects {
                sidebar: Some(chunks[0]),
                content: chunks[1],
                toc: None,
            }
        }
        Breakpoint::Wide | Breakpoint::Large => {
            let (sidebar_pct, toc_pct) = if breakpoint == Breakpoint::Large {
                (24, 20)
            } else {
                (28, 22)
            };
            if sidebar_collapsed {
                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([
                        Constraint::Percentage(100 - toc_pct),
                        Constraint::Percentage(toc_pct),
                    ])
                    .split(body);
                PaneRects {
                    sidebar: None,
                    content: chunks[0],
                    toc: Some(chunks[1]),
                }
            } else {
                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([
                        Constraint::Percentage(sidebar_pct),
                        Constraint::Percentage(100 - sidebar_pct - toc_pct),
                        Constraint::Percentage(toc_pct),
                    ])
                    .split(body);
                PaneRects {
                    sidebar: Some(chunks[0]),
                    content: chunks[1],
                    toc: Some(chunks[2]),
                }
            }
        }
    }
}

/// Width articles are wrapped to for the current layout.
pub fn content_pane_width(total_width: u16, breakpoint: Breakpoint, sidebar_collapsed: bool) -> u16 {
    let area = Rect::new(0, 0, total_width, 2);
    let panes = pane_rects(area, breakpoint, sidebar_collapsed, false);
    panes
        .content
        .width
        .saturating_sub(DOCUMENT_LEFT_PADDING)
        .max(1)
}

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let panes = pane_rects(
        area,
        model.breakpoint,
        model.sidebar_collapsed,
        model.overlay_visible,
    );
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    if model.breakpoint.uses_overlay() {
        if model.overlay_visible {
            render_content(model, frame, panes.content);
        } else if let Some(sidebar) = panes.sidebar {
            render_sidebar(model, frame, sidebar);
        }
    } else {
        if let Some(sidebar) = panes.sidebar {
            render_sidebar(model, frame, sidebar);
        }
        render_content(model, frame, panes.content);
        if let Some(toc) = panes.toc {
            render_toc_panel(model, frame, toc);
        }
    }

    status::render_status_bar(model, frame, status_area);
    if model.active_toast().is_some() {
        let toast_area = Rect {
            y: area.y + area.height.saturating_sub(2),
            height: 1,
            ..area
        };
        status::render_toast_bar(model, frame, toast_area);
    }

    if model.toc_modal_visible {
        overlays::render_toc_modal(model, frame, area);
    }
    if model.help_visible {
        overlays::render_help_overlay(frame, area);
    }
}

fn render_sidebar(model: &mut Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Focus::Sidebar && !model.overlay_visible;
    let block = Block::default()
        .title(format!(" {} ", model.site_name))
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    // First inner row is the search line.
    let search_area = Rect { height: 1, ..inner };
    frame.render_widget(Paragraph::new(search_line(model)), search_area);

    let list_area = Rect {
        y: inner.y + 1,
        height: inner.height.saturating_sub(1),
        ..inner
    };

    match &model.catalog {
        CatalogState::Loading => {
            frame.render_widget(
                Paragraph::new("Loading posts...").style(style::description_style()),
                list_area,
            );
        }
        CatalogState::Failed(error) => {
            render_catalog_error(error, frame, list_area);
        }
        CatalogState::Ready(_) => {
            let visible = list_area.height as usize;
            model.ensure_selection_visible(visible);
            render_sidebar_rows(model, frame, list_area);
        }
    }
}

fn search_line(model: &Model) -> Line<'static> {
    if let Some(query) = model.search_query.as_deref() {
        Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(query.to_string()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ])
    } else if model.applied_query.is_empty() {
        Line::styled("/ search", style::description_style())
    } else {
        Line::from(vec![
            Span::styled("filter: ", style::description_style()),
            Span::raw(model.applied_query.clone()),
            Span::styled("  Esc clears", style::description_style()),
        ])
    }
}

fn render_catalog_error(error: &FetchError, frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled(error.label().to_string(), style::error_style()),
        Line::raw(error.to_string()),
        Line::raw(""),
        Line::styled("R reloads the post list", style::description_style()),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: true }), area);
}

fn render_sidebar_rows(model: &Model, frame: &mut Frame, area: Rect) {
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut display_row = 0usize;
    let skip = model.sidebar_scroll;
    let capacity = area.height as usize;

    'rows: for (index, row) in model.sidebar_rows.iter().enumerate() {
        let height = Model::sidebar_row_height(row);
        if display_row + height <= skip {
            display_row += height;
            continue;
        }
        let selected = model.sidebar_selected == Some(index);
        for line in sidebar_row_lines(row, selected, width) {
            if display_row >= skip {
                lines.push(line);
                if lines.len() >= capacity {
                    break 'rows;
                }
            }
            display_row += 1;
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn sidebar_row_lines(row: &SidebarRow, selected: bool, width: usize) -> Vec<Line<'static>> {
    match row {
        SidebarRow::CategoryHeader { name, count } => {
            vec![Line::styled(
                truncate_line(&format!("{name} ({count})"), width),
                style::category_header_style(),
            )]
        }
        SidebarRow::Post {
            title,
            description,
            title_match,
            ..
        } => {
            let marker = if selected { "> " } else { "  " };
            let title_width = width.saturating_sub(marker.len());
            let mut title_spans: Vec<Span<'static>> = vec![Span::styled(
                marker.to_string(),
                Style::default().fg(Color::Yellow),
            )];
            let base = if selected {
                Style::default().add_modifier(Modifier::BOLD).reversed()
            } else {
                Style::default()
            };
            match title_match {
                Some(range) if range.end <= title.len() => {
                    let shown = truncate_line(title, title_width);
                    if range.end <= shown.len() {
                        title_spans.push(Span::styled(shown[..range.start].to_string(), base));
                        title_spans.push(Span::styled(
                            shown[range.clone()].to_string(),
                            style::search_match_style(),
                        ));
                        title_spans.push(Span::styled(shown[range.end..].to_string(), base));
                    } else {
                        title_spans.push(Span::styled(shown, base));
                    }
                }
                _ => {
                    title_spans.push(Span::styled(truncate_line(title, title_width), base));
                }
            }
            let description = description
                .clone()
                .unwrap_or_else(|| "...".to_string());
            vec![
                Line::from(title_spans),
                Line::styled(
                    truncate_line(&format!("  {description}"), width),
                    style::description_style(),
                ),
            ]
        }
        SidebarRow::EmptyState => vec![
            Line::styled("No posts available".to_string(), style::description_style()),
            Line::raw(""),
        ],
        SidebarRow::NoResults { query } => vec![
            Line::styled(
                truncate_line(&format!("No posts match \"{query}\""), width),
                style::description_style(),
            ),
            Line::styled("Esc clears the search".to_string(), style::description_style()),
        ],
    }
}

fn render_content(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::NONE)
        .padding(Padding::left(DOCUMENT_LEFT_PADDING));
    let doc_area = block.inner(area);
    frame.render_widget(Clear, area);

    match &model.article {
        ArticleState::Empty => {
            let lines = vec![
                Line::raw(""),
                Line::styled(
                    format!("  {}", model.site_name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
                Line::styled(
                    "  Pick a post from the list to start reading.",
                    style::description_style(),
                ),
                Line::styled("  / searches, ? shows all keys.", style::description_style()),
            ];
            frame.render_widget(Paragraph::new(lines), area);
        }
        ArticleState::Loading { title, .. } => {
            let lines = vec![
                Line::raw(""),
                Line::styled(
                    format!("  Loading \"{title}\"..."),
                    style::description_style(),
                ),
            ];
            frame.render_widget(Paragraph::new(lines), area);
        }
        ArticleState::Failed { title, error, .. } => {
            render_article_error(title, error, frame, doc_area);
        }
        ArticleState::Ready(article) => {
            render_document(model, article, frame, block, area);
        }
    }
}

fn render_article_error(title: &str, error: &FetchError, frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::styled(
            format!("Could not load \"{title}\""),
            style::error_style(),
        ),
        Line::raw(""),
        Line::from(vec![
            Span::styled(error.label().to_string(), style::error_style()),
            Span::raw(": "),
            Span::raw(error.to_string()),
        ]),
        Line::raw(""),
        Line::styled("r tries again", style::description_style()),
    ];
    frame.render_widget(
        Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: true }),
        area,
    );
}

fn render_document(
    model: &Model,
    article: &crate::app::Article,
    frame: &mut Frame,
    block: Block,
    area: Rect,
) {
    let offset = model.viewport.offset();
    let visible = article
        .document
        .visible_lines(offset, model.viewport.height() as usize);

    let mut content: Vec<Line> = Vec::new();
    for (idx, line) in visible.iter().enumerate() {
        let line_idx = offset + idx;
        let pulsed = model.pulse.is_some_and(|pulse| pulse.line == line_idx);
        let line_style = if pulsed {
            style::pulse_style()
        } else {
            style::style_for_line_type(line.line_type())
        };
        if let Some(spans) = line.spans() {
            let styled: Vec<Span> = spans
                .iter()
                .map(|span| {
                    let span_style = if pulsed {
                        line_style
                    } else {
                        style::style_for_inline(line_style, span.style())
                    };
                    Span::styled(span.text().to_string(), span_style)
                })
                .collect();
            content.push(Line::from(styled));
        } else {
            content.push(Line::styled(line.content().to_string(), line_style));
        }
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_toc_panel(model: &Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Focus::Toc;
    let block = Block::default()
        .title(" Contents ")
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if model.toc.is_empty() {
        frame.render_widget(
            Paragraph::new("No headings").style(style::description_style()),
            inner,
        );
        return;
    }

    let visible_rows = inner.height as usize;
    let max_start = model.toc.len().saturating_sub(visible_rows);
    let start = model.toc_scroll.min(max_start);

    let items: Vec<Line> = model
        .toc
        .entries()
        .iter()
        .enumerate()
        .skip(start)
        .take(visible_rows)
        .map(|(i, entry)| {
            let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
            let marker = if model.toc_selected == Some(i) && focused {
                ">"
            } else {
                " "
            };
            let base = if model.toc_active == Some(i) {
                style::toc_active_style()
            } else {
                Style::default()
            };
            let line_style = if model.toc_selected == Some(i) && focused {
                base.reversed()
            } else {
                base
            };
            Line::styled(
                truncate_line(&format!("{marker}{indent}{}", entry.text), inner.width as usize),
                line_style,
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(items), inner);
}

fn truncate_line(text: &str, width: usize) -> String {
    use unicode_width::UnicodeWidthChar;
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}
