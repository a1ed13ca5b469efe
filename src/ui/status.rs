use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{ArticleState, CatalogState, Model};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let catalog_info = match &model.catalog {
        CatalogState::Loading => "loading posts...".to_string(),
        CatalogState::Failed(_) => "post list unavailable".to_string(),
        CatalogState::Ready(catalog) => format!(
            "{} posts in {} categories",
            catalog.post_count(),
            catalog.groups().len()
        ),
    };

    let article_info = match &model.article {
        ArticleState::Ready(article) => {
            format!("  {}  [{}%]", article.title, model.viewport.scroll_percent())
        }
        ArticleState::Loading { title, .. } => format!("  loading {title}..."),
        ArticleState::Failed { title, .. } => format!("  failed: {title}"),
        ArticleState::Empty => String::new(),
    };

    let toc_hint = if model.toc_hint_visible() {
        "  [t] contents"
    } else {
        ""
    };

    let status = format!(
        " {}  {}{}{}  ?:help",
        model.site_name, catalog_info, article_info, toc_hint
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        crate::app::ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        crate::app::ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        crate::app::ToastLevel::Error => {
            ("[error]", Style::default().bg(Color::Red).fg(Color::White))
        }
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
