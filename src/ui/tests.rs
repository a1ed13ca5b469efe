use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::app::{Article, ArticleState, CatalogState, Message, Model, update};
use crate::catalog::{Catalog, Post};
use crate::document::Document;
use crate::layout::Breakpoint;
use crate::toc::TocOutline;

use super::{content_pane_width, pane_rects};

fn post(title: &str, path: &str, category: &str) -> Post {
    Post {
        title: title.to_string(),
        path: path.to_string(),
        category: category.to_string(),
    }
}

fn ready_model(size: (u16, u16)) -> Model {
    let mut model = Model::new("blog.example.net".to_string(), size);
    model.catalog = CatalogState::Ready(Catalog::from_posts(vec![
        post("Kerberoasting 101", "posts/k.md", "Attacks"),
        post("Tiering Basics", "posts/t.md", "Defense"),
    ]));
    model.apply_layout();
    model.rebuild_sidebar_rows();
    model
}

fn with_article(mut model: Model, markdown: &str) -> Model {
    let document = Document::parse_with_layout(markdown, model.content_width()).unwrap();
    let article = Article {
        title: "Kerberoasting 101".to_string(),
        path: "posts/k.md".to_string(),
        document,
    };
    model.toc = TocOutline::build(&article.document);
    model.viewport.set_total_lines(article.document.line_count());
    model.article = ArticleState::Ready(article);
    model
}

fn render_to_text(model: &mut Model, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| super::render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer().clone();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn test_pane_rects_narrow_is_single_pane() {
    let area = Rect::new(0, 0, 60, 24);
    let panes = pane_rects(area, Breakpoint::Narrow, false, false);
    assert!(panes.sidebar.is_some());
    assert!(panes.toc.is_none());
    assert_eq!(panes.content.width, 60);

    let overlay = pane_rects(area, Breakpoint::Narrow, false, true);
    assert!(overlay.sidebar.is_none());
    assert_eq!(overlay.content.height, 23);
}

#[test]
fn test_pane_rects_medium_splits_two_columns() {
    let area = Rect::new(0, 0, 100, 30);
    let panes = pane_rects(area, Breakpoint::Medium, false, false);
    let sidebar = panes.sidebar.unwrap();
    assert!(panes.toc.is_none());
    assert_eq!(sidebar.width + panes.content.width, 100);
    assert!(sidebar.width < panes.content.width);
}

#[test]
fn test_pane_rects_wide_has_three_columns() {
    let area = Rect::new(0, 0, 130, 40);
    let panes = pane_rects(area, Breakpoint::Wide, false, false);
    let sidebar = panes.sidebar.unwrap();
    let toc = panes.toc.unwrap();
    assert_eq!(sidebar.width + panes.content.width + toc.width, 130);
}

#[test]
fn test_pane_rects_wide_collapsed_drops_sidebar() {
    let area = Rect::new(0, 0, 130, 40);
    let panes = pane_rects(area, Breakpoint::Wide, true, false);
    assert!(panes.sidebar.is_none());
    assert!(panes.toc.is_some());
}

#[test]
fn test_content_width_grows_when_sidebar_collapses() {
    let expanded = content_pane_width(130, Breakpoint::Wide, false);
    let collapsed = content_pane_width(130, Breakpoint::Wide, true);
    assert!(collapsed > expanded);
    assert!(content_pane_width(10, Breakpoint::Narrow, false) >= 1);
}

#[test]
fn test_render_sidebar_lists_categories_and_posts() {
    let mut model = ready_model((100, 30));
    let text = render_to_text(&mut model, 100, 30);
    assert!(text.contains("Attacks (1)"));
    assert!(text.contains("Defense (1)"));
    assert!(text.contains("Kerberoasting 101"));
}

#[test]
fn test_render_catalog_error_panel() {
    let mut model = Model::new("blog.example.net".to_string(), (100, 30));
    model.catalog = CatalogState::Failed(crate::fetch::FetchError::Timeout);
    model.apply_layout();
    let text = render_to_text(&mut model, 100, 30);
    assert!(text.contains("Timeout"));
    assert!(text.contains("R reloads"));
}

#[test]
fn test_render_article_with_toc_panel() {
    let model = ready_model((130, 40));
    let mut model = with_article(
        model,
        "# Kerberoasting 101\n\nIntro prose.\n\n## Roasting\n\nDetails.\n",
    );
    model.breakpoint = Breakpoint::Wide;
    let text = render_to_text(&mut model, 130, 40);
    assert!(text.contains("Contents"));
    assert!(text.contains("Roasting"));
    assert!(text.contains("Intro prose."));
}

#[test]
fn test_render_timeout_error_panel_with_retry_hint() {
    let mut model = ready_model((100, 30));
    model.article = ArticleState::Failed {
        path: "posts/k.md".to_string(),
        title: "Kerberoasting 101".to_string(),
        error: crate::fetch::FetchError::Timeout,
    };
    let text = render_to_text(&mut model, 100, 30);
    assert!(text.contains("Could not load"));
    assert!(text.contains("Timeout"));
    assert!(text.contains("r tries again"));
}

#[test]
fn test_render_narrow_overlay_shows_article_not_list() {
    let mut model = Model::new("blog.example.net".to_string(), (60, 24));
    model.catalog = CatalogState::Ready(Catalog::from_posts(vec![post(
        "Kerberoasting 101",
        "posts/k.md",
        "Attacks",
    )]));
    model.apply_layout();
    model.rebuild_sidebar_rows();
    let mut model = update(
        model,
        Message::LoadPost {
            path: "posts/k.md".to_string(),
            title: "Kerberoasting 101".to_string(),
        },
    );
    assert!(model.overlay_visible);
    let text = render_to_text(&mut model, 60, 24);
    assert!(text.contains("Loading \"Kerberoasting 101\""));
    assert!(!text.contains("Attacks (1)"));
}

#[test]
fn test_render_search_no_results_state() {
    let model = ready_model((100, 30));
    let mut model = update(model, Message::StartSearch);
    model = update(model, Message::SearchInput("zzz".to_string()));
    model = update(model, Message::ApplySearch);
    let text = render_to_text(&mut model, 100, 30);
    assert!(text.contains("No posts match"));
    assert!(!text.contains("Attacks (1)"));
}

#[test]
fn test_status_bar_shows_toc_hint_on_medium() {
    let model = ready_model((100, 30));
    let mut model = with_article(model, "# Title\n\n## Section\n\nBody.\n");
    assert_eq!(model.breakpoint, Breakpoint::Medium);
    let text = render_to_text(&mut model, 100, 30);
    assert!(text.contains("[t] contents"));
}
