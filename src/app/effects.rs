use std::io::stdout;
use std::sync::mpsc::Sender;
use std::thread;

use crossterm::execute;
use crossterm::terminal::SetTitle;

use crate::app::model::ArticleState;
use crate::app::{App, Message, Model, ToastLevel};
use crate::ui::style::{self, ColorMode};

impl App {
    /// Fetch the manifest on a worker thread.
    pub(super) fn spawn_catalog_fetch(&self, tx: &Sender<Message>) {
        let fetcher = self.fetcher.clone();
        let manifest = self.manifest_path.clone();
        let tx = tx.clone();
        thread::spawn(move || {
            crate::perf::log_event("fetch.catalog.begin", manifest.clone());
            let result = fetcher
                .fetch_text(&manifest)
                .and_then(|body| crate::catalog::parse_manifest(&body));
            crate::perf::log_event(
                "fetch.catalog.done",
                match &result {
                    Ok(posts) => format!("posts={}", posts.len()),
                    Err(err) => format!("err={err}"),
                },
            );
            let _ = tx.send(Message::CatalogLoaded(result));
        });
    }

    /// Fetch one article on a worker thread.
    fn spawn_post_fetch(&self, tx: &Sender<Message>, path: String, title: String) {
        let fetcher = self.fetcher.clone();
        let tx = tx.clone();
        thread::spawn(move || {
            crate::perf::log_event("fetch.post.begin", path.clone());
            let result = fetcher.fetch_text(&path);
            crate::perf::log_event(
                "fetch.post.done",
                format!("path={} ok={}", path, result.is_ok()),
            );
            let _ = tx.send(Message::PostFetched {
                path,
                title,
                result,
            });
        });
    }

    /// Fetch excerpts for posts that have none cached yet.
    ///
    /// One worker walks the outstanding paths sequentially; each result
    /// comes back as its own message so rows refresh as they arrive.
    fn request_descriptions(&self, model: &mut Model, tx: &Sender<Message>) {
        let Some(catalog) = model.catalog_ready() else {
            return;
        };
        let outstanding: Vec<String> = catalog
            .posts()
            .map(|post| post.path.clone())
            .filter(|path| {
                !model.descriptions.contains(path) && !model.descriptions_pending.contains(path)
            })
            .collect();
        if outstanding.is_empty() {
            return;
        }
        for path in &outstanding {
            model.descriptions_pending.insert(path.clone());
        }

        let fetcher = self.fetcher.clone();
        let tx = tx.clone();
        thread::spawn(move || {
            crate::perf::log_event(
                "fetch.descriptions.begin",
                format!("count={}", outstanding.len()),
            );
            for path in outstanding {
                let body = fetcher.fetch_text(&path);
                if tx
                    .send(Message::DescriptionFetched {
                        path,
                        body,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });
    }

    /// Side effects keyed off messages, run after `update`.
    pub(super) fn handle_message_side_effects(
        &self,
        model: &mut Model,
        tx: &Sender<Message>,
        msg: &Message,
    ) {
        match msg {
            Message::ReloadCatalog => {
                self.spawn_catalog_fetch(tx);
                model.show_toast(ToastLevel::Info, "Reloading posts");
            }
            Message::LoadPost { .. } | Message::RetryLoad => {
                if let ArticleState::Loading { path, title } = &model.article {
                    self.spawn_post_fetch(tx, path.clone(), title.clone());
                }
            }
            Message::CatalogLoaded(Ok(_)) => {
                self.request_descriptions(model, tx);
            }
            Message::PostFetched {
                title,
                result: Ok(_),
                ..
            } => {
                set_terminal_title(&format!("{} - {}", title, model.site_name));
            }
            Message::ToggleTheme => {
                let next = match style::color_mode() {
                    ColorMode::Dark => ColorMode::Light,
                    ColorMode::Light => ColorMode::Dark,
                };
                style::set_color_mode(next);
                let label = match next {
                    ColorMode::Light => "Light theme",
                    ColorMode::Dark => "Dark theme",
                };
                match self.persist_theme(next) {
                    Ok(()) => model.show_toast(ToastLevel::Info, label),
                    Err(err) => model.show_toast(
                        ToastLevel::Warning,
                        format!("{label} (not saved: {err})"),
                    ),
                }
            }
            _ => {}
        }
    }

    /// Write the chosen theme back to the config file.
    fn persist_theme(&self, mode: ColorMode) -> anyhow::Result<()> {
        let Some(path) = &self.config_path else {
            return Ok(());
        };
        let theme = match mode {
            ColorMode::Light => crate::config::ThemeMode::Light,
            ColorMode::Dark => crate::config::ThemeMode::Dark,
        };
        crate::config::save_theme_pref(path, theme)
    }
}

fn set_terminal_title(title: &str) {
    let _ = execute!(stdout(), SetTitle(title));
}
