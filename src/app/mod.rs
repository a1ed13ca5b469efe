//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Network work (manifest, articles, excerpts) runs on worker threads
//! that report back through an mpsc channel drained by the event loop.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Article, ArticleState, CatalogState, Focus, Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::fetch::Fetcher;

/// Default manifest location under the site root.
pub const DEFAULT_MANIFEST_PATH: &str = "assets/posts.json";

/// Main application struct that owns the fetcher and runs the event
/// loop.
pub struct App {
    fetcher: Fetcher,
    manifest_path: String,
    config_path: Option<PathBuf>,
}

impl App {
    /// Create a new application for the given site.
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            manifest_path: DEFAULT_MANIFEST_PATH.to_string(),
            config_path: None,
        }
    }

    /// Override the manifest path relative to the site root.
    pub fn with_manifest_path(mut self, path: impl Into<String>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Config file the runtime theme toggle persists to.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }
}
