// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. toc::TocEntry)
    clippy::module_name_repetitions
)]

//! # Blogless
//!
//! A terminal reader for static markdown blogs.
//!
//! Blogless points at the root of a static blog site, loads its post
//! manifest, and renders:
//! - A category/search sidebar over all posts
//! - Articles converted from markdown to styled terminal lines
//! - A scroll-synchronized table of contents with animated jumps
//! - Layouts that adapt to the terminal width (narrow/medium/wide)
//!
//! ## Architecture
//!
//! Blogless uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events, input and network completions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! Network fetches run on worker threads and report back as messages.
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`catalog`]: Post manifest parsing and category grouping
//! - [`document`]: Markdown parsing and rendering
//! - [`excerpt`]: Post description extraction and caching
//! - [`fetch`]: HTTP access to the site's static resources
//! - [`layout`]: Responsive breakpoint tiers
//! - [`sidebar`]: Category list and search row construction
//! - [`toc`]: Table-of-contents engine
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod catalog;
pub mod config;
pub mod document;
pub mod excerpt;
pub mod fetch;
pub mod layout;
pub mod perf;
pub mod sidebar;
pub mod toc;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::catalog::{Catalog, Post};
    pub use crate::document::Document;
    pub use crate::toc::TocOutline;
    pub use crate::ui::viewport::Viewport;
}
