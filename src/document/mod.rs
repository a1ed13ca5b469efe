//! Markdown article parsing and rendering.
//!
//! This module handles:
//! - Parsing article markdown with comrak
//! - Extracting document structure (headings, links)
//! - Rendering to styled lines for display

mod parser;
mod types;

pub use parser::parse_with_layout;
pub use types::{
    Document, HeadingRef, InlineSpan, InlineStyle, LineType, LinkRef, ParsedDocument, RenderedLine,
};
