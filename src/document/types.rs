//! Core document types.

/// Result of parsing markdown, ready to be assembled into a `Document`.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Rendered lines for display
    pub lines: Vec<RenderedLine>,
    /// Heading references for the TOC
    pub headings: Vec<HeadingRef>,
    /// Link references
    pub links: Vec<LinkRef>,
}

/// A parsed and rendered markdown article.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Original source text
    source: String,
    /// Rendered lines for display
    lines: Vec<RenderedLine>,
    /// Heading references for the TOC
    headings: Vec<HeadingRef>,
    /// Link references
    links: Vec<LinkRef>,
}

impl Document {
    /// Create an empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a new document from parsed results.
    pub(crate) fn from_parsed(source: String, result: ParsedDocument) -> Self {
        Self {
            source,
            lines: result.lines,
            headings: result.headings,
            links: result.links,
        }
    }

    /// Total number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All headings in document order.
    pub fn headings(&self) -> &[HeadingRef] {
        &self.headings
    }

    /// All link references.
    pub fn links(&self) -> &[LinkRef] {
        &self.links
    }

    /// Lines from `offset` to `offset + count`, clamped to the end.
    pub fn visible_lines(&self, offset: usize, count: usize) -> &[RenderedLine] {
        let start = offset.min(self.lines.len());
        let end = (start + count).min(self.lines.len());
        &self.lines[start..end]
    }

    /// A specific rendered line by index.
    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }

    /// The original markdown source.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// The text content of the line
    content: String,
    /// The type of line (for styling)
    line_type: LineType,
    /// Optional inline-styled spans for rendering
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    /// Create a new rendered line.
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    /// Create a new rendered line with inline spans.
    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the line type.
    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Get inline spans, if present.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Normal paragraph text
    Paragraph,
    /// Heading with level (1-6)
    Heading(u8),
    /// Code block line
    CodeBlock,
    /// Block quote line
    BlockQuote,
    /// List item with nesting level
    ListItem(usize),
    /// Table row
    Table,
    /// Horizontal rule
    HorizontalRule,
    /// Empty line
    Empty,
}

/// Reference to a heading in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text (plain, no formatting)
    pub text: String,
    /// Line number in the rendered document
    pub line: usize,
    /// Optional parser-assigned anchor id
    pub id: Option<String>,
}

/// Reference to a link in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// Link text
    pub text: String,
    /// Link URL
    pub url: String,
    /// Line number in the rendered document
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let doc = Document::empty();
        assert_eq!(doc.line_count(), 0);
        assert!(doc.headings().is_empty());
        assert!(doc.links().is_empty());
    }

    #[test]
    fn test_rendered_line_accessors() {
        let line = RenderedLine::new("Hello".to_string(), LineType::Paragraph);
        assert_eq!(line.content(), "Hello");
        assert_eq!(line.line_type(), &LineType::Paragraph);
        assert!(line.spans().is_none());
    }

    #[test]
    fn test_visible_lines_clamps_to_document_end() {
        let lines = vec![
            RenderedLine::new("Line 1".to_string(), LineType::Paragraph),
            RenderedLine::new("Line 2".to_string(), LineType::Paragraph),
            RenderedLine::new("Line 3".to_string(), LineType::Paragraph),
        ];
        let doc = Document::from_parsed(
            "source".to_string(),
            ParsedDocument {
                lines,
                ..ParsedDocument::default()
            },
        );

        let visible = doc.visible_lines(1, 10);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].content(), "Line 2");

        let past_end = doc.visible_lines(10, 5);
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_line_at_out_of_range() {
        let doc = Document::empty();
        assert!(doc.line_at(0).is_none());
    }
}
