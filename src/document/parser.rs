//! Markdown parsing with comrak.

use anyhow::Result;
use comrak::nodes::{AstNode, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{
    Document, HeadingRef, InlineSpan, InlineStyle, LineType, LinkRef, ParsedDocument, RenderedLine,
};

impl Document {
    /// Parse markdown source into a `Document` at the default width.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be assembled into a
    /// document.
    pub fn parse(source: &str) -> Result<Self> {
        parse_with_layout(source, 80)
    }

    /// Parse markdown source wrapped to a layout width.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be assembled into a
    /// document.
    pub fn parse_with_layout(source: &str, width: u16) -> Result<Self> {
        parse_with_layout(source, width)
    }
}

/// Parse markdown source into a Document with layout and wrapping.
///
/// # Errors
///
/// Returns an error if the source cannot be assembled into a document.
pub fn parse_with_layout(source: &str, width: u16) -> Result<Document> {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let mut parsed = ParsedDocument::default();
    let wrap_width = width.max(1) as usize;
    process_node(root, &mut parsed, 0, wrap_width, None);

    // Drop trailing blank filler so go-to-bottom lands on content.
    while parsed
        .lines
        .last()
        .is_some_and(|line| matches!(line.line_type(), LineType::Empty))
    {
        parsed.lines.pop();
    }

    Ok(Document::from_parsed(source.to_string(), parsed))
}

fn create_options() -> Options {
    let mut options = Options::default();

    // GFM extensions, matching how the articles are authored
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    // Anchor ids for headings
    options.extension.header_ids = Some(String::new());

    // Hard-wrapped prose keeps its line breaks
    options.render.hardbreaks = true;

    options
}

fn process_node<'a>(
    node: &'a AstNode<'a>,
    parsed: &mut ParsedDocument,
    depth: usize,
    wrap_width: usize,
    list_marker: Option<String>,
) {
    match &node.data.borrow().value {
        NodeValue::Document => {
            for child in node.children() {
                process_node(child, parsed, depth, wrap_width, list_marker.clone());
            }
        }

        NodeValue::Heading(heading) => {
            let text = extract_text(node);

            // Keep headings visually separated with a blank row above.
            ensure_trailing_empty_lines(&mut parsed.lines, 1);
            let line_num = parsed.lines.len();

            parsed.headings.push(HeadingRef {
                level: heading.level,
                text: text.clone(),
                line: line_num,
                id: None,
            });

            parsed.lines.push(RenderedLine::new(
                text,
                LineType::Heading(heading.level),
            ));
            parsed
                .lines
                .push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::Paragraph => {
            let spans = collect_inline_spans(node);
            collect_links(node, parsed.lines.len(), &mut parsed.links);

            let wrapped = wrap_spans(&spans, wrap_width, "", "");
            for line_spans in wrapped {
                let content = spans_to_string(&line_spans);
                parsed.lines.push(RenderedLine::with_spans(
                    content,
                    LineType::Paragraph,
                    line_spans,
                ));
            }
            parsed
                .lines
                .push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::CodeBlock(code_block) => {
            let info = code_block.info.clone();
            let literal = code_block.literal.clone();
            let language = info.split_whitespace().next().filter(|s| !s.is_empty());
            let content_width = literal
                .lines()
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0)
                .min(wrap_width.saturating_sub(4).max(1));
            let label = format!(" {} ", language.unwrap_or("code"));
            let frame_inner_width = content_width + 2;
            let top_label_width = frame_inner_width.min(label.chars().count());
            let visible_label: String = label.chars().take(top_label_width).collect();
            let top = format!(
                "┌{}{}┐",
                visible_label,
                "─".repeat(frame_inner_width.saturating_sub(visible_label.chars().count()))
            );
            parsed.lines.push(RenderedLine::new(top, LineType::CodeBlock));

            for raw_line in literal.lines() {
                let truncated = truncate_text(raw_line, content_width);
                let padding = " ".repeat(content_width.saturating_sub(truncated.chars().count()));
                parsed.lines.push(RenderedLine::new(
                    format!("│ {truncated}{padding} │"),
                    LineType::CodeBlock,
                ));
            }

            parsed.lines.push(RenderedLine::new(
                format!("└{}┘", "─".repeat(frame_inner_width)),
                LineType::CodeBlock,
            ));
            parsed
                .lines
                .push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::List(list) => {
            let list_depth = depth + 1;
            let start = list.start;
            let delimiter = match list.delimiter {
                comrak::nodes::ListDelimType::Paren => ')',
                comrak::nodes::ListDelimType::Period => '.',
            };
            let list_len = node.children().count();
            let max_number = start + list_len.saturating_sub(1);
            let number_width = max_number.to_string().len();

            for (index, child) in node.children().enumerate() {
                let base_marker = match list.list_type {
                    comrak::nodes::ListType::Bullet => "•".to_string(),
                    comrak::nodes::ListType::Ordered => {
                        let number = start + index;
                        format!("{number:>number_width$}{delimiter}")
                    }
                };
                process_node(
                    child,
                    parsed,
                    list_depth,
                    wrap_width,
                    Some(format!("{base_marker} ")),
                );
            }
            if depth == 0 {
                parsed
                    .lines
                    .push(RenderedLine::new(String::new(), LineType::Empty));
            }
        }

        NodeValue::Item(_) | NodeValue::TaskItem(_) => {
            let indent = "  ".repeat(depth.saturating_sub(1));
            let base_marker = list_marker.clone().unwrap_or_else(|| "• ".to_string());
            let marker = task_marker_of(node)
                .or_else(|| find_task_marker(node))
                .map_or(base_marker, |task_marker| format!("{task_marker} "));
            let prefix_first = format!("{indent}{marker}");
            let prefix_next = format!("{}{}", indent, " ".repeat(marker.chars().count()));
            let mut rendered_any = false;

            for child in node.children() {
                match &child.data.borrow().value {
                    NodeValue::Paragraph | NodeValue::TaskItem(_) => {
                        collect_links(child, parsed.lines.len(), &mut parsed.links);
                        let spans = collect_inline_spans(child);
                        let prefix = if rendered_any {
                            &prefix_next
                        } else {
                            &prefix_first
                        };
                        let wrapped = wrap_spans(&spans, wrap_width, prefix, &prefix_next);
                        for line_spans in wrapped {
                            let content = spans_to_string(&line_spans);
                            parsed.lines.push(RenderedLine::with_spans(
                                content,
                                LineType::ListItem(depth),
                                line_spans,
                            ));
                        }
                        rendered_any = true;
                    }
                    _ => {
                        process_node(child, parsed, depth, wrap_width, None);
                    }
                }
            }

            if !rendered_any {
                let spans = collect_inline_spans(node);
                let wrapped = wrap_spans(&spans, wrap_width, &prefix_first, &prefix_next);
                for line_spans in wrapped {
                    let content = spans_to_string(&line_spans);
                    parsed.lines.push(RenderedLine::with_spans(
                        content,
                        LineType::ListItem(depth),
                        line_spans,
                    ));
                }
            }
        }

        NodeValue::BlockQuote => {
            render_blockquote(node, parsed, wrap_width, 1);
            parsed
                .lines
                .push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::ThematicBreak => {
            parsed.lines.push(RenderedLine::new(
                "─".repeat(wrap_width.min(40)),
                LineType::HorizontalRule,
            ));
            parsed
                .lines
                .push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::Table(_) => {
            for line in render_table(node, wrap_width) {
                parsed.lines.push(RenderedLine::new(line, LineType::Table));
            }
            parsed
                .lines
                .push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::FootnoteDefinition(def) => {
            let label = format!("[^{}]: ", def.name);
            let continuation = " ".repeat(label.len());
            let spans = collect_inline_spans(node);
            let wrapped = wrap_spans(&spans, wrap_width, &label, &continuation);
            if wrapped.is_empty() {
                parsed.lines.push(RenderedLine::new(label, LineType::Paragraph));
            } else {
                for line_spans in wrapped {
                    let content = spans_to_string(&line_spans);
                    parsed.lines.push(RenderedLine::with_spans(
                        content,
                        LineType::Paragraph,
                        line_spans,
                    ));
                }
            }
            parsed
                .lines
                .push(RenderedLine::new(String::new(), LineType::Empty));
        }

        _ => {
            // Process children for unhandled nodes
            for child in node.children() {
                process_node(child, parsed, depth, wrap_width, list_marker.clone());
            }
        }
    }
}

fn ensure_trailing_empty_lines(lines: &mut Vec<RenderedLine>, count: usize) {
    if lines.is_empty() {
        return;
    }
    let existing = lines
        .iter()
        .rev()
        .take_while(|line| matches!(line.line_type(), LineType::Empty))
        .count();
    for _ in existing..count {
        lines.push(RenderedLine::new(String::new(), LineType::Empty));
    }
}

fn render_blockquote<'a>(
    node: &'a AstNode<'a>,
    parsed: &mut ParsedDocument,
    wrap_width: usize,
    quote_depth: usize,
) {
    let prefix = quote_prefix(quote_depth);

    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Paragraph => {
                collect_links(child, parsed.lines.len(), &mut parsed.links);
                let spans = collect_inline_spans(child);
                let wrapped = wrap_spans(&spans, wrap_width, &prefix, &prefix);
                for line_spans in wrapped {
                    let content = spans_to_string(&line_spans);
                    parsed.lines.push(RenderedLine::with_spans(
                        content,
                        LineType::BlockQuote,
                        line_spans,
                    ));
                }
            }
            NodeValue::BlockQuote => {
                render_blockquote(child, parsed, wrap_width, quote_depth + 1);
            }
            _ => {
                let text = extract_text(child);
                for raw_line in text.lines() {
                    let spans =
                        vec![InlineSpan::new(raw_line.to_string(), InlineStyle::default())];
                    let wrapped = wrap_spans(&spans, wrap_width, &prefix, &prefix);
                    for line_spans in wrapped {
                        let content = spans_to_string(&line_spans);
                        parsed.lines.push(RenderedLine::with_spans(
                            content,
                            LineType::BlockQuote,
                            line_spans,
                        ));
                    }
                }
            }
        }
    }
}

fn quote_prefix(depth: usize) -> String {
    let mut prefix = String::from("  ");
    for _ in 0..depth {
        prefix.push('│');
        prefix.push(' ');
    }
    prefix
}

fn render_table<'a>(table_node: &'a AstNode<'a>, wrap_width: usize) -> Vec<String> {
    let (alignments, mut rows, has_header) = collect_table_rows(table_node);
    if rows.is_empty() {
        return Vec::new();
    }

    let num_cols = rows.iter().map(std::vec::Vec::len).max().unwrap_or(0);
    if num_cols == 0 {
        return Vec::new();
    }

    for row in &mut rows {
        while row.len() < num_cols {
            row.push(String::new());
        }
    }

    let mut col_widths = vec![1_usize; num_cols];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            col_widths[idx] = col_widths[idx].max(display_width(cell));
        }
    }

    // Keep the table inside available width.
    // Table row width is: 1 + sum(col_width + 3) for all columns.
    let max_table_width = wrap_width.max(4);
    while 1 + col_widths.iter().sum::<usize>() + (3 * num_cols) > max_table_width {
        if let Some((widest_idx, _)) = col_widths.iter().enumerate().max_by_key(|(_, w)| *w) {
            if col_widths[widest_idx] > 1 {
                col_widths[widest_idx] -= 1;
            } else {
                break;
            }
        }
    }

    let top = render_table_border(&col_widths, '┌', '┬', '┐');
    let mid = render_table_border(&col_widths, '├', '┼', '┤');
    let bottom = render_table_border(&col_widths, '└', '┴', '┘');

    let mut lines = Vec::new();
    lines.push(top);
    for (idx, row) in rows.iter().enumerate() {
        lines.push(render_table_row(row, &col_widths, &alignments));
        if has_header && idx == 0 {
            lines.push(mid.clone());
        }
    }
    lines.push(bottom);
    lines
}

fn collect_table_rows<'a>(
    table_node: &'a AstNode<'a>,
) -> (Vec<TableAlignment>, Vec<Vec<String>>, bool) {
    let alignments = match &table_node.data.borrow().value {
        NodeValue::Table(table) => table.alignments.clone(),
        _ => Vec::new(),
    };

    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        let is_header_row = matches!(row_node.data.borrow().value, NodeValue::TableRow(true));
        if is_header_row {
            has_header = true;
        }
        if !matches!(row_node.data.borrow().value, NodeValue::TableRow(_)) {
            continue;
        }

        let mut row_cells = Vec::new();
        for cell_node in row_node.children() {
            if !matches!(cell_node.data.borrow().value, NodeValue::TableCell) {
                continue;
            }
            let cell = extract_text(cell_node)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            row_cells.push(cell);
        }
        rows.push(row_cells);
    }

    (alignments, rows, has_header)
}

fn render_table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let mut out = String::new();
    out.push(left);
    for (idx, width) in widths.iter().enumerate() {
        out.push_str(&"─".repeat(width + 2));
        if idx + 1 < widths.len() {
            out.push(middle);
        }
    }
    out.push(right);
    out
}

fn render_table_row(cells: &[String], widths: &[usize], alignments: &[TableAlignment]) -> String {
    let mut out = String::new();
    out.push('│');
    for idx in 0..widths.len() {
        let content = cells.get(idx).map_or("", std::string::String::as_str);
        let content = truncate_text(content, widths[idx]);
        let padding = widths[idx].saturating_sub(display_width(&content));

        out.push(' ');
        match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
            TableAlignment::Right => {
                out.push_str(&" ".repeat(padding));
                out.push_str(&content);
            }
            TableAlignment::Center => {
                let left = padding / 2;
                let right = padding - left;
                out.push_str(&" ".repeat(left));
                out.push_str(&content);
                out.push_str(&" ".repeat(right));
            }
            TableAlignment::Left | TableAlignment::None => {
                out.push_str(&content);
                out.push_str(&" ".repeat(padding));
            }
        }
        out.push(' ');
        out.push('│');
    }
    out
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    let mut out = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_chars {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => {
            text.push_str(t);
        }
        NodeValue::Code(c) => {
            text.push_str(&c.literal);
        }
        NodeValue::FootnoteReference(reference) => {
            text.push_str(&format!("[^{}]", reference.name));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            text.push(' ');
        }
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_inline_spans_recursive(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) => {}
        NodeValue::Text(t) => {
            spans.push(InlineSpan::new(t.clone(), style));
        }
        NodeValue::Code(code) => {
            let mut code_style = style;
            code_style.code = true;
            code_style.emphasis = false;
            code_style.strong = false;
            code_style.strikethrough = false;
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::Emph => {
            let mut next = style;
            next.emphasis = true;
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strong => {
            let mut next = style;
            next.strong = true;
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strikethrough => {
            let mut next = style;
            next.strikethrough = true;
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Link(_) => {
            let mut next = style;
            next.link = true;
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Image(image) => {
            let alt = extract_text(node);
            let label = if alt.is_empty() {
                image.url.clone()
            } else {
                alt
            };
            spans.push(InlineSpan::new(format!("[image: {label}]"), style));
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), style));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
        }
        _ => {
            for child in node.children() {
                collect_inline_spans_recursive(child, style, spans);
            }
        }
    }
}

fn collect_links<'a>(node: &'a AstNode<'a>, line: usize, links: &mut Vec<LinkRef>) {
    if let NodeValue::Link(link) = &node.data.borrow().value {
        links.push(LinkRef {
            text: extract_text(node),
            url: link.url.clone(),
            line,
        });
    }
    for child in node.children() {
        collect_links(child, line, links);
    }
}

fn task_marker_of<'a>(node: &'a AstNode<'a>) -> Option<&'static str> {
    match &node.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(if symbol.is_some() { "✓" } else { "□" }),
        _ => None,
    }
}

fn find_task_marker<'a>(node: &'a AstNode<'a>) -> Option<&'static str> {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::TaskItem(symbol) => {
                return Some(if symbol.is_some() { "✓" } else { "□" });
            }
            _ => {
                if let Some(found) = find_task_marker(child) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let mut tokens: Vec<InlineSpan> = Vec::new();
    for span in spans {
        tokens.extend(split_inline_tokens(span));
    }

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let start_new_line = |prefix: &str,
                          current: &mut Vec<InlineSpan>,
                          current_len: &mut usize,
                          has_word: &mut bool| {
        current.clear();
        if !prefix.is_empty() {
            current.push(InlineSpan::new(prefix.to_string(), InlineStyle::default()));
            *current_len = prefix.chars().count();
        } else {
            *current_len = 0;
        }
        *has_word = false;
    };

    start_new_line(prefix_first, &mut current, &mut current_len, &mut has_word);

    for token in tokens {
        let token_len = token.text().chars().count();
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            lines.push(current.clone());
            start_new_line(prefix_next, &mut current, &mut current_len, &mut has_word);
        }

        if token_is_ws && !has_word {
            // Drop leading whitespace at wrapped line starts.
            continue;
        }

        current_len += token_len;
        current.push(token);
        if !token_is_ws {
            has_word = true;
        }
    }

    if current.is_empty() && !prefix_first.is_empty() {
        current.push(InlineSpan::new(
            prefix_first.to_string(),
            InlineStyle::default(),
        ));
    }

    lines.push(current);
    lines
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        match ws_state {
            Some(state) if state == is_ws => {
                buf.push(ch);
            }
            Some(_) => {
                out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
                buf.push(ch);
                ws_state = Some(is_ws);
            }
            None => {
                buf.push(ch);
                ws_state = Some(is_ws);
            }
        }
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }

    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    let mut content = String::new();
    for span in spans {
        content.push_str(span.text());
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heading_and_paragraph() {
        let doc = Document::parse("# Intro\n\nSome prose here.").unwrap();
        assert_eq!(doc.headings().len(), 1);
        assert_eq!(doc.headings()[0].text, "Intro");
        assert_eq!(doc.headings()[0].level, 1);
        assert!(doc.line_count() >= 3);
    }

    #[test]
    fn test_heading_lines_point_at_heading_rows() {
        let doc = Document::parse("# One\n\nbody\n\n## Two\n\nmore body").unwrap();
        for heading in doc.headings() {
            let line = doc.line_at(heading.line).unwrap();
            assert!(
                matches!(line.line_type(), LineType::Heading(_)),
                "heading {} should point at a heading row",
                heading.text
            );
            assert_eq!(line.content(), heading.text);
        }
    }

    #[test]
    fn test_inline_code_in_heading_text_is_plain() {
        let doc = Document::parse("## Run `kinit` first").unwrap();
        assert_eq!(doc.headings()[0].text, "Run kinit first");
    }

    #[test]
    fn test_paragraph_wraps_to_width() {
        let prose = "word ".repeat(30);
        let doc = Document::parse_with_layout(&prose, 20).unwrap();
        for line in doc.visible_lines(0, doc.line_count()) {
            assert!(
                line.content().chars().count() <= 20,
                "line too wide: {:?}",
                line.content()
            );
        }
    }

    #[test]
    fn test_code_block_is_framed() {
        let doc = Document::parse("```sh\nkinit admin\n```").unwrap();
        let contents: Vec<&str> = doc
            .visible_lines(0, doc.line_count())
            .iter()
            .map(RenderedLine::content)
            .collect();
        assert!(contents[0].starts_with("┌ sh "));
        assert!(contents[1].contains("kinit admin"));
        assert!(contents[2].starts_with('└'));
    }

    #[test]
    fn test_links_are_collected() {
        let doc = Document::parse("See [the docs](https://example.net/docs) for more.").unwrap();
        assert_eq!(doc.links().len(), 1);
        assert_eq!(doc.links()[0].url, "https://example.net/docs");
        assert_eq!(doc.links()[0].text, "the docs");
    }

    #[test]
    fn test_bullet_list_renders_markers() {
        let doc = Document::parse("- one\n- two\n").unwrap();
        let first = doc.line_at(0).unwrap();
        assert!(first.content().starts_with("• one"));
        assert_eq!(first.line_type(), &LineType::ListItem(1));
    }

    #[test]
    fn test_ordered_list_keeps_numbering() {
        let doc = Document::parse("1. first\n2. second\n").unwrap();
        let contents: Vec<&str> = doc
            .visible_lines(0, doc.line_count())
            .iter()
            .map(RenderedLine::content)
            .collect();
        assert!(contents[0].starts_with("1. first"));
        assert!(contents[1].starts_with("2. second"));
    }

    #[test]
    fn test_blockquote_prefixed() {
        let doc = Document::parse("> quoted wisdom").unwrap();
        let first = doc.line_at(0).unwrap();
        assert_eq!(first.line_type(), &LineType::BlockQuote);
        assert!(first.content().contains("│ quoted wisdom"));
    }

    #[test]
    fn test_table_renders_with_borders() {
        let doc = Document::parse("| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();
        let contents: Vec<&str> = doc
            .visible_lines(0, doc.line_count())
            .iter()
            .map(RenderedLine::content)
            .collect();
        assert!(contents[0].starts_with('┌'));
        assert!(contents.iter().any(|l| l.contains("│ a │ b │")));
    }

    #[test]
    fn test_image_reduced_to_placeholder_text() {
        let doc = Document::parse("![diagram](topo.png)").unwrap();
        let first = doc.line_at(0).unwrap();
        assert!(first.content().contains("[image: diagram]"));
    }

    #[test]
    fn test_no_trailing_blank_lines() {
        let doc = Document::parse("# Title\n\nbody\n\n\n").unwrap();
        let last = doc.line_at(doc.line_count() - 1).unwrap();
        assert!(!matches!(last.line_type(), LineType::Empty));
    }
}
