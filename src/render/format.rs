//! Line-oriented formatting of answer text.
//!
//! Each line is classified on its own: `- ` list items, `### ` and `## `
//! headings, everything else a paragraph. `**bold**` spans are recognised
//! inside any line. There is no nesting and no multi-line construct.

use regex::Regex;
use std::sync::OnceLock;

/// A run of text within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
}

/// One formatted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    ListItem(Vec<Inline>),
    Heading2(Vec<Inline>),
    Heading3(Vec<Inline>),
}

impl Block {
    pub fn inlines(&self) -> &[Inline] {
        match self {
            Block::Paragraph(i) | Block::ListItem(i) | Block::Heading2(i) | Block::Heading3(i) => i,
        }
    }

    /// Text with formatting markers removed.
    pub fn plain_text(&self) -> String {
        self.inlines()
            .iter()
            .map(|inline| match inline {
                Inline::Text(t) | Inline::Bold(t) => t.as_str(),
            })
            .collect()
    }
}

fn bold_pattern() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    // Literal pattern, cannot fail to compile.
    BOLD.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").unwrap())
}

/// Split a line into plain and bold runs.
pub fn parse_inlines(line: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut last = 0;

    for caps in bold_pattern().captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            inlines.push(Inline::Text(line[last..whole.start()].to_string()));
        }
        inlines.push(Inline::Bold(inner.as_str().to_string()));
        last = whole.end();
    }

    if last < line.len() {
        inlines.push(Inline::Text(line[last..].to_string()));
    }

    inlines
}

/// Classify a single line.
///
/// Markers are matched on the line with surrounding whitespace removed, so a
/// bare `- ` or `### ` has nothing after its marker and stays a paragraph.
pub fn format_line(line: &str) -> Block {
    let trimmed = line.trim();

    if let Some(rest) = trimmed.strip_prefix("- ") {
        return Block::ListItem(parse_inlines(rest));
    }
    if let Some(rest) = trimmed.strip_prefix("### ") {
        return Block::Heading3(parse_inlines(rest));
    }
    if let Some(rest) = trimmed.strip_prefix("## ") {
        return Block::Heading2(parse_inlines(rest));
    }

    Block::Paragraph(parse_inlines(line))
}

/// Format message content, one block per line.
pub fn format_content(text: &str) -> Vec<Block> {
    text.split('\n')
        .map(|line| format_line(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn bold(s: &str) -> Inline {
        Inline::Bold(s.to_string())
    }

    #[test]
    fn test_plain_paragraph() {
        assert_eq!(
            format_line("The rate is 5%."),
            Block::Paragraph(vec![text("The rate is 5%.")])
        );
    }

    #[test]
    fn test_bold_spans_are_non_greedy() {
        assert_eq!(
            parse_inlines("**Direct Answer**: yes, see **Article 2**."),
            vec![
                bold("Direct Answer"),
                text(": yes, see "),
                bold("Article 2"),
                text("."),
            ]
        );
    }

    #[test]
    fn test_unclosed_bold_stays_literal() {
        assert_eq!(parse_inlines("**open only"), vec![text("**open only")]);
    }

    #[test]
    fn test_bold_does_not_span_lines() {
        let blocks = format_content("**start\nend**");
        assert_eq!(blocks[0], Block::Paragraph(vec![text("**start")]));
        assert_eq!(blocks[1], Block::Paragraph(vec![text("end**")]));
    }

    #[test]
    fn test_list_item() {
        assert_eq!(
            format_line("- **Legal Basis**: Article 29"),
            Block::ListItem(vec![bold("Legal Basis"), text(": Article 29")])
        );
        assert_eq!(
            format_line("   - indented"),
            Block::ListItem(vec![text("indented")])
        );
    }

    #[test]
    fn test_headings() {
        assert_eq!(
            format_line("## Direct Answer"),
            Block::Heading2(vec![text("Direct Answer")])
        );
        assert_eq!(
            format_line("### Practical Implementation"),
            Block::Heading3(vec![text("Practical Implementation")])
        );
        // Level-one headings are not recognised.
        assert_eq!(format_line("# Title"), Block::Paragraph(vec![text("# Title")]));
    }

    #[test]
    fn test_marker_only_lines_are_paragraphs() {
        assert_eq!(format_line("- "), Block::Paragraph(vec![text("- ")]));
        assert_eq!(format_line("### "), Block::Paragraph(vec![text("### ")]));
        assert_eq!(format_line("  ##   "), Block::Paragraph(vec![text("  ##   ")]));
    }

    #[test]
    fn test_marker_content_is_trimmed() {
        assert_eq!(
            format_line("  - Article 29  "),
            Block::ListItem(vec![text("Article 29")])
        );
        assert_eq!(
            format_line("### Basis\t"),
            Block::Heading3(vec![text("Basis")])
        );
    }

    #[test]
    fn test_markers_need_trailing_space() {
        assert_eq!(format_line("-5% rate"), Block::Paragraph(vec![text("-5% rate")]));
        assert_eq!(format_line("##Heading"), Block::Paragraph(vec![text("##Heading")]));
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let blocks = format_content("Hello!\n\nHow can I help?");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1], Block::Paragraph(vec![]));
    }

    #[test]
    fn test_crlf_lines() {
        let blocks = format_content("## Title\r\nBody");
        assert_eq!(blocks[0], Block::Heading2(vec![text("Title")]));
        assert_eq!(blocks[1].plain_text(), "Body");
    }

    #[test]
    fn test_plain_text_strips_markers() {
        assert_eq!(
            format_line("- **VAT**: 5%").plain_text(),
            "VAT: 5%"
        );
    }
}
