//! Terminal renderer for chat messages.

use std::io::{self, Write};

use chrono::Local;
use crossterm::{
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    QueueableCommand,
};

use super::format::{format_content, Block, Inline};
use super::truncate_title;
use crate::chat::{ChatMessage, MessageRole, Source};

/// Render style configuration.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub user_color: Color,
    pub assistant_color: Color,
    pub heading_color: Color,
    pub bullet_color: Color,
    pub source_color: Color,
    pub muted_color: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            user_color: Color::Blue,
            assistant_color: Color::Cyan,
            heading_color: Color::Cyan,
            bullet_color: Color::Blue,
            source_color: Color::Blue,
            muted_color: Color::DarkGrey,
        }
    }
}

/// Renders messages as terminal "bubbles".
pub struct TerminalRenderer {
    style: RenderStyle,
    width: usize,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    /// Create a renderer sized to the current terminal.
    pub fn new() -> Self {
        let width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);
        Self::with_width(width)
    }

    /// Create with a specific width.
    pub fn with_width(width: usize) -> Self {
        Self {
            style: RenderStyle::default(),
            width: width.max(20),
        }
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Render a message to stdout.
    pub fn render(&self, message: &ChatMessage) -> io::Result<()> {
        let mut stdout = io::stdout();
        self.render_to(&mut stdout, message)?;
        stdout.flush()
    }

    /// Render a message to any writer.
    pub fn render_to<W: Write>(&self, out: &mut W, message: &ChatMessage) -> io::Result<()> {
        self.render_header(out, message)?;

        for block in format_content(&message.content) {
            self.render_block(out, &block)?;
        }

        if !message.sources().is_empty() {
            self.render_sources(out, message.sources())?;
        }

        out.queue(Print("\n"))?;
        out.flush()
    }

    fn render_header<W: Write>(&self, out: &mut W, message: &ChatMessage) -> io::Result<()> {
        let (color, icon) = match message.role {
            MessageRole::User => (self.style.user_color, "👤"),
            MessageRole::Assistant => (self.style.assistant_color, "⚖"),
        };
        let label = message.role.label();
        let time = message.timestamp.with_timezone(&Local).format("%H:%M").to_string();

        // Icon and separators take a few columns on top of label and time.
        let used = label.chars().count() + time.len() + 4;
        let gap = self.width.saturating_sub(used).min(40).max(1);

        out.queue(SetForegroundColor(color))?
            .queue(SetAttribute(Attribute::Bold))?
            .queue(Print(format!("{icon} {label}")))?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(SetForegroundColor(self.style.muted_color))?
            .queue(Print(format!("{}{}\n", " ".repeat(gap), time)))?
            .queue(ResetColor)?;
        Ok(())
    }

    fn render_block<W: Write>(&self, out: &mut W, block: &Block) -> io::Result<()> {
        match block {
            Block::Paragraph(inlines) => {
                out.queue(Print("  "))?;
                self.render_inlines(out, inlines)?;
            }
            Block::ListItem(inlines) => {
                out.queue(SetForegroundColor(self.style.bullet_color))?
                    .queue(Print("    • "))?
                    .queue(ResetColor)?;
                self.render_inlines(out, inlines)?;
            }
            Block::Heading2(inlines) => {
                out.queue(Print("\n  "))?
                    .queue(SetForegroundColor(self.style.heading_color))?
                    .queue(SetAttribute(Attribute::Bold))?;
                self.render_inlines(out, inlines)?;
                let rule = "─".repeat(block.plain_text().chars().count().min(self.width - 2));
                out.queue(SetAttribute(Attribute::Reset))?
                    .queue(SetForegroundColor(self.style.muted_color))?
                    .queue(Print(format!("\n  {rule}")))?
                    .queue(ResetColor)?;
            }
            Block::Heading3(inlines) => {
                out.queue(Print("\n  "))?
                    .queue(SetForegroundColor(self.style.heading_color))?
                    .queue(SetAttribute(Attribute::Bold))?;
                self.render_inlines(out, inlines)?;
                out.queue(SetAttribute(Attribute::Reset))?
                    .queue(ResetColor)?;
            }
        }
        out.queue(Print("\n"))?;
        Ok(())
    }

    fn render_inlines<W: Write>(&self, out: &mut W, inlines: &[Inline]) -> io::Result<()> {
        for inline in inlines {
            match inline {
                Inline::Text(text) => {
                    out.queue(Print(text))?;
                }
                Inline::Bold(text) => {
                    out.queue(SetAttribute(Attribute::Bold))?
                        .queue(Print(text))?
                        .queue(SetAttribute(Attribute::NormalIntensity))?;
                }
            }
        }
        Ok(())
    }

    fn render_sources<W: Write>(&self, out: &mut W, sources: &[Source]) -> io::Result<()> {
        let rule = "─".repeat((self.width - 2).min(60));
        out.queue(SetForegroundColor(self.style.muted_color))?
            .queue(Print(format!("  {rule}\n")))?
            .queue(SetAttribute(Attribute::Bold))?
            .queue(Print("  LEGAL REFERENCES & SOURCES\n"))?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(ResetColor)?;

        for (idx, source) in sources.iter().enumerate() {
            out.queue(SetForegroundColor(self.style.muted_color))?
                .queue(Print(format!("  [{}] ", idx + 1)))?
                .queue(SetForegroundColor(self.style.source_color))?
                .queue(Print(truncate_title(&source.title)))?
                .queue(SetForegroundColor(self.style.muted_color))?
                .queue(Print(format!("  {}\n", source.uri)))?
                .queue(ResetColor)?;
        }
        Ok(())
    }

    /// Print the numbered starter questions.
    pub fn render_suggestions<W: Write>(&self, out: &mut W, suggestions: &[&str]) -> io::Result<()> {
        for (idx, suggestion) in suggestions.iter().enumerate() {
            out.queue(SetForegroundColor(self.style.bullet_color))?
                .queue(Print(format!("  › {} ", idx + 1)))?
                .queue(ResetColor)?
                .queue(Print(format!("{suggestion}\n")))?;
        }
        out.queue(SetForegroundColor(self.style.muted_color))?
            .queue(Print("  Type /suggest <n> to ask one of these.\n\n"))?
            .queue(ResetColor)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(message: &ChatMessage) -> String {
        let mut buf = Vec::new();
        TerminalRenderer::with_width(80)
            .render_to(&mut buf, message)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_user_message_has_label_and_content() {
        let out = render(&ChatMessage::user("VAT rate in UAE?"));
        assert!(out.contains("Taxpayer"));
        assert!(out.contains("VAT rate in UAE?"));
        assert!(!out.contains("LEGAL REFERENCES"));
    }

    #[test]
    fn test_assistant_message_formats_blocks() {
        let msg = ChatMessage::assistant(
            "## Direct Answer\n- **Rate**: 5%\n### Legal Basis",
            vec![],
        );
        let out = render(&msg);
        assert!(out.contains("FTA Compliance Expert"));
        assert!(out.contains("Direct Answer"));
        assert!(!out.contains("## "));
        assert!(out.contains("• "));
        assert!(out.contains("Rate"));
        assert!(!out.contains("**"));
        assert!(out.contains("Legal Basis"));
    }

    #[test]
    fn test_sources_are_numbered_and_truncated() {
        let msg = ChatMessage::assistant(
            "answer",
            vec![
                Source::new("Federal Decree-Law No. 8 of 2017 on Value Added Tax", "https://tax.gov.ae/vat"),
                Source::new("FTA", "https://tax.gov.ae"),
            ],
        );
        let out = render(&msg);
        assert!(out.contains("LEGAL REFERENCES & SOURCES"));
        assert!(out.contains("[1] "));
        assert!(out.contains("Federal Decree-Law No. 8 of 20..."));
        assert!(out.contains("[2] "));
        assert!(out.contains("https://tax.gov.ae/vat"));
    }

    #[test]
    fn test_render_suggestions() {
        let mut buf = Vec::new();
        TerminalRenderer::with_width(80)
            .render_suggestions(&mut buf, &["first question?", "second question?"])
            .unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("1 first question?"));
        assert!(out.contains("2 second question?"));
        assert!(out.contains("/suggest"));
    }
}
