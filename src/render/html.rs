//! HTML rendering for browser front ends attached through the bridge.

use chrono::Local;

use super::format::{format_content, Block, Inline};
use super::truncate_title;
use crate::chat::{ChatMessage, MessageRole};

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn inlines_html(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(t) => escape_html(t),
            Inline::Bold(t) => format!("<strong>{}</strong>", escape_html(t)),
        })
        .collect()
}

/// Render message content as a sequence of HTML elements.
pub fn content_html(content: &str) -> String {
    format_content(content)
        .iter()
        .map(|block| match block {
            Block::ListItem(i) => format!("<li>{}</li>", inlines_html(i)),
            Block::Heading3(i) => format!("<h3>{}</h3>", inlines_html(i)),
            Block::Heading2(i) => format!("<h2>{}</h2>", inlines_html(i)),
            Block::Paragraph(i) => format!("<p>{}</p>", inlines_html(i)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a complete message bubble.
pub fn message_html(message: &ChatMessage) -> String {
    let role_class = match message.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    };
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");

    let mut html = format!(
        "<div class=\"message message-{role_class}\" data-id=\"{}\">\n\
         <div class=\"message-header\"><span class=\"role\">{}</span><span class=\"time\">{time}</span></div>\n\
         <div class=\"message-content\">\n{}\n</div>",
        escape_html(&message.id),
        message.role.label(),
        content_html(&message.content),
    );

    if !message.sources().is_empty() {
        html.push_str("\n<div class=\"message-sources\">\n<p class=\"sources-title\">Legal References &amp; Sources</p>\n");
        for source in message.sources() {
            html.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>\n",
                escape_html(&source.uri),
                escape_html(&truncate_title(&source.title)),
            ));
        }
        html.push_str("</div>");
    }

    html.push_str("\n</div>");
    html
}
