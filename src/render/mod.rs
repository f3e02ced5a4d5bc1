//! Message rendering.
//!
//! [`format`] turns message text into line blocks. [`TerminalRenderer`]
//! draws them with crossterm; [`html`] produces markup for browser front
//! ends.

pub mod format;
pub mod html;
mod terminal;

use unicode_segmentation::UnicodeSegmentation;

pub use format::{format_content, Block, Inline};
pub use html::{content_html, message_html};
pub use terminal::{RenderStyle, TerminalRenderer};

/// Longest source title shown before it is cut.
pub const MAX_TITLE_LEN: usize = 30;

/// Shorten a source title to [`MAX_TITLE_LEN`] characters plus an ellipsis.
pub fn truncate_title(title: &str) -> String {
    let graphemes: Vec<&str> = title.graphemes(true).collect();
    if graphemes.len() > MAX_TITLE_LEN {
        format!("{}...", graphemes[..MAX_TITLE_LEN].concat())
    } else {
        title.to_string()
    }
}
