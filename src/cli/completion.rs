//! Reedline prompt, completion and highlighting for the REPL.
//!
//! Type "/" then Tab to see commands.

use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, Emacs, Highlighter, KeyCode, KeyModifiers, MenuBuilder, Prompt,
    PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline, ReedlineEvent,
    ReedlineMenu, Span, StyledText, Suggestion,
};
use std::borrow::Cow;

use crate::chat::SUGGESTIONS;

/// All slash commands with descriptions
pub const COMMANDS: &[(&str, &str)] = &[
    ("/clear", "Clear screen"),
    ("/exit", "Exit"),
    ("/h", "Show help"),
    ("/help", "Show help"),
    ("/history", "Show the conversation so far"),
    ("/open", "Open a source in the browser"),
    ("/q", "Exit"),
    ("/quit", "Exit"),
    ("/sources", "List sources of the latest answer"),
    ("/suggest", "Ask a suggested question"),
];

/// Completer for slash commands and `/suggest` numbers.
#[derive(Clone, Default)]
pub struct TaxCompleter;

impl TaxCompleter {
    pub fn new() -> Self {
        Self
    }
}

impl Completer for TaxCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if pos > line.len() {
            return Vec::new();
        }

        let input = &line[..pos];

        if input.is_empty() || !input.starts_with('/') {
            return Vec::new();
        }

        if !input.contains(' ') {
            let prefix = input.to_lowercase();
            return COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(&prefix))
                .map(|(cmd, desc)| Suggestion {
                    value: cmd.to_string(),
                    description: Some(desc.to_string()),
                    extra: None,
                    span: Span::new(0, pos),
                    append_whitespace: true,
                    style: None,
                })
                .collect();
        }

        if input.starts_with("/suggest ") {
            let start = input.find(' ').map(|i| i + 1).unwrap_or(pos);
            return SUGGESTIONS
                .iter()
                .enumerate()
                .map(|(idx, text)| Suggestion {
                    value: (idx + 1).to_string(),
                    description: Some(text.to_string()),
                    extra: None,
                    span: Span::new(start, pos),
                    append_whitespace: false,
                    style: None,
                })
                .collect();
        }

        Vec::new()
    }
}

/// Prompt showing the model in use.
pub struct TaxPrompt {
    pub model_name: String,
}

impl TaxPrompt {
    pub fn new(model: &str) -> Self {
        Self {
            model_name: model.to_string(),
        }
    }
}

impl Prompt for TaxPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(format!(
            "\x1b[1;34mTaxpayer\x1b[0m \x1b[2m[{}]\x1b[0m",
            self.model_name
        ))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed(" › ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(&self, hs: PromptHistorySearch) -> Cow<'_, str> {
        let prefix = match hs.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!("({}search: {}) ", prefix, hs.term))
    }
}

/// Syntax highlighter for slash commands
#[derive(Clone)]
pub struct TaxHighlighter;

impl Highlighter for TaxHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.starts_with('/') {
            let cmd_end = line.find(' ').unwrap_or(line.len());
            let cmd = &line[..cmd_end];
            let is_valid = COMMANDS.iter().any(|(c, _)| *c == cmd);

            if is_valid {
                styled.push((Style::new().fg(Color::Cyan).bold(), cmd.to_string()));
            } else {
                styled.push((Style::new().fg(Color::Yellow), cmd.to_string()));
            }

            if cmd_end < line.len() {
                styled.push((Style::default(), line[cmd_end..].to_string()));
            }
        } else {
            styled.push((Style::default(), line.to_string()));
        }

        styled
    }
}

/// Create reedline with Tab-triggered completion menu
pub fn create_reedline(completer: TaxCompleter) -> Reedline {
    let completion_menu = Box::new(
        ColumnarMenu::default()
            .with_name("completion_menu")
            .with_columns(1)
            .with_column_padding(2)
            .with_text_style(Style::new().fg(Color::Default))
            .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan))
            .with_description_text_style(Style::new().fg(Color::DarkGray)),
    );

    let mut keybindings = reedline::default_emacs_keybindings();

    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::SHIFT,
        KeyCode::BackTab,
        ReedlineEvent::MenuPrevious,
    );

    Reedline::create()
        .with_completer(Box::new(completer))
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_quick_completions(true)
        .with_partial_completions(true)
        .with_highlighter(Box::new(TaxHighlighter))
        .with_edit_mode(Box::new(Emacs::new(keybindings)))
}

/// Pick a starter question with dialoguer.
pub fn pick_suggestion() -> Option<&'static str> {
    use dialoguer::{theme::ColorfulTheme, Select};

    Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Suggested questions")
        .items(SUGGESTIONS)
        .default(0)
        .interact_opt()
        .ok()
        .flatten()
        .and_then(|idx| SUGGESTIONS.get(idx).copied())
}
