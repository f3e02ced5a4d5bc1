//! Conversation state
//!
//! An append-only message log that always starts with the welcome message.

use super::message::{ChatMessage, MessageRole, Source};

/// A conversation (list of messages)
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    is_loading: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::welcome()],
            is_loading: false,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    /// Starter questions are offered until the first question is asked.
    pub fn show_suggestions(&self) -> bool {
        self.messages.len() == 1 && !self.is_loading
    }

    /// Sources of the most recent assistant message that has any.
    pub fn latest_sources(&self) -> &[Source] {
        self.messages
            .iter()
            .rev()
            .filter(|m| m.role == MessageRole::Assistant)
            .map(|m| m.sources())
            .find(|s| !s.is_empty())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::WELCOME_ID;

    #[test]
    fn test_new_conversation_starts_with_welcome() {
        let conv = Conversation::new();
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0].id, WELCOME_ID);
        assert!(!conv.is_loading());
        assert!(conv.show_suggestions());
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut conv = Conversation::new();
        conv.push(ChatMessage::user("first"));
        conv.push(ChatMessage::assistant("second", vec![]));

        let contents: Vec<&str> = conv.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents[1..], ["first", "second"]);
        assert!(!conv.show_suggestions());
    }

    #[test]
    fn test_suggestions_hidden_while_loading() {
        let mut conv = Conversation::new();
        conv.set_loading(true);
        assert!(!conv.show_suggestions());
    }

    #[test]
    fn test_latest_sources_skips_answers_without_sources() {
        let mut conv = Conversation::new();
        assert!(conv.latest_sources().is_empty());

        conv.push(ChatMessage::user("q1"));
        conv.push(ChatMessage::assistant(
            "a1",
            vec![Source::new("VAT Guide", "https://tax.gov.ae/vat")],
        ));
        conv.push(ChatMessage::user("q2"));
        conv.push(ChatMessage::fallback());

        let sources = conv.latest_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "VAT Guide");
    }
}
