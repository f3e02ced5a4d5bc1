//! Conversation state.
//!
//! Holds the append-only message log and the single in-flight request
//! guard shared by every front end.

mod conversation;
mod message;
mod session;

pub use conversation::Conversation;
pub use message::{ChatMessage, MessageRole, Source, FALLBACK_TEXT, WELCOME_ID, WELCOME_TEXT};
pub use session::{ChatEvent, ChatSession, SubmitOutcome};

/// Starter questions offered before the first question is asked.
pub const SUGGESTIONS: &[&str] = &[
    "Corporate Tax registration requirements for Free Zone companies?",
    "VAT treatment for export of services outside the GCC?",
    "Excise tax rates on energy drinks and sweetened beverages?",
    "Administrative penalties for late VAT registration?",
];

/// Look up a starter question by its 1-based number.
pub fn suggestion(number: usize) -> Option<&'static str> {
    number.checked_sub(1).and_then(|i| SUGGESTIONS.get(i)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_lookup_is_one_based() {
        assert_eq!(suggestion(1), Some(SUGGESTIONS[0]));
        assert_eq!(suggestion(4), Some(SUGGESTIONS[3]));
        assert_eq!(suggestion(0), None);
        assert_eq!(suggestion(5), None);
    }
}
