//! Chat message types.
//!
//! Messages are created once and never edited: user messages on submit,
//! assistant messages when a query resolves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of the fixed first message of every conversation.
pub const WELCOME_ID: &str = "welcome";

/// Greeting shown before the user asks anything.
pub const WELCOME_TEXT: &str = "Hello! I am your AI UAE Tax Expert. I can provide detailed guidance on Corporate Tax, VAT, and Excise Tax, citing specific FTA Decree-Laws and Articles.\n\nHow can I assist you with your UAE tax compliance today?";

/// Text of the assistant message appended when a query fails.
pub const FALLBACK_TEXT: &str = "I encountered an error while processing your request. Please ensure you have a valid internet connection or try again later.";

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Label shown above a message bubble.
    pub fn label(self) -> &'static str {
        match self {
            MessageRole::User => "Taxpayer",
            MessageRole::Assistant => "FTA Compliance Expert",
        }
    }
}

/// A web citation returned alongside a grounded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

impl Source {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::User,
            content: content.into(),
            sources: None,
            timestamp: Utc::now(),
        }
    }

    /// Assistant message carrying an answer and its grounding sources.
    pub fn assistant(content: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            content: content.into(),
            sources: Some(sources),
            timestamp: Utc::now(),
        }
    }

    /// The apology appended in place of an answer when the service fails.
    pub fn fallback() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            content: FALLBACK_TEXT.to_string(),
            sources: None,
            timestamp: Utc::now(),
        }
    }

    pub fn welcome() -> Self {
        Self {
            id: WELCOME_ID.to_string(),
            role: MessageRole::Assistant,
            content: WELCOME_TEXT.to_string(),
            sources: None,
            timestamp: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Sources attached to this message, empty when there are none.
    pub fn sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or(&[])
    }
}
