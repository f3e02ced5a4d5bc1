//! UAE Tax Advisor Library
//!
//! Core of the `taxpro` chat client: a grounded Gemini tax expert, an
//! append-only conversation and the renderers that display it.
//!
//! ## Main Components
//!
//! - [`chat`] - Conversation state and question submission
//! - [`cli`] - Command-line interface (REPL, bridge, runner)
//! - [`config`] - Settings from the environment
//! - [`gemini`] - Gemini client with Google Search grounding
//! - [`render`] - Markdown-ish line formatting for terminal and HTML
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tax_advisor::{ChatSession, GeminiClient, Settings};
//!
//! let client = GeminiClient::new(Settings::from_env()?);
//! let session = ChatSession::new(Arc::new(client));
//! let outcome = session.submit("What is the VAT rate?").await;
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod gemini;
pub mod render;

// Re-export commonly used types
pub use chat::{
    ChatEvent, ChatMessage, ChatSession, Conversation, MessageRole, Source, SubmitOutcome,
    SUGGESTIONS,
};
pub use config::{Settings, SettingsError};
pub use gemini::{GeminiClient, QueryResponse, ServiceError, TaxExpert};
pub use render::{format_content, message_html, Block, Inline, TerminalRenderer};
