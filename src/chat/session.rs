//! Submitting questions against a shared conversation.
//!
//! At most one question is in flight. The conversation lock is released
//! while the expert is being queried so front ends can keep rendering.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, warn};

use super::conversation::Conversation;
use super::message::ChatMessage;
use crate::gemini::TaxExpert;

/// State changes published to front ends.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    MessageAppended(ChatMessage),
    LoadingChanged(bool),
}

/// Result of a submit call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Input was empty or whitespace only; nothing happened.
    Empty,
    /// A question is already in flight; nothing happened.
    Busy,
    /// The expert answered.
    Answered {
        question: ChatMessage,
        answer: ChatMessage,
    },
    /// The expert failed and the fallback message was appended.
    Failed {
        question: ChatMessage,
        answer: ChatMessage,
    },
}

impl SubmitOutcome {
    /// The assistant message appended by this submit, if any.
    pub fn answer(&self) -> Option<&ChatMessage> {
        match self {
            SubmitOutcome::Answered { answer, .. } | SubmitOutcome::Failed { answer, .. } => {
                Some(answer)
            }
            SubmitOutcome::Empty | SubmitOutcome::Busy => None,
        }
    }
}

/// A conversation bound to a tax expert.
///
/// Cloning is cheap and clones share the same conversation.
#[derive(Clone)]
pub struct ChatSession {
    conversation: Arc<Mutex<Conversation>>,
    expert: Arc<dyn TaxExpert>,
    events: Option<mpsc::UnboundedSender<ChatEvent>>,
}

impl ChatSession {
    pub fn new(expert: Arc<dyn TaxExpert>) -> Self {
        Self {
            conversation: Arc::new(Mutex::new(Conversation::new())),
            expert,
            events: None,
        }
    }

    /// Publish every state change to `sender`.
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<ChatEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn model(&self) -> &str {
        self.expert.model()
    }

    /// Ask a question.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        if input.trim().is_empty() {
            return SubmitOutcome::Empty;
        }

        let question = {
            let mut conversation = self.conversation.lock().await;
            if conversation.is_loading() {
                debug!("Ignoring submit while a request is in flight");
                return SubmitOutcome::Busy;
            }
            let question = ChatMessage::user(input);
            conversation.push(question.clone());
            conversation.set_loading(true);
            question
        };
        let mut loading = LoadingGuard {
            conversation: Arc::clone(&self.conversation),
            events: self.events.clone(),
            armed: true,
        };
        self.emit(ChatEvent::MessageAppended(question.clone()));
        self.emit(ChatEvent::LoadingChanged(true));

        let result = self.expert.query(input).await;

        let (answer, failed) = match result {
            Ok(response) => {
                debug!(sources = response.sources.len(), "Tax expert answered");
                (ChatMessage::assistant(response.answer, response.sources), false)
            }
            Err(e) => {
                error!("Tax expert request failed: {}", e);
                (ChatMessage::fallback(), true)
            }
        };

        {
            let mut conversation = self.conversation.lock().await;
            conversation.push(answer.clone());
            conversation.set_loading(false);
        }
        loading.armed = false;
        self.emit(ChatEvent::MessageAppended(answer.clone()));
        self.emit(ChatEvent::LoadingChanged(false));

        if failed {
            SubmitOutcome::Failed { question, answer }
        } else {
            SubmitOutcome::Answered { question, answer }
        }
    }

    /// Snapshot of all messages in order.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.conversation.lock().await.messages().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.conversation.lock().await.len()
    }

    pub async fn is_loading(&self) -> bool {
        self.conversation.lock().await.is_loading()
    }

    pub async fn show_suggestions(&self) -> bool {
        self.conversation.lock().await.show_suggestions()
    }

    /// Sources of the latest answer that cited any.
    pub async fn latest_sources(&self) -> Vec<super::Source> {
        self.conversation.lock().await.latest_sources().to_vec()
    }

    fn emit(&self, event: ChatEvent) {
        if let Some(sender) = &self.events {
            // Receiver gone means the front end shut down; the log still updates.
            let _ = sender.send(event);
        }
    }
}

/// Clears the loading flag if a submit is cancelled or panics mid-query.
struct LoadingGuard {
    conversation: Arc<Mutex<Conversation>>,
    events: Option<mpsc::UnboundedSender<ChatEvent>>,
    armed: bool,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("Submit abandoned before an answer arrived");

        if let Ok(mut conversation) = self.conversation.try_lock() {
            conversation.set_loading(false);
        } else if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let conversation = Arc::clone(&self.conversation);
            handle.spawn(async move {
                conversation.lock().await.set_loading(false);
            });
        }
        if let Some(sender) = &self.events {
            let _ = sender.send(ChatEvent::LoadingChanged(false));
        }
    }
}
