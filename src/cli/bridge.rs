//! Bridge mode for external UI communication.
//!
//! NDJSON protocol for browser and editor front ends. Every message is a
//! JSON object on its own line.
//!
//! ## Protocol
//!
//! ### Outbound Messages (stdout)
//! ```json
//! {"type": "ready", "version": "0.3.2", "model": "...", "messages": [...], "suggestions": [...]}
//! {"type": "message", "message": {...}, "html": "<div ...>"}
//! {"type": "loading", "active": true}
//! {"type": "busy"}
//! {"type": "error", "message": "..."}
//! ```
//!
//! ### Inbound Commands (stdin)
//! ```json
//! {"type": "prompt", "text": "..."}
//! {"type": "history"}
//! {"type": "suggestions"}
//! ```

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::chat::{ChatEvent, ChatMessage, ChatSession, SubmitOutcome, SUGGESTIONS};
use crate::gemini::TaxExpert;
use crate::render::message_html;

/// Outbound message types sent to the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeOutMessage {
    /// Bridge is ready to receive commands.
    Ready {
        version: String,
        model: String,
        messages: Vec<ChatMessage>,
        suggestions: Vec<String>,
    },
    /// A message was appended to the conversation.
    Message { message: ChatMessage, html: String },
    /// Loading indicator changed.
    Loading { active: bool },
    /// Prompt rejected because a question is already in flight.
    Busy,
    /// Prompt was empty.
    Ignored,
    /// Full conversation.
    History { messages: Vec<ChatMessage> },
    /// Starter questions.
    Suggestions { items: Vec<String> },
    /// Error occurred.
    Error { message: String },
}

impl BridgeOutMessage {
    fn from_event(event: ChatEvent) -> Self {
        match event {
            ChatEvent::MessageAppended(message) => {
                let html = message_html(&message);
                BridgeOutMessage::Message { message, html }
            }
            ChatEvent::LoadingChanged(active) => BridgeOutMessage::Loading { active },
        }
    }

    /// Extra notice for outcomes that produced no conversation events.
    fn from_outcome(outcome: &SubmitOutcome) -> Option<Self> {
        match outcome {
            SubmitOutcome::Empty => Some(BridgeOutMessage::Ignored),
            SubmitOutcome::Busy => Some(BridgeOutMessage::Busy),
            SubmitOutcome::Answered { .. } | SubmitOutcome::Failed { .. } => None,
        }
    }
}

/// Inbound commands from the UI.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeInCommand {
    /// Ask a question.
    Prompt { text: String },
    /// Request the full conversation.
    History,
    /// Request the starter questions.
    Suggestions,
}

fn suggestion_items() -> Vec<String> {
    SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

struct Bridge<W: Write> {
    session: ChatSession,
    writer: W,
}

impl<W: Write> Bridge<W> {
    fn emit(&mut self, msg: BridgeOutMessage) -> anyhow::Result<()> {
        let json = serde_json::to_string(&msg)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }

    async fn handle_history(&mut self) -> anyhow::Result<()> {
        let messages = self.session.messages().await;
        self.emit(BridgeOutMessage::History { messages })
    }
}

/// Run the bridge protocol over arbitrary streams.
///
/// Returns once the input is closed and every pending question has been
/// answered.
pub async fn run_bridge_with<R, W>(
    expert: Arc<dyn TaxExpert>,
    reader: R,
    writer: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<SubmitOutcome>();
    let mut bridge = Bridge {
        session: ChatSession::new(expert).with_events(event_tx),
        writer,
    };

    let messages = bridge.session.messages().await;
    bridge.emit(BridgeOutMessage::Ready {
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: bridge.session.model().to_string(),
        messages,
        suggestions: suggestion_items(),
    })?;

    let mut lines = reader.lines();
    let mut input_open = true;
    let mut in_flight = 0usize;

    loop {
        if !input_open && in_flight == 0 {
            break;
        }

        tokio::select! {
            biased;
            Some(event) = event_rx.recv() => {
                bridge.emit(BridgeOutMessage::from_event(event))?;
            }
            Some(outcome) = done_rx.recv() => {
                in_flight -= 1;
                debug!(?outcome, "Bridge submit finished");
                if let Some(msg) = BridgeOutMessage::from_outcome(&outcome) {
                    bridge.emit(msg)?;
                }
            }
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<BridgeInCommand>(&line) {
                    Ok(BridgeInCommand::Prompt { text }) => {
                        let session = bridge.session.clone();
                        let done = done_tx.clone();
                        in_flight += 1;
                        tokio::spawn(async move {
                            let outcome = session.submit(&text).await;
                            let _ = done.send(outcome);
                        });
                    }
                    Ok(BridgeInCommand::History) => bridge.handle_history().await?,
                    Ok(BridgeInCommand::Suggestions) => {
                        bridge.emit(BridgeOutMessage::Suggestions {
                            items: suggestion_items(),
                        })?;
                    }
                    Err(e) => {
                        warn!(error = %e, "Invalid bridge command");
                        bridge.emit(BridgeOutMessage::Error {
                            message: format!("Invalid JSON: {}", e),
                        })?;
                    }
                }
            }
        }
    }

    while let Ok(event) = event_rx.try_recv() {
        bridge.emit(BridgeOutMessage::from_event(event))?;
    }

    Ok(())
}

/// Run in bridge mode (NDJSON over stdio).
pub async fn run_bridge_mode(expert: Arc<dyn TaxExpert>) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_bridge_with(expert, stdin, std::io::stdout()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Source, WELCOME_ID};
    use crate::gemini::{QueryResponse, ServiceError};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::time::Duration;

    struct SlowExpert {
        delay: Duration,
    }

    #[async_trait]
    impl TaxExpert for SlowExpert {
        async fn query(&self, prompt: &str) -> Result<QueryResponse, ServiceError> {
            tokio::time::sleep(self.delay).await;
            Ok(QueryResponse {
                answer: format!("## Direct Answer\nYou asked: {}", prompt),
                sources: vec![Source::new("FTA", "https://tax.gov.ae")],
            })
        }

        fn model(&self) -> &str {
            "test-model"
        }
    }

    async fn run_lines(input: &str, delay: Duration) -> Vec<Value> {
        let expert: Arc<dyn TaxExpert> = Arc::new(SlowExpert { delay });
        let mut output = Vec::new();
        run_bridge_with(expert, input.as_bytes(), &mut output)
            .await
            .unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn types(messages: &[Value]) -> Vec<&str> {
        messages
            .iter()
            .map(|m| m["type"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_serialize_out_message() {
        let json = serde_json::to_string(&BridgeOutMessage::Loading { active: true }).unwrap();
        assert_eq!(json, r#"{"type":"loading","active":true}"#);
        let json = serde_json::to_string(&BridgeOutMessage::Busy).unwrap();
        assert_eq!(json, r#"{"type":"busy"}"#);
    }

    #[test]
    fn test_deserialize_in_command() {
        let json = r#"{"type": "prompt", "text": "Hello"}"#;
        let cmd: BridgeInCommand = serde_json::from_str(json).unwrap();
        match cmd {
            BridgeInCommand::Prompt { text } => assert_eq!(text, "Hello"),
            _ => panic!("Expected Prompt"),
        }
        let cmd: BridgeInCommand = serde_json::from_str(r#"{"type":"history"}"#).unwrap();
        assert!(matches!(cmd, BridgeInCommand::History));
    }

    #[tokio::test]
    async fn test_ready_on_start() {
        let out = run_lines("", Duration::ZERO).await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["type"], "ready");
        assert_eq!(out[0]["model"], "test-model");
        assert_eq!(out[0]["messages"][0]["id"], WELCOME_ID);
        assert_eq!(out[0]["suggestions"].as_array().unwrap().len(), SUGGESTIONS.len());
    }

    #[tokio::test]
    async fn test_prompt_round_trip() {
        let out = run_lines(
            "{\"type\":\"prompt\",\"text\":\"VAT rate?\"}\n",
            Duration::ZERO,
        )
        .await;
        assert_eq!(
            types(&out),
            vec!["ready", "message", "loading", "message", "loading"]
        );
        assert_eq!(out[1]["message"]["role"], "user");
        assert_eq!(out[2]["active"], true);
        assert_eq!(out[3]["message"]["role"], "assistant");
        assert_eq!(out[3]["message"]["sources"][0]["uri"], "https://tax.gov.ae");
        assert!(out[3]["html"].as_str().unwrap().contains("<h2>Direct Answer</h2>"));
        assert_eq!(out[4]["active"], false);
    }

    #[tokio::test]
    async fn test_blank_prompt_ignored() {
        let out = run_lines("{\"type\":\"prompt\",\"text\":\"   \"}\n", Duration::ZERO).await;
        assert_eq!(types(&out), vec!["ready", "ignored"]);
    }

    #[tokio::test]
    async fn test_second_prompt_is_busy() {
        let input = "{\"type\":\"prompt\",\"text\":\"first\"}\n\
                     {\"type\":\"prompt\",\"text\":\"second\"}\n";
        let out = run_lines(input, Duration::from_millis(50)).await;
        let kinds = types(&out);
        assert_eq!(kinds.iter().filter(|t| **t == "busy").count(), 1);
        assert_eq!(kinds.iter().filter(|t| **t == "message").count(), 2);
        assert_eq!(kinds.last(), Some(&"loading"));
    }

    #[tokio::test]
    async fn test_history_suggestions_and_errors() {
        let input = "{\"type\":\"history\"}\n\nnot json\n{\"type\":\"suggestions\"}\n";
        let out = run_lines(input, Duration::ZERO).await;
        assert_eq!(types(&out), vec!["ready", "history", "error", "suggestions"]);
        assert_eq!(out[1]["messages"].as_array().unwrap().len(), 1);
        assert!(out[2]["message"].as_str().unwrap().starts_with("Invalid JSON"));
        assert_eq!(out[3]["items"][0], SUGGESTIONS[0]);
    }
}
