//! Gemini REST client with Google Search grounding.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::instruction::SYSTEM_INSTRUCTION;
use super::types::{
    Content, ErrorWrapper, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part, Tool,
};
use super::{QueryResponse, ServiceError, TaxExpert};
use crate::chat::Source;
use crate::config::{api_key_from_env, Settings};

/// Answer used when the model returns no text at all.
pub const NO_ANSWER_TEXT: &str = "I apologize, but I couldn't generate a response at this time.";

/// Header carrying the API key; keeps the key out of request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Tax expert backed by the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    settings: Settings,
    /// Fixed key; when unset the environment is read on every call.
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(settings: Settings) -> Self {
        Self {
            client: Client::new(),
            settings,
            api_key: None,
        }
    }

    /// Use this key instead of reading the environment.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn resolve_api_key(&self) -> Result<String, ServiceError> {
        let key = match &self.api_key {
            Some(key) => Some(key.trim().to_string()).filter(|k| !k.is_empty()),
            None => api_key_from_env(),
        };
        key.ok_or(ServiceError::MissingApiKey)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.settings.base_url, self.settings.model
        )
    }

    async fn send_request(&self, prompt: &str) -> Result<QueryResponse, ServiceError> {
        let api_key = self.resolve_api_key()?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            tools: vec![Tool::default()],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
            },
        };

        debug!(model = %self.settings.model, "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(map_http_error(status, &text));
        }

        parse_response(&text)
    }
}

#[async_trait]
impl TaxExpert for GeminiClient {
    async fn query(&self, prompt: &str) -> Result<QueryResponse, ServiceError> {
        self.send_request(prompt).await
    }

    fn model(&self) -> &str {
        &self.settings.model
    }
}

/// Parse a successful `generateContent` body.
///
/// Only the first candidate is used. Grounding chunks need both a uri and a
/// title, and the first chunk for each uri wins.
pub fn parse_response(body: &str) -> Result<QueryResponse, ServiceError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        return Ok(QueryResponse {
            answer: NO_ANSWER_TEXT.to_string(),
            sources: Vec::new(),
        });
    };

    let answer: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| !part.thought)
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let answer = if answer.is_empty() {
        NO_ANSWER_TEXT.to_string()
    } else {
        answer
    };

    let mut seen = HashSet::new();
    let sources = candidate
        .grounding_metadata
        .map(|metadata| metadata.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .filter_map(|web| {
            let uri = web.uri.filter(|u| !u.is_empty())?;
            let title = web.title.filter(|t| !t.is_empty())?;
            Some(Source { title, uri })
        })
        .filter(|source| seen.insert(source.uri.clone()))
        .collect();

    Ok(QueryResponse { answer, sources })
}

fn map_http_error(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    ServiceError::Status {
        status: status.as_u16(),
        message,
    }
}
