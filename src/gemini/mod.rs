//! Query dispatch to the hosted tax expert model.
//!
//! The [`TaxExpert`] trait is the seam between the conversation and the
//! network. [`GeminiClient`] implements it against the Gemini
//! `generateContent` REST API with Google Search grounding enabled.

mod client;
mod instruction;
mod types;

use async_trait::async_trait;
use thiserror::Error;

use crate::chat::Source;

pub use client::{parse_response, GeminiClient, NO_ANSWER_TEXT};
pub use instruction::SYSTEM_INSTRUCTION;

/// Any failure reaching or understanding the tax expert service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No API key configured (set API_KEY or GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Gemini API request failed: {0}")]
    Request(reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse Gemini response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    /// The request URL is dropped so nothing from it ends up in logs.
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Request(err.without_url())
    }
}

/// Answer text plus the grounding sources cited for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<Source>,
}

/// Something that can answer a tax question.
#[async_trait]
pub trait TaxExpert: Send + Sync {
    /// Ask one question. No retries are made.
    async fn query(&self, prompt: &str) -> Result<QueryResponse, ServiceError>;

    /// Model name shown to the user.
    fn model(&self) -> &str;
}
