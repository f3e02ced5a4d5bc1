//! Wire types for the Gemini `generateContent` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
    pub system_instruction: Content<'a>,
    pub tools: Vec<Tool>,
    pub generation_config: GenerationConfig,
}

#[derive(Serialize)]
pub(super) struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
    pub parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
pub(super) struct Part<'a> {
    pub text: &'a str,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Serialize, Default)]
pub(super) struct GoogleSearch {}

#[derive(Serialize)]
pub(super) struct GenerationConfig {
    pub temperature: f32,
}

#[derive(Deserialize)]
pub(super) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Candidate {
    pub content: Option<ContentResponse>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
pub(super) struct ContentResponse {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
pub(super) struct PartResponse {
    pub text: Option<String>,
    /// Set on reasoning parts, which are not part of the answer.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
pub(super) struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Deserialize)]
pub(super) struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct ErrorWrapper {
    pub error: ErrorBody,
}

#[derive(Deserialize)]
pub(super) struct ErrorBody {
    pub message: Option<String>,
    pub status: Option<String>,
}
